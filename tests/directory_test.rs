mod common;

use common::{BASE, FakeFailure, Harness};
use tubestash::{
    error::{DirectoryError, FailureKind},
    types::PlaylistRef,
    youtube::directory::{PlaylistNaming, select_highest},
};

fn playlist_ref(id: &str, ordinal: u32) -> PlaylistRef {
    PlaylistRef {
        id: id.to_string(),
        title: format!("{} {}", BASE, ordinal),
        ordinal,
        item_count: 0,
    }
}

#[test]
fn test_select_highest_first_wins_on_ties() {
    let playlists = vec![playlist_ref("a", 2), playlist_ref("b", 3), playlist_ref("c", 3)];

    assert_eq!(select_highest(&playlists).map(|p| p.id.as_str()), Some("b"));
    assert!(select_highest(&[]).is_none());
}

#[test]
fn test_naming_is_full_at_capacity() {
    let naming = PlaylistNaming::new(BASE, "");
    let mut playlist = playlist_ref("a", 1);

    playlist.item_count = 199;
    assert!(!naming.is_full(&playlist));
    playlist.item_count = 200;
    assert!(naming.is_full(&playlist));
}

#[tokio::test]
async fn test_resolve_picks_highest_ordinal() {
    let h = Harness::new();
    h.api.add_playlist("Base", 10);
    h.api.add_playlist("Base 2", 10);
    let ten = h.api.add_playlist("Base 10", 10);
    h.api.add_playlist("Base 3", 10);
    h.api.add_playlist("Unrelated", 10);

    let target = h.directory.resolve_target("token").await.unwrap();

    // Numeric ordering, not lexicographic
    assert_eq!(target.id, ten);
    assert_eq!(target.ordinal, 10);
    assert_eq!(h.api.create_calls(), 0);
}

#[tokio::test]
async fn test_resolve_creates_base_playlist_when_none_exist() {
    let h = Harness::new();
    h.api.add_playlist("Unrelated", 3);

    let target = h.directory.resolve_target("token").await.unwrap();

    assert_eq!(target.title, "Base");
    assert_eq!(target.ordinal, 1);
    assert_eq!(h.api.created_titles(), vec!["Base".to_string()]);
}

#[tokio::test]
async fn test_resolve_caches_target_for_session() {
    let h = Harness::new();
    h.api.add_playlist("Base", 10);

    let first = h.directory.resolve_target("token").await.unwrap();
    let listings = h.api.list_calls();
    let second = h.directory.resolve_target("token").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.api.list_calls(), listings);
    assert_eq!(h.session.target().await, Some(first));
}

#[tokio::test]
async fn test_resolve_rotates_past_full_playlist() {
    let h = Harness::new();
    h.api.add_playlist("Base", 50);
    h.api.add_playlist("Base 2", 200);

    let target = h.directory.resolve_target("token").await.unwrap();

    assert_eq!(target.title, "Base 3");
    assert_eq!(target.ordinal, 3);
    assert_eq!(h.api.create_calls(), 1);
}

#[tokio::test]
async fn test_resolve_follows_pagination() {
    let h = Harness::new();
    h.api.set_page_size(2);
    for title in ["Other", "Base", "Other 2", "Base 2", "Base 4"] {
        h.api.add_playlist(title, 1);
    }

    let target = h.directory.resolve_target("token").await.unwrap();

    assert_eq!(target.title, "Base 4");
    assert_eq!(h.api.list_calls(), 3);
}

#[tokio::test]
async fn test_resolve_uses_partial_listing_on_page_failure() {
    let h = Harness::new();
    h.api.set_page_size(2);
    h.api.add_playlist("Base", 1);
    h.api.add_playlist("Base 2", 1);
    h.api.add_playlist("Base 5", 1);
    h.api.fail_listing_from_page(1, FakeFailure::Transient("listing failed".to_string()));

    let target = h.directory.resolve_target("token").await.unwrap();

    // The second page never arrived; the best of the first page wins
    assert_eq!(target.title, "Base 2");
    assert_eq!(h.api.create_calls(), 0);
}

#[tokio::test]
async fn test_resolve_fails_when_creation_fails() {
    let h = Harness::new();
    h.api.set_fail_create(FakeFailure::Transient("backend down".to_string()));

    let err = h.directory.resolve_target("token").await.unwrap_err();

    assert!(err.to_string().contains("backend down"));
    assert!(h.session.target().await.is_none());
}

#[tokio::test]
async fn test_quota_during_creation_halts_session() {
    let h = Harness::new();
    h.api.set_fail_create(FakeFailure::Quota);

    assert!(h.directory.resolve_target("token").await.is_err());
    assert!(h.session.quota_halted());
}

#[tokio::test]
async fn test_rotate_creates_next_ordinal() {
    let h = Harness::new();
    let id = h.api.add_playlist("Base", 200);
    let exhausted = PlaylistRef {
        id,
        title: "Base".to_string(),
        ordinal: 1,
        item_count: 200,
    };

    let target = h
        .directory
        .rotator()
        .rotate("token", Some(&exhausted))
        .await
        .unwrap();

    assert_eq!(target.title, "Base 2");
    assert_eq!(h.session.target().await, Some(target));
}

#[tokio::test]
async fn test_rotate_adopts_newer_playlist() {
    let h = Harness::new();
    let first = h.api.add_playlist("Base", 200);
    let second = h.api.add_playlist("Base 2", 0);
    let exhausted = PlaylistRef {
        id: first,
        title: "Base".to_string(),
        ordinal: 1,
        item_count: 200,
    };

    let target = h
        .directory
        .rotator()
        .rotate("token", Some(&exhausted))
        .await
        .unwrap();

    // Another rotation already created the successor
    assert_eq!(target.id, second);
    assert_eq!(h.api.create_calls(), 0);
}

#[tokio::test]
async fn test_rotate_skips_past_unlisted_exhausted_ordinal() {
    let h = Harness::new();
    let exhausted = playlist_ref("gone", 4);

    let target = h
        .directory
        .rotator()
        .rotate("token", Some(&exhausted))
        .await
        .unwrap();

    assert_eq!(target.ordinal, 5);
    assert_eq!(target.title, "Base 5");
}

#[tokio::test]
async fn test_rotate_skips_full_newer_playlist() {
    let h = Harness::new();
    let first = h.api.add_playlist("Base", 200);
    h.api.add_playlist("Base 2", 200);
    let exhausted = PlaylistRef {
        id: first,
        title: "Base".to_string(),
        ordinal: 1,
        item_count: 200,
    };

    let target = h
        .directory
        .rotator()
        .rotate("token", Some(&exhausted))
        .await
        .unwrap();

    // "Base 2" is newer but has no room left
    assert_eq!(target.title, "Base 3");
    assert_eq!(h.api.created_titles(), vec!["Base 3".to_string()]);
}

#[tokio::test]
async fn test_unauthorized_listing_creates_nothing() {
    let h = Harness::new();
    h.api.add_playlist("Base", 10);
    h.api.fail_listing_from_page(0, FakeFailure::Unauthorized);

    let err = h.directory.resolve_target("token").await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Unauthorized);
    assert!(matches!(err, DirectoryError::List { .. }));
    assert_eq!(h.api.create_calls(), 0);
    assert!(h.session.target().await.is_none());
}

#[tokio::test]
async fn test_quota_during_listing_halts_session() {
    let h = Harness::new();
    h.api.add_playlist("Base", 10);
    h.api.set_page_size(1);
    h.api.add_playlist("Base 2", 10);
    h.api.fail_listing_from_page(1, FakeFailure::Quota);

    let err = h.directory.resolve_target("token").await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::QuotaExceeded);
    assert!(h.session.quota_halted());
    // No base playlist is created from the partial listing
    assert_eq!(h.api.create_calls(), 0);
}

#[tokio::test]
async fn test_halted_session_sends_nothing() {
    let h = Harness::new();
    h.session.halt_quota();

    let resolved = h.directory.resolve_target("token").await;
    let rotated = h.directory.rotator().rotate("token", None).await;

    assert!(matches!(resolved, Err(DirectoryError::QuotaHalted)));
    assert!(matches!(rotated, Err(DirectoryError::QuotaHalted)));
    assert_eq!(h.api.list_calls(), 0);
    assert_eq!(h.api.create_calls(), 0);
}
