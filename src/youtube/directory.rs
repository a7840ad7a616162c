use std::sync::Arc;

use crate::{
    config,
    error::{DirectoryError, FailureKind},
    management::Session,
    types::{PlaylistRef, RemotePlaylist},
    utils, warning,
    youtube::{client::PlaylistApi, halt_on_quota, rotation::OverflowRotator},
};

/// Item count at which a playlist stops accepting new videos.
pub const PLAYLIST_CAPACITY: u64 = 200;

/// Naming convention and limits of the managed playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistNaming {
    pub base_name: String,
    pub description: String,
    pub capacity: u64,
}

impl PlaylistNaming {
    pub fn new(base_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            description: description.into(),
            capacity: PLAYLIST_CAPACITY,
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::playlist_base_name(), config::playlist_description())
    }

    pub fn title_for(&self, ordinal: u32) -> String {
        utils::playlist_title(&self.base_name, ordinal)
    }

    /// Turns a listed playlist into a [`PlaylistRef`] if its title matches.
    pub fn matching(&self, playlist: RemotePlaylist) -> Option<PlaylistRef> {
        let ordinal = utils::playlist_ordinal(&playlist.title, &self.base_name)?;
        Some(PlaylistRef {
            id: playlist.id,
            title: playlist.title,
            ordinal,
            item_count: playlist.item_count,
        })
    }

    pub fn is_full(&self, playlist: &PlaylistRef) -> bool {
        playlist.item_count >= self.capacity
    }
}

/// The highest-ordinal playlist; on equal ordinals the first one wins.
pub fn select_highest(playlists: &[PlaylistRef]) -> Option<&PlaylistRef> {
    let mut highest: Option<&PlaylistRef> = None;
    for playlist in playlists {
        if highest.is_none_or(|h| playlist.ordinal > h.ordinal) {
            highest = Some(playlist);
        }
    }
    highest
}

/// Lists every owned playlist that follows the naming convention.
///
/// Follows page tokens until the listing is exhausted and keeps only the
/// playlists whose title starts with the base name, with their ordinals.
///
/// # Arguments
///
/// * `api` - Remote playlist API
/// * `session` - Session whose quota halt is tripped by a quota signal
/// * `token` - Bearer token
/// * `naming` - Base name and capacity of the managed playlists
///
/// # Returns
///
/// - `Ok(Vec<PlaylistRef>)` - Matching playlists in listing order
/// - `Err(DirectoryError::List)` - The token was rejected or the quota ran out
///
/// # Error Handling
///
/// A rejected token and an exhausted quota end the listing with an error, so
/// no playlist is created from a list that may be missing existing ones. Any
/// other failing page ends the listing with what was collected so far.
pub async fn list_matching(
    api: &dyn PlaylistApi,
    session: &Session,
    token: &str,
    naming: &PlaylistNaming,
) -> Result<Vec<PlaylistRef>, DirectoryError> {
    let mut matching = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        match api.list_playlists(token, page_token.as_deref()).await {
            Ok(page) => {
                matching.extend(page.items.into_iter().filter_map(|p| naming.matching(p)));
                page_token = page.next_page_token;
                if page_token.is_none() {
                    break;
                }
            }
            Err(source) => match source.kind() {
                FailureKind::Unauthorized | FailureKind::QuotaExceeded => {
                    halt_on_quota(session, &source);
                    return Err(DirectoryError::List { source });
                }
                FailureKind::Capacity | FailureKind::Transient => {
                    warning!("Listing playlists stopped early: {}", source);
                    break;
                }
            },
        }
    }

    Ok(matching)
}

/// Creates the playlist with the given ordinal.
///
/// The playlist is private and gets the configured description. Nothing is
/// sent once the session's quota halt is set.
///
/// # Errors
///
/// - `DirectoryError::QuotaHalted` - The quota halt was already set
/// - `DirectoryError::Create` - The remote API refused the creation; a quota
///   signal also trips the halt
pub async fn create_playlist(
    api: &dyn PlaylistApi,
    session: &Session,
    token: &str,
    naming: &PlaylistNaming,
    ordinal: u32,
) -> Result<PlaylistRef, DirectoryError> {
    if session.quota_halted() {
        return Err(DirectoryError::QuotaHalted);
    }

    let title = naming.title_for(ordinal);
    match api.create_playlist(token, &title, &naming.description).await {
        Ok(created) => Ok(PlaylistRef {
            id: created.id,
            title: created.title,
            ordinal,
            item_count: created.item_count,
        }),
        Err(source) => {
            halt_on_quota(session, &source);
            Err(DirectoryError::Create { title, source })
        }
    }
}

/// Finds the playlist new videos should go to.
pub struct PlaylistDirectory {
    api: Arc<dyn PlaylistApi>,
    session: Arc<Session>,
    naming: PlaylistNaming,
    rotator: OverflowRotator,
}

impl PlaylistDirectory {
    pub fn new(api: Arc<dyn PlaylistApi>, session: Arc<Session>, naming: PlaylistNaming) -> Self {
        let rotator = OverflowRotator::new(Arc::clone(&api), Arc::clone(&session), naming.clone());
        Self {
            api,
            session,
            naming,
            rotator,
        }
    }

    pub fn naming(&self) -> &PlaylistNaming {
        &self.naming
    }

    pub fn rotator(&self) -> &OverflowRotator {
        &self.rotator
    }

    /// Returns the current target playlist, discovering or creating it if needed.
    ///
    /// A cached target is returned as is, even if it has filled up since; the
    /// submission that finds it full triggers the rotation. Concurrent callers
    /// without a cached target wait for a single discovery.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token for the remote API
    ///
    /// # Returns
    ///
    /// - `Ok(PlaylistRef)` - The target, now cached in the session
    /// - `Err(DirectoryError)` - Listing or creation failed, or the quota halt
    ///   is set
    ///
    /// # Selection
    ///
    /// Among the listed playlists the one with the highest ordinal wins. If it
    /// is at capacity the rotator starts the next one; if nothing matches, the
    /// base playlist (ordinal 1) is created.
    pub async fn resolve_target(&self, token: &str) -> Result<PlaylistRef, DirectoryError> {
        if let Some(target) = self.session.target().await {
            return Ok(target);
        }

        let _discovery = self.session.discovery_guard().await;
        if let Some(target) = self.session.target().await {
            return Ok(target);
        }
        if self.session.quota_halted() {
            return Err(DirectoryError::QuotaHalted);
        }

        let matching =
            list_matching(self.api.as_ref(), &self.session, token, &self.naming).await?;
        let target = match select_highest(&matching) {
            Some(highest) if self.naming.is_full(highest) => {
                warning!(
                    "Playlist \"{}\" has {} videos, starting a new one",
                    highest.title,
                    highest.item_count
                );
                self.rotator.rotate(token, Some(highest)).await?
            }
            Some(highest) => highest.clone(),
            None => {
                create_playlist(self.api.as_ref(), &self.session, token, &self.naming, 1).await?
            }
        };

        self.session.set_target(target.clone()).await;
        Ok(target)
    }
}
