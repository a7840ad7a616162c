#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;
use tubestash::{
    error::{ApiError, AuthError},
    management::{CredentialProvider, KeyValueStore, MemoryStore, Session},
    types::{
        ApiErrorBody, ApiErrorDetail, ApiErrorResponse, PendingVideo, PlaylistPage,
        RemotePlaylist, SourceHandle,
    },
    youtube::{
        auth::{AuthFlowHandle, TokenIssuer},
        batch::{BatchCoordinator, HandleCloser},
        client::PlaylistApi,
        directory::{PlaylistDirectory, PlaylistNaming},
        enqueue::Enqueuer,
    },
};

pub const BASE: &str = "Base";

#[derive(Debug, Clone)]
pub enum FakeFailure {
    Quota,
    Full,
    Conflict,
    Unauthorized,
    Transient(String),
}

impl FakeFailure {
    pub fn to_error(&self) -> ApiError {
        let (status, reason, message) = match self {
            FakeFailure::Quota => (
                403,
                "quotaExceeded",
                "The request cannot be completed because you have exceeded your quota.".to_string(),
            ),
            FakeFailure::Full => (
                403,
                "playlistContainsMaximumNumberOfVideos",
                "The playlist contains the maximum number of videos.".to_string(),
            ),
            FakeFailure::Conflict => (409, "conflict", "Conflict".to_string()),
            FakeFailure::Unauthorized => (401, "authError", "Invalid Credentials".to_string()),
            FakeFailure::Transient(m) => (500, "backendError", m.clone()),
        };

        ApiError::from_response(
            status,
            &ApiErrorResponse {
                error: ApiErrorBody {
                    code: Some(status),
                    message,
                    errors: vec![ApiErrorDetail {
                        reason: Some(reason.to_string()),
                        message: None,
                        domain: Some("youtube".to_string()),
                    }],
                },
            },
        )
    }
}

#[derive(Debug, Clone)]
struct FakePlaylist {
    id: String,
    title: String,
    /// Count the listing reports; may lag behind the real one.
    listed_count: u64,
    /// Count the insert endpoint checks against the limit.
    actual_count: u64,
    videos: Vec<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    playlists: Vec<FakePlaylist>,
    next_id: u64,
    page_size: usize,
    limit: Option<u64>,
    always_full: bool,
    fail_find: bool,
    fail_create: Option<FakeFailure>,
    fail_list_from_page: Option<(usize, FakeFailure)>,
    video_failures: HashMap<String, FakeFailure>,
    list_calls: usize,
    create_calls: usize,
    find_calls: usize,
    insert_calls: usize,
    created: Vec<String>,
}

/// In-memory stand-in for the remote playlist API.
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1,
                page_size: 50,
                ..FakeState::default()
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Adds an owned playlist and returns its id.
    pub fn add_playlist(&self, title: &str, item_count: u64) -> String {
        self.with_state(|s| {
            let id = format!("PL{}", s.next_id);
            s.next_id += 1;
            s.playlists.push(FakePlaylist {
                id: id.clone(),
                title: title.to_string(),
                listed_count: item_count,
                actual_count: item_count,
                videos: Vec::new(),
            });
            id
        })
    }

    /// Makes the listing report a different count than the real one.
    pub fn set_listed_count(&self, id: &str, listed: u64) {
        self.with_state(|s| {
            if let Some(p) = s.playlists.iter_mut().find(|p| p.id == id) {
                p.listed_count = listed;
            }
        })
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.with_state(|s| s.page_size = page_size)
    }

    pub fn set_limit(&self, limit: u64) {
        self.with_state(|s| s.limit = Some(limit))
    }

    pub fn set_always_full(&self, always_full: bool) {
        self.with_state(|s| s.always_full = always_full)
    }

    pub fn set_fail_find(&self, fail: bool) {
        self.with_state(|s| s.fail_find = fail)
    }

    pub fn set_fail_create(&self, failure: FakeFailure) {
        self.with_state(|s| s.fail_create = Some(failure))
    }

    /// Every listing request for page `page` (0-based) or later fails.
    pub fn fail_listing_from_page(&self, page: usize, failure: FakeFailure) {
        self.with_state(|s| s.fail_list_from_page = Some((page, failure)))
    }

    pub fn fail_video(&self, video_id: &str, failure: FakeFailure) {
        self.with_state(|s| {
            s.video_failures.insert(video_id.to_string(), failure);
        })
    }

    pub fn list_calls(&self) -> usize {
        self.with_state(|s| s.list_calls)
    }

    pub fn create_calls(&self) -> usize {
        self.with_state(|s| s.create_calls)
    }

    pub fn find_calls(&self) -> usize {
        self.with_state(|s| s.find_calls)
    }

    pub fn insert_calls(&self) -> usize {
        self.with_state(|s| s.insert_calls)
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.with_state(|s| s.created.clone())
    }

    pub fn videos_in(&self, title: &str) -> Vec<String> {
        self.with_state(|s| {
            s.playlists
                .iter()
                .find(|p| p.title == title)
                .map(|p| p.videos.clone())
                .unwrap_or_default()
        })
    }
}

#[async_trait]
impl PlaylistApi for FakeApi {
    async fn list_playlists(
        &self,
        _token: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, ApiError> {
        self.with_state(|s| {
            s.list_calls += 1;
            let page: usize = page_token.map_or(0, |t| t.parse().unwrap());
            if let Some((from, failure)) = &s.fail_list_from_page {
                if page >= *from {
                    return Err(failure.to_error());
                }
            }

            let start = page * s.page_size;
            let items: Vec<RemotePlaylist> = s
                .playlists
                .iter()
                .skip(start)
                .take(s.page_size)
                .map(|p| RemotePlaylist {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    item_count: p.listed_count,
                })
                .collect();
            let next_page_token =
                (start + s.page_size < s.playlists.len()).then(|| (page + 1).to_string());

            Ok(PlaylistPage {
                items,
                next_page_token,
            })
        })
    }

    async fn create_playlist(
        &self,
        _token: &str,
        title: &str,
        _description: &str,
    ) -> Result<RemotePlaylist, ApiError> {
        let failure = self.with_state(|s| {
            s.create_calls += 1;
            s.fail_create.clone()
        });
        if let Some(failure) = failure {
            return Err(failure.to_error());
        }

        let id = self.add_playlist(title, 0);
        self.with_state(|s| s.created.push(title.to_string()));
        Ok(RemotePlaylist {
            id,
            title: title.to_string(),
            item_count: 0,
        })
    }

    async fn find_playlist_item(
        &self,
        _token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, ApiError> {
        self.with_state(|s| {
            s.find_calls += 1;
            if s.fail_find {
                return Err(FakeFailure::Transient("lookup failed".to_string()).to_error());
            }
            Ok(s
                .playlists
                .iter()
                .any(|p| p.id == playlist_id && p.videos.iter().any(|v| v == video_id)))
        })
    }

    async fn insert_playlist_item(
        &self,
        _token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ApiError> {
        self.with_state(|s| {
            s.insert_calls += 1;
            if let Some(failure) = s.video_failures.get(video_id) {
                return Err(failure.to_error());
            }
            if s.always_full {
                return Err(FakeFailure::Full.to_error());
            }

            let limit = s.limit;
            let Some(playlist) = s.playlists.iter_mut().find(|p| p.id == playlist_id) else {
                return Err(FakeFailure::Transient("playlist not found".to_string()).to_error());
            };
            if limit.is_some_and(|l| playlist.actual_count >= l) {
                return Err(FakeFailure::Full.to_error());
            }

            playlist.videos.push(video_id.to_string());
            playlist.actual_count += 1;
            playlist.listed_count += 1;
            Ok(())
        })
    }
}

/// Token issuer that hands out a fixed token and records its calls.
pub struct FakeIssuer {
    token: String,
    fail_silent: bool,
    fail_interactive: Option<AuthError>,
    calls: Mutex<Vec<bool>>,
    revoked: Mutex<Vec<String>>,
}

impl FakeIssuer {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            fail_silent: true,
            fail_interactive: None,
            calls: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
        }
    }

    pub fn silent_ok(mut self) -> Self {
        self.fail_silent = false;
        self
    }

    pub fn failing(mut self, err: AuthError) -> Self {
        self.fail_interactive = Some(err);
        self
    }

    /// The `interactive` flag of every `begin` call, in order.
    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().unwrap().clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenIssuer for FakeIssuer {
    async fn begin(&self, interactive: bool) -> Result<AuthFlowHandle, AuthError> {
        self.calls.lock().unwrap().push(interactive);
        if !interactive && self.fail_silent {
            return Err(AuthError::Flow("silent issuance unavailable".to_string()));
        }
        if let Some(err) = &self.fail_interactive {
            return Err(err.clone());
        }
        Ok(AuthFlowHandle::completed(Ok(self.token.clone())))
    }

    async fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().push(token.to_string());
    }
}

/// Records which handles were closed.
#[derive(Default)]
pub struct RecordingCloser {
    closed: Mutex<HashSet<SourceHandle>>,
}

impl RecordingCloser {
    pub fn closed(&self) -> HashSet<SourceHandle> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl HandleCloser for RecordingCloser {
    async fn close(&self, handle: SourceHandle) -> Result<(), String> {
        self.closed.lock().unwrap().insert(handle);
        Ok(())
    }
}

pub fn pending(video_id: &str, handle: u64) -> PendingVideo {
    PendingVideo {
        video_id: video_id.to_string(),
        source_handle: SourceHandle(handle),
        display_title: format!("Video {}", video_id),
        added_at: Utc::now(),
    }
}

/// Fully wired core on top of the fakes.
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub issuer: Arc<FakeIssuer>,
    pub store: Arc<MemoryStore>,
    pub session: Arc<Session>,
    pub credentials: Arc<CredentialProvider>,
    pub directory: Arc<PlaylistDirectory>,
    pub enqueuer: Arc<Enqueuer>,
    pub closer: Arc<RecordingCloser>,
    pub coordinator: BatchCoordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_issuer(FakeIssuer::new("fresh-token"))
    }

    pub fn with_issuer(issuer: FakeIssuer) -> Self {
        let api = Arc::new(FakeApi::new());
        let issuer = Arc::new(issuer);
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(Session::new());
        let credentials = Arc::new(CredentialProvider::new(
            issuer.clone(),
            store.clone(),
            Arc::clone(&session),
        ));
        let directory = Arc::new(PlaylistDirectory::new(
            api.clone(),
            Arc::clone(&session),
            PlaylistNaming::new(BASE, "Saved videos"),
        ));
        let enqueuer = Arc::new(Enqueuer::new(
            api.clone(),
            Arc::clone(&session),
            Arc::clone(&directory),
            Arc::clone(&credentials),
        ));
        let closer = Arc::new(RecordingCloser::default());
        let coordinator = BatchCoordinator::new(
            Arc::clone(&credentials),
            Arc::clone(&enqueuer),
            Arc::clone(&session),
            closer.clone(),
        );

        Self {
            api,
            issuer,
            store,
            session,
            credentials,
            directory,
            enqueuer,
            closer,
            coordinator,
        }
    }

    /// Puts a token in the store as if a previous session had saved it.
    pub async fn seed_token(&self, token: &str) {
        self.store
            .set(tubestash::management::store::TOKEN_KEY, token)
            .await
            .unwrap();
    }
}
