use std::{fmt, sync::Arc};

use crate::{
    error::{DirectoryError, FailureKind},
    management::{CredentialProvider, Session},
    warning,
    youtube::{client::PlaylistApi, directory::PlaylistDirectory, halt_on_quota},
};

/// How many times one enqueue may rotate to a fresh playlist.
const MAX_ROTATIONS: u32 = 1;

/// Why a video could not be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// This call hit the quota and tripped the halt.
    QuotaExceeded(String),
    /// The halt was already set; nothing was sent.
    QuotaHalted,
    Directory(String),
    Capacity(String),
    Unauthorized(String),
    Transient(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::QuotaExceeded(m) => write!(f, "quota exceeded: {}", m),
            FailureReason::QuotaHalted => write!(f, "quota exceeded, saving is paused"),
            FailureReason::Directory(m) => write!(f, "directory error: {}", m),
            FailureReason::Capacity(m) => write!(f, "playlist is full: {}", m),
            FailureReason::Unauthorized(m) => write!(f, "not authorized: {}", m),
            FailureReason::Transient(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueStatus {
    Inserted,
    AlreadyPresent,
    Failed(FailureReason),
}

/// Result of saving a single video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub video_id: String,
    /// Title of the playlist the video ended up in.
    pub playlist: Option<String>,
    pub status: EnqueueStatus,
}

impl EnqueueOutcome {
    fn done(video_id: &str, playlist: &str, status: EnqueueStatus) -> Self {
        Self {
            video_id: video_id.to_string(),
            playlist: Some(playlist.to_string()),
            status,
        }
    }

    fn failed(video_id: &str, reason: FailureReason) -> Self {
        Self {
            video_id: video_id.to_string(),
            playlist: None,
            status: EnqueueStatus::Failed(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.status, EnqueueStatus::Failed(_))
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            EnqueueStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Saves single videos into the target playlist.
///
/// Never fails: every error is turned into an [`EnqueueOutcome`].
pub struct Enqueuer {
    api: Arc<dyn PlaylistApi>,
    session: Arc<Session>,
    directory: Arc<PlaylistDirectory>,
    credentials: Arc<CredentialProvider>,
}

impl Enqueuer {
    pub fn new(
        api: Arc<dyn PlaylistApi>,
        session: Arc<Session>,
        directory: Arc<PlaylistDirectory>,
        credentials: Arc<CredentialProvider>,
    ) -> Self {
        Self {
            api,
            session,
            directory,
            credentials,
        }
    }

    /// Saves one video into the current target playlist.
    ///
    /// # Arguments
    ///
    /// * `video_id` - The 11-character video id
    /// * `token` - Bearer token, obtained once per batch
    ///
    /// # Returns
    ///
    /// An [`EnqueueOutcome`] naming the playlist the video ended up in, or the
    /// [`FailureReason`] it could not be saved for. A video that is already in
    /// the target counts as saved and is not inserted again.
    ///
    /// # Steps
    ///
    /// 1. Fails right away with [`FailureReason::QuotaHalted`] once the
    ///    session's quota halt is set; nothing is sent.
    /// 2. Resolves the target through the [`PlaylistDirectory`].
    /// 3. Looks the video up in the target. A failing lookup only logs a
    ///    warning.
    /// 4. Inserts the video.
    ///
    /// # Failure Handling
    ///
    /// - Quota: trips the session-wide halt
    /// - Playlist full (409 or "maximum number of videos"): rotates once and
    ///   starts over; a second full playlist is reported as a failure
    /// - Unauthorized: invalidates the cached token, no retry
    /// - Anything else: reported with the remote message, no retry
    ///
    /// The same classification applies to failures of the directory, so a
    /// token rejected while listing playlists is invalidated as well.
    pub async fn enqueue(&self, video_id: &str, token: &str) -> EnqueueOutcome {
        let mut rotations = 0;

        loop {
            if self.session.quota_halted() {
                return EnqueueOutcome::failed(video_id, FailureReason::QuotaHalted);
            }

            let target = match self.directory.resolve_target(token).await {
                Ok(target) => target,
                Err(e) => return EnqueueOutcome::failed(video_id, self.directory_failure(e).await),
            };

            match self
                .api
                .find_playlist_item(token, &target.id, video_id)
                .await
            {
                Ok(true) => {
                    return EnqueueOutcome::done(
                        video_id,
                        &target.title,
                        EnqueueStatus::AlreadyPresent,
                    );
                }
                Ok(false) => {}
                Err(e) => warning!("Duplicate check for {} failed, saving anyway: {}", video_id, e),
            }

            let err = match self
                .api
                .insert_playlist_item(token, &target.id, video_id)
                .await
            {
                Ok(()) => {
                    return EnqueueOutcome::done(video_id, &target.title, EnqueueStatus::Inserted);
                }
                Err(err) => err,
            };

            let reason = match err.kind() {
                FailureKind::QuotaExceeded => {
                    halt_on_quota(&self.session, &err);
                    FailureReason::QuotaExceeded(err.message())
                }
                FailureKind::Capacity if rotations < MAX_ROTATIONS => {
                    rotations += 1;
                    warning!("Playlist \"{}\" is full, rotating", target.title);
                    match self.directory.rotator().rotate(token, Some(&target)).await {
                        Ok(_) => continue,
                        Err(e) => self.directory_failure(e).await,
                    }
                }
                FailureKind::Capacity => FailureReason::Capacity(err.message()),
                FailureKind::Unauthorized => {
                    self.credentials.invalidate().await;
                    FailureReason::Unauthorized(err.message())
                }
                FailureKind::Transient => FailureReason::Transient(err.message()),
            };

            return EnqueueOutcome::failed(video_id, reason);
        }
    }

    /// Turns a directory failure into a reason, invalidating a rejected token.
    async fn directory_failure(&self, err: DirectoryError) -> FailureReason {
        match (err.kind(), err.api_error()) {
            (FailureKind::Unauthorized, Some(api_err)) => {
                self.credentials.invalidate().await;
                FailureReason::Unauthorized(api_err.message())
            }
            (FailureKind::QuotaExceeded, Some(api_err)) => {
                FailureReason::QuotaExceeded(api_err.message())
            }
            (FailureKind::QuotaExceeded, None) => FailureReason::QuotaHalted,
            _ => FailureReason::Directory(err.to_string()),
        }
    }
}
