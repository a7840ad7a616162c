//! # YouTube Integration Module
//!
//! Client for the YouTube Data API v3 and the orchestration that saves videos
//! into a rotating set of playlists.
//!
//! ## Architecture
//!
//! ```text
//! BatchCoordinator ── authenticates once ──> CredentialProvider
//!        │
//!        └─ N concurrent calls ──> Enqueuer
//!                                     ├── PlaylistDirectory ──> OverflowRotator
//!                                     └── PlaylistApi (YouTubeClient)
//! ```
//!
//! - [`auth`] - Token issuers: an external token command, or the implicit-grant
//!   redirect flow through the browser and the local callback server.
//! - [`client`] - The [`client::PlaylistApi`] seam and its reqwest implementation.
//! - [`directory`] - Discovers the playlists named `<base>`, `<base> 2`, ... and
//!   picks (or creates) the current target.
//! - [`rotation`] - Starts the next playlist once the target reports it is full.
//! - [`enqueue`] - Saves one video: duplicate check, insert, failure handling.
//! - [`batch`] - Fans out over a list of pending videos.
//!
//! ## Failure handling
//!
//! | Remote signal | Effect |
//! |---|---|
//! | 401 | token invalidated, video fails |
//! | quota reason | session-wide halt, every later call fails without a request |
//! | 409 / maximum number of videos | one rotation, then one more attempt |
//! | anything else | video fails with the remote message |
//!
//! ## API Coverage
//!
//! - `GET /playlists?mine=true` - paginated listing with item counts
//! - `POST /playlists` - create a private playlist
//! - `GET /playlistItems?playlistId=&videoId=` - duplicate check
//! - `POST /playlistItems` - insert a video

pub mod auth;
pub mod batch;
pub mod client;
pub mod directory;
pub mod enqueue;
pub mod rotation;

use crate::{
    error::{ApiError, FailureKind},
    management::Session,
    warning,
};

/// Trips the session's quota halt if `err` is a quota signal.
///
/// The notice is printed once, by whichever call tripped the halt.
pub(crate) fn halt_on_quota(session: &Session, err: &ApiError) {
    if err.kind() == FailureKind::QuotaExceeded && session.halt_quota() {
        warning!(
            "YouTube API quota exhausted ({}). Saving is paused until tubestash is restarted.",
            err.message()
        );
    }
}
