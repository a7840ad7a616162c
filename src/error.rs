//! Error types for the enqueue core.
//!
//! Every failure family the core can run into has its own type here. None of
//! them escapes the Enqueue Orchestrator: it turns them into an
//! [`EnqueueOutcome`](crate::youtube::enqueue::EnqueueOutcome) with a
//! human-readable reason.

use thiserror::Error;

use crate::types::ApiErrorResponse;

/// Reasons the remote API uses for an exhausted quota.
const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded"];

/// How a failed remote call has to be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The token was rejected; it must be invalidated.
    Unauthorized,
    /// The quota is exhausted for the rest of the session.
    QuotaExceeded,
    /// The target playlist cannot take more items; recoverable by rotation.
    Capacity,
    /// Anything else; reported as is.
    Transient,
}

/// A failed call to the remote playlist API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("playlist is full: {message}")]
    Capacity { message: String },

    #[error("{message}")]
    Transient {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Classifies a non-success response from its status and error body.
    ///
    /// 401 is always unauthorized. A quota reason (or a message about quota)
    /// wins over capacity, and capacity is either a 409 or the "maximum number
    /// of videos" condition.
    pub fn from_response(status: u16, body: &ApiErrorResponse) -> Self {
        let message = if body.error.message.trim().is_empty() {
            format!("Error {}", status)
        } else {
            body.error.message.clone()
        };
        let lower_message = message.to_lowercase();
        let reasons: Vec<&str> = body
            .error
            .errors
            .iter()
            .filter_map(|e| e.reason.as_deref())
            .collect();

        if status == 401 {
            return ApiError::Unauthorized { message };
        }

        if reasons.iter().any(|r| QUOTA_REASONS.contains(r)) || lower_message.contains("quota") {
            return ApiError::QuotaExceeded { message };
        }

        let max_videos = reasons
            .iter()
            .any(|r| r.to_lowercase().contains("maximumnumberofvideos"))
            || lower_message.contains("maximum number of videos");
        if status == 409 || max_videos {
            return ApiError::Capacity { message };
        }

        ApiError::Transient {
            status,
            reason: reasons.first().map(|r| r.to_string()),
            message,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Unauthorized { .. } => FailureKind::Unauthorized,
            ApiError::QuotaExceeded { .. } => FailureKind::QuotaExceeded,
            ApiError::Capacity { .. } => FailureKind::Capacity,
            ApiError::Transient { .. } | ApiError::Transport(_) => FailureKind::Transient,
        }
    }

    /// The remote-supplied message, or the transport error text.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::QuotaExceeded { message }
            | ApiError::Capacity { message }
            | ApiError::Transient { message, .. } => message.clone(),
            ApiError::Transport(e) => e.to_string(),
        }
    }
}

/// Failure to obtain a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no OAuth client id configured, set YOUTUBE_CLIENT_ID")]
    MissingClientId,

    #[error("authorization was declined: {0}")]
    ConsentDenied(String),

    #[error("authorization requires user interaction")]
    InteractionRequired,

    #[error("authorization flow failed: {0}")]
    Flow(String),

    #[error("authorization timed out after {0} seconds")]
    TimedOut(u64),
}

/// Failure to resolve or create a target playlist.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The listing was rejected in a way a partial result cannot paper over.
    #[error("failed to list playlists: {source}")]
    List {
        #[source]
        source: ApiError,
    },

    #[error("failed to create playlist \"{title}\": {source}")]
    Create {
        title: String,
        #[source]
        source: ApiError,
    },

    #[error("quota exceeded, saving is paused")]
    QuotaHalted,
}

impl DirectoryError {
    /// The remote error behind this failure, if there was one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            DirectoryError::List { source } | DirectoryError::Create { source, .. } => {
                Some(source)
            }
            DirectoryError::QuotaHalted => None,
        }
    }

    /// How the caller has to react, following [`ApiError::kind`].
    pub fn kind(&self) -> FailureKind {
        match self {
            DirectoryError::QuotaHalted => FailureKind::QuotaExceeded,
            _ => self
                .api_error()
                .map_or(FailureKind::Transient, ApiError::kind),
        }
    }
}
