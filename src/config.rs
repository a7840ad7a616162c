//! Configuration management for Tubestash.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including the OAuth client, the YouTube API endpoints, the local
//! callback server and the playlist naming convention.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except the client id has one)

use std::{env, path::PathBuf, time::Duration};

/// Default base URL of the YouTube Data API.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default OAuth authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Default endpoint that revokes tokens issued by the redirect flow.
pub const DEFAULT_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

/// Default scope requested during authorization.
pub const DEFAULT_AUTH_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";

/// Default address the callback server binds to.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8745";

/// Default redirect endpoint registered with the OAuth client.
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8745/callback";

/// Default base name of the managed playlists.
pub const DEFAULT_PLAYLIST_BASE_NAME: &str = "My Watch Later";

/// Default description given to every playlist created by the tool.
pub const DEFAULT_PLAYLIST_DESCRIPTION: &str = "Videos saved by tubestash";

const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

// Placeholder shipped in `.env.example`.
const CLIENT_ID_PLACEHOLDER: &str = "YOUR_CLIENT_ID";

/// Returns the application's directory inside the platform local data directory.
///
/// - Linux: `~/.local/share/tubestash`
/// - macOS: `~/Library/Application Support/tubestash`
/// - Windows: `%LOCALAPPDATA%/tubestash`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tubestash");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if it doesn't exist. A missing `.env` file is not an
/// error since every setting but the client id has a default, and the client
/// id may come from the process environment.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())?;
    Ok(())
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the OAuth client id, if one is configured.
///
/// Reads `YOUTUBE_CLIENT_ID`. Empty values and the template placeholder are
/// treated as not configured.
pub fn youtube_client_id() -> Option<String> {
    env::var("YOUTUBE_CLIENT_ID")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.contains(CLIENT_ID_PLACEHOLDER))
}

/// Returns the YouTube Data API base URL (`YOUTUBE_API_URL`).
pub fn youtube_api_url() -> String {
    var_or("YOUTUBE_API_URL", DEFAULT_API_URL)
}

/// Returns the OAuth authorization endpoint (`YOUTUBE_AUTH_URL`).
pub fn youtube_auth_url() -> String {
    var_or("YOUTUBE_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the scope requested during authorization (`YOUTUBE_AUTH_SCOPE`).
pub fn youtube_auth_scope() -> String {
    var_or("YOUTUBE_AUTH_SCOPE", DEFAULT_AUTH_SCOPE)
}

/// Returns the OAuth redirect URI (`YOUTUBE_REDIRECT_URI`).
///
/// This must match the redirect URI registered for the client and must point
/// at the `/callback` route of the local server.
pub fn youtube_redirect_uri() -> String {
    var_or("YOUTUBE_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the bind address of the local callback server (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the external token command, if configured (`TOKEN_COMMAND`).
///
/// When set, tokens are obtained by running this command (for example
/// `gcloud auth print-access-token`) instead of the browser redirect flow.
pub fn token_command() -> Option<String> {
    env::var("TOKEN_COMMAND")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the command that revokes a token of the token command, if configured
/// (`TOKEN_REVOKE_COMMAND`).
///
/// The token is handed to the command in the `TUBESTASH_TOKEN` environment
/// variable.
pub fn token_revoke_command() -> Option<String> {
    env::var("TOKEN_REVOKE_COMMAND")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the OAuth token revocation endpoint (`YOUTUBE_REVOKE_URL`).
pub fn youtube_revoke_url() -> String {
    var_or("YOUTUBE_REVOKE_URL", DEFAULT_REVOKE_URL)
}

/// Returns how long an awaited authorization flow may take (`AUTH_TIMEOUT_SECS`).
pub fn auth_timeout() -> Duration {
    let secs = env::var("AUTH_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_AUTH_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Returns the base name shared by all managed playlists (`PLAYLIST_BASE_NAME`).
pub fn playlist_base_name() -> String {
    var_or("PLAYLIST_BASE_NAME", DEFAULT_PLAYLIST_BASE_NAME)
}

/// Returns the description given to created playlists (`PLAYLIST_DESCRIPTION`).
pub fn playlist_description() -> String {
    var_or("PLAYLIST_DESCRIPTION", DEFAULT_PLAYLIST_DESCRIPTION)
}
