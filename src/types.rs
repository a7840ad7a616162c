use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Opaque reference to where a pending video came from.
///
/// For the command-line front-end this is the numeric handle of the pending
/// queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceHandle(pub u64);

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingVideo {
    pub video_id: String,
    pub source_handle: SourceHandle,
    pub display_title: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrigin {
    Cached,
    Issued,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub origin: TokenOrigin,
}

impl Token {
    pub fn cached(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: TokenOrigin::Cached,
        }
    }

    pub fn issued(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: TokenOrigin::Issued,
        }
    }
}

/// A playlist as reported by the remote API, before its ordinal is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePlaylist {
    pub id: String,
    pub title: String,
    pub item_count: u64,
}

/// One page of the playlist listing.
#[derive(Debug, Clone, Default)]
pub struct PlaylistPage {
    pub items: Vec<RemotePlaylist>,
    pub next_page_token: Option<String>,
}

/// A playlist that follows the naming convention, with its ordinal.
///
/// Ordinal 1 is the unsuffixed base name; `"<base> N"` has ordinal N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub title: String,
    pub ordinal: u32,
    pub item_count: u64,
}

#[derive(Tabled)]
pub struct PendingTableRow {
    pub handle: String,
    pub video: String,
    pub title: String,
    pub added: String,
}

// Wire types of the YouTube Data API v3.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistListResponse {
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<PlaylistResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistSnippet,
    pub content_details: Option<PlaylistContentDetails>,
}

impl From<PlaylistResource> for RemotePlaylist {
    fn from(res: PlaylistResource) -> Self {
        Self {
            id: res.id,
            title: res.snippet.title,
            item_count: res.content_details.map_or(0, |c| c.item_count),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    #[serde(default)]
    pub item_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub snippet: PlaylistSnippet,
    pub status: PlaylistStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatus {
    pub privacy_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItemResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemResource {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPlaylistItemRequest {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub playlist_id: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: String,
    pub video_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub reason: Option<String>,
    pub message: Option<String>,
    pub domain: Option<String>,
}
