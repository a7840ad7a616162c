use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::{
    config,
    error::ApiError,
    types::{
        ApiErrorResponse, CreatePlaylistRequest, CreatePlaylistResponse, InsertPlaylistItemRequest,
        PlaylistItemListResponse, PlaylistItemSnippet, PlaylistListResponse, PlaylistPage,
        PlaylistSnippet, PlaylistStatus, RemotePlaylist, ResourceId,
    },
};

/// Largest page the playlist listing endpoint hands out.
const MAX_RESULTS: &str = "50";

/// The remote playlist operations the core depends on.
///
/// Every method takes the bearer token of the current batch and reports
/// failures as an [`ApiError`]; callers branch on [`ApiError::kind`].
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Lists one page of the account's own playlists with their item counts.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token
    /// * `page_token` - Continuation token from the previous page, `None` for
    ///   the first page
    ///
    /// # Returns
    ///
    /// - `Ok(PlaylistPage)` - The playlists of this page and the token of the
    ///   next one, `None` on the last page
    /// - `Err(ApiError)` - Transport failure or an error response
    async fn list_playlists(
        &self,
        token: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, ApiError>;

    /// Creates a private playlist.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token
    /// * `title` - Title of the new playlist, e.g. "Watch Later 3"
    /// * `description` - Description shown on the playlist page
    ///
    /// # Returns
    ///
    /// - `Ok(RemotePlaylist)` - The created playlist with an item count of 0
    /// - `Err(ApiError)` - Transport failure or an error response
    async fn create_playlist(
        &self,
        token: &str,
        title: &str,
        description: &str,
    ) -> Result<RemotePlaylist, ApiError>;

    /// Whether the playlist already contains the video.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` - At least one item of the playlist is the video
    /// - `Ok(false)` - The video is not in the playlist
    /// - `Err(ApiError)` - The lookup failed; callers may insert anyway
    async fn find_playlist_item(
        &self,
        token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, ApiError>;

    /// Appends the video to the end of the playlist.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token
    /// * `playlist_id` - Id of the target playlist
    /// * `video_id` - The 11-character video id
    ///
    /// # Errors
    ///
    /// A full playlist comes back as [`FailureKind::Capacity`], an exhausted
    /// quota as [`FailureKind::QuotaExceeded`] and a rejected token as
    /// [`FailureKind::Unauthorized`].
    ///
    /// [`FailureKind::Capacity`]: crate::error::FailureKind::Capacity
    /// [`FailureKind::QuotaExceeded`]: crate::error::FailureKind::QuotaExceeded
    /// [`FailureKind::Unauthorized`]: crate::error::FailureKind::Unauthorized
    async fn insert_playlist_item(
        &self,
        token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ApiError>;
}

/// [`PlaylistApi`] over the YouTube Data API v3.
///
/// # API Endpoints
///
/// - `GET /playlists?mine=true&part=snippet,contentDetails` - Listing, 50
///   playlists per page
/// - `POST /playlists?part=snippet,status` - Creation with privacy status
///   `private`
/// - `GET /playlistItems?part=id&playlistId=..&videoId=..` - Duplicate check
/// - `POST /playlistItems?part=snippet` - Insertion
///
/// # Error Handling
///
/// Non-2xx responses are decoded into the API's error envelope and
/// classified by [`ApiError::from_response`]. A body that is not an error
/// envelope still yields an error carrying the status code.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::youtube_api_url())
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

/// Passes success responses through and classifies everything else.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .json::<ApiErrorResponse>()
        .await
        .unwrap_or_default();
    Err(ApiError::from_response(status.as_u16(), &body))
}

#[async_trait]
impl PlaylistApi for YouTubeClient {
    async fn list_playlists(
        &self,
        token: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, ApiError> {
        let mut request = self
            .client
            .get(self.url("playlists"))
            .bearer_auth(token)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("mine", "true"),
                ("maxResults", MAX_RESULTS),
            ]);
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = check(request.send().await?).await?;
        let res = response.json::<PlaylistListResponse>().await?;

        Ok(PlaylistPage {
            items: res.items.into_iter().map(RemotePlaylist::from).collect(),
            next_page_token: res.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn create_playlist(
        &self,
        token: &str,
        title: &str,
        description: &str,
    ) -> Result<RemotePlaylist, ApiError> {
        let body = CreatePlaylistRequest {
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: Some(description.to_string()),
            },
            status: PlaylistStatus {
                privacy_status: "private".to_string(),
            },
        };

        let response = self
            .client
            .post(self.url("playlists"))
            .bearer_auth(token)
            .query(&[("part", "snippet,status")])
            .json(&body)
            .send()
            .await?;
        let res = check(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await?;

        Ok(RemotePlaylist {
            id: res.id,
            title: res.snippet.title,
            item_count: 0,
        })
    }

    async fn find_playlist_item(
        &self,
        token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, ApiError> {
        let response = self
            .client
            .get(self.url("playlistItems"))
            .bearer_auth(token)
            .query(&[
                ("part", "id"),
                ("playlistId", playlist_id),
                ("videoId", video_id),
                ("maxResults", "1"),
            ])
            .send()
            .await?;
        let res = check(response)
            .await?
            .json::<PlaylistItemListResponse>()
            .await?;

        Ok(!res.items.is_empty())
    }

    async fn insert_playlist_item(
        &self,
        token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ApiError> {
        let body = InsertPlaylistItemRequest {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        };

        let response = self
            .client
            .post(self.url("playlistItems"))
            .bearer_auth(token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
