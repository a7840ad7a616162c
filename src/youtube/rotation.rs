use std::sync::Arc;

use crate::{
    error::DirectoryError,
    info,
    management::Session,
    types::PlaylistRef,
    youtube::{
        client::PlaylistApi,
        directory::{PlaylistNaming, create_playlist, list_matching, select_highest},
    },
};

/// Moves the target to the next playlist in the naming sequence.
pub struct OverflowRotator {
    api: Arc<dyn PlaylistApi>,
    session: Arc<Session>,
    naming: PlaylistNaming,
}

impl OverflowRotator {
    pub fn new(api: Arc<dyn PlaylistApi>, session: Arc<Session>, naming: PlaylistNaming) -> Self {
        Self {
            api,
            session,
            naming,
        }
    }

    /// Repoints the target to a playlist after `exhausted`.
    ///
    /// Clears the cached target and re-lists the playlists from scratch; cached
    /// item counts are not trusted here. Rotations within a session run one at
    /// a time.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token for the remote API
    /// * `exhausted` - The playlist that was reported full, if known
    ///
    /// # Returns
    ///
    /// - `Ok(PlaylistRef)` - The new target, cached in the session
    /// - `Err(DirectoryError)` - Listing or creation failed, or the quota halt
    ///   is set
    ///
    /// # Successor Selection
    ///
    /// - A listed playlist with a higher ordinal than `exhausted` that still
    ///   has room is adopted (another rotation got there first)
    /// - Otherwise the playlist after the highest ordinal seen is created,
    ///   counting `exhausted` even when the listing no longer shows it
    pub async fn rotate(
        &self,
        token: &str,
        exhausted: Option<&PlaylistRef>,
    ) -> Result<PlaylistRef, DirectoryError> {
        let _rotation = self.session.rotation_guard().await;
        self.session.clear_target().await;

        if self.session.quota_halted() {
            return Err(DirectoryError::QuotaHalted);
        }

        let matching =
            list_matching(self.api.as_ref(), &self.session, token, &self.naming).await?;

        if let Some(exhausted) = exhausted {
            let newer: Vec<PlaylistRef> = matching
                .iter()
                .filter(|p| p.ordinal > exhausted.ordinal && !self.naming.is_full(p))
                .cloned()
                .collect();
            if let Some(newer) = select_highest(&newer) {
                info!("Switching to playlist \"{}\"", newer.title);
                let target = newer.clone();
                self.session.set_target(target.clone()).await;
                return Ok(target);
            }
        }

        let max_seen = matching
            .iter()
            .map(|p| p.ordinal)
            .chain(exhausted.map(|p| p.ordinal))
            .max()
            .unwrap_or(0);

        let target = create_playlist(
            self.api.as_ref(),
            &self.session,
            token,
            &self.naming,
            max_seen + 1,
        )
        .await?;
        info!("Created playlist \"{}\"", target.title);

        self.session.set_target(target.clone()).await;
        Ok(target)
    }
}
