use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, MutexGuard};

use crate::types::PlaylistRef;

/// State shared by every component for the lifetime of one session.
///
/// Holds the in-memory token, the resolved target playlist and the quota halt
/// flag. Nothing here is durable; a new process starts a new session.
#[derive(Debug, Default)]
pub struct Session {
    token: Mutex<Option<String>>,
    target: Mutex<Option<PlaylistRef>>,
    quota_halted: AtomicBool,
    discovery: Mutex<()>,
    rotation: Mutex<()>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    pub async fn set_token(&self, token: String) {
        *self.token.lock().await = Some(token);
    }

    /// Clears the in-memory token and returns what was cached.
    pub async fn take_token(&self) -> Option<String> {
        self.token.lock().await.take()
    }

    pub async fn target(&self) -> Option<PlaylistRef> {
        self.target.lock().await.clone()
    }

    pub async fn set_target(&self, target: PlaylistRef) {
        *self.target.lock().await = Some(target);
    }

    pub async fn clear_target(&self) {
        *self.target.lock().await = None;
    }

    pub fn quota_halted(&self) -> bool {
        self.quota_halted.load(Ordering::SeqCst)
    }

    /// Sets the quota halt flag. Returns `true` only for the call that tripped it.
    pub fn halt_quota(&self) -> bool {
        !self.quota_halted.swap(true, Ordering::SeqCst)
    }

    /// Serializes target discovery within this session.
    pub async fn discovery_guard(&self) -> MutexGuard<'_, ()> {
        self.discovery.lock().await
    }

    /// Serializes playlist rotations within this session.
    pub async fn rotation_guard(&self) -> MutexGuard<'_, ()> {
        self.rotation.lock().await
    }
}
