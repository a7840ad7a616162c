use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    config,
    types::{PendingVideo, SourceHandle},
    youtube::batch::HandleCloser,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueState {
    next_handle: u64,
    entries: Vec<PendingVideo>,
}

/// Persistent set of videos waiting to be saved.
///
/// Each entry gets a numeric [`SourceHandle`]; closing a handle removes the
/// entry and writes the queue back to disk.
pub struct PendingQueue {
    path: PathBuf,
    state: Mutex<QueueState>,
}

impl PendingQueue {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(QueueState {
                next_handle: 1,
                entries: Vec::new(),
            }),
        }
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join("state/pending.json")
    }

    /// Loads the queue stored at `path`. A missing file is an empty queue.
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        if !path.is_file() {
            return Ok(Self::new(path));
        }

        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let mut state: QueueState = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        let max_handle = state
            .entries
            .iter()
            .map(|e| e.source_handle.0)
            .max()
            .unwrap_or(0);
        state.next_handle = state.next_handle.max(max_handle + 1);

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let state = self.state.lock().await;
        self.write(&state).await
    }

    async fn write(&self, state: &QueueState) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(state).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Queues a video. Returns `None` if the video is already pending.
    pub async fn add(&self, video_id: &str, display_title: &str) -> Option<PendingVideo> {
        let mut state = self.state.lock().await;
        if state.entries.iter().any(|e| e.video_id == video_id) {
            return None;
        }

        let video = PendingVideo {
            video_id: video_id.to_string(),
            source_handle: SourceHandle(state.next_handle),
            display_title: display_title.to_string(),
            added_at: Utc::now(),
        };
        state.next_handle += 1;
        state.entries.push(video.clone());
        Some(video)
    }

    /// Removes the entry with the given handle. Returns whether it was present.
    pub async fn remove(&self, handle: SourceHandle) -> bool {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|e| e.source_handle != handle);
        state.entries.len() != before
    }

    pub async fn all(&self) -> Vec<PendingVideo> {
        self.state.lock().await.entries.clone()
    }

    pub async fn count(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn clear(&self) {
        self.state.lock().await.entries.clear();
    }
}

#[async_trait]
impl HandleCloser for PendingQueue {
    async fn close(&self, handle: SourceHandle) -> Result<(), String> {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|e| e.source_handle != handle);
        if state.entries.len() == before {
            // already closed
            return Ok(());
        }
        self.write(&state).await
    }
}
