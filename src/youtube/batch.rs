use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    error::AuthError,
    management::{CredentialProvider, Session},
    types::{PendingVideo, SourceHandle},
    warning,
    youtube::enqueue::{EnqueueOutcome, EnqueueStatus, Enqueuer, FailureReason},
};

/// Closes the source a pending video was discovered in.
#[async_trait]
pub trait HandleCloser: Send + Sync {
    /// Already-closed handles are not an error.
    async fn close(&self, handle: SourceHandle) -> Result<(), String>;
}

/// Reported each time one video of a batch settles.
#[derive(Debug)]
pub struct BatchProgress<'a> {
    pub video: &'a PendingVideo,
    pub outcome: &'a EnqueueOutcome,
    pub settled: usize,
    pub total: usize,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Outcomes in the order the calls settled.
    pub outcomes: Vec<EnqueueOutcome>,
    /// Videos that failed and stay pending.
    pub remaining: Vec<PendingVideo>,
}

impl BatchSummary {
    fn record(&mut self, video: &PendingVideo, outcome: EnqueueOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.remaining.push(video.clone());
        }
        self.outcomes.push(outcome);
    }
}

/// Saves a list of pending videos concurrently.
pub struct BatchCoordinator {
    credentials: Arc<CredentialProvider>,
    enqueuer: Arc<Enqueuer>,
    session: Arc<Session>,
    closer: Arc<dyn HandleCloser>,
}

impl BatchCoordinator {
    pub fn new(
        credentials: Arc<CredentialProvider>,
        enqueuer: Arc<Enqueuer>,
        session: Arc<Session>,
        closer: Arc<dyn HandleCloser>,
    ) -> Self {
        Self {
            credentials,
            enqueuer,
            session,
            closer,
        }
    }

    /// Enqueues every video and closes the handles of the ones that made it.
    ///
    /// Authenticates once before any video is touched, then runs all enqueue
    /// calls interleaved on the current task.
    ///
    /// # Arguments
    ///
    /// * `videos` - The pending videos to save
    /// * `on_settled` - Called once per video as its enqueue settles, with a
    ///   running count
    ///
    /// # Returns
    ///
    /// - `Ok(BatchSummary)` - Per-video outcomes in settle order; failed videos
    ///   are listed in `remaining` and their handles stay open
    /// - `Err(AuthError)` - No token could be obtained; nothing was enqueued
    ///
    /// # Failure Handling
    ///
    /// - After a quota halt the batch is refused up front and every video is
    ///   reported as [`FailureReason::QuotaHalted`] without a token lookup
    /// - A token rejected mid-batch is invalidated by the first enqueue that
    ///   sees it; the remaining calls of the batch fail as unauthorized and
    ///   the next batch authenticates again
    /// - A handle that fails to close only logs a warning; the video still
    ///   counts as saved
    pub async fn run_batch<F>(
        &self,
        videos: Vec<PendingVideo>,
        mut on_settled: F,
    ) -> Result<BatchSummary, AuthError>
    where
        F: FnMut(BatchProgress<'_>),
    {
        let total = videos.len();
        let mut summary = BatchSummary::default();

        if self.session.quota_halted() {
            for (i, video) in videos.iter().enumerate() {
                let outcome = EnqueueOutcome {
                    video_id: video.video_id.clone(),
                    playlist: None,
                    status: EnqueueStatus::Failed(FailureReason::QuotaHalted),
                };
                on_settled(BatchProgress {
                    video,
                    outcome: &outcome,
                    settled: i + 1,
                    total,
                });
                summary.record(video, outcome);
            }
            return Ok(summary);
        }

        if videos.is_empty() {
            return Ok(summary);
        }

        let token = self.credentials.get_token(false).await?;
        let token = token.value.as_str();

        let mut in_flight: FuturesUnordered<_> = videos
            .into_iter()
            .map(|video| async move {
                let outcome = self.enqueuer.enqueue(&video.video_id, token).await;
                if outcome.is_success() {
                    if let Err(e) = self.closer.close(video.source_handle).await {
                        warning!("Failed to close handle {}: {}", video.source_handle, e);
                    }
                }
                (video, outcome)
            })
            .collect();

        let mut settled = 0;
        while let Some((video, outcome)) = in_flight.next().await {
            settled += 1;
            on_settled(BatchProgress {
                video: &video,
                outcome: &outcome,
                settled,
                total,
            });
            summary.record(&video, outcome);
        }

        Ok(summary)
    }
}
