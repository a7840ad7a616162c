use tabled::Table;

use crate::{
    error, info,
    management::PendingQueue,
    success,
    types::{PendingTableRow, PendingVideo, SourceHandle},
    utils, warning,
};

async fn load_queue() -> PendingQueue {
    match PendingQueue::load(PendingQueue::default_path()).await {
        Ok(queue) => queue,
        Err(e) => error!("Failed to load pending queue. Err: {}", e),
    }
}

async fn persist_queue(queue: &PendingQueue) {
    if let Err(e) = queue.persist().await {
        error!("Failed to save pending queue. Err: {}", e);
    }
}

/// Queues every input that names a video. Returns the newly queued entries.
pub(crate) async fn enqueue_inputs(
    queue: &PendingQueue,
    inputs: &[String],
    title: Option<&str>,
) -> Vec<PendingVideo> {
    let mut added = Vec::new();
    for input in inputs {
        let Some(video_id) = utils::extract_video_id(input) else {
            warning!("Not a YouTube video: {}", input);
            continue;
        };

        let display_title = title.unwrap_or(input.as_str());
        match queue.add(&video_id, display_title).await {
            Some(video) => added.push(video),
            None => info!("Video {} is already pending", video_id),
        }
    }
    added
}

pub async fn queue_add(inputs: Vec<String>, title: Option<String>) {
    let queue = load_queue().await;
    let added = enqueue_inputs(&queue, &inputs, title.as_deref()).await;
    if added.is_empty() {
        return;
    }

    persist_queue(&queue).await;
    success!("Queued {} video(s), {} pending.", added.len(), queue.count().await);
}

pub async fn queue_list() {
    let queue = load_queue().await;
    let pending = queue.all().await;
    if pending.is_empty() {
        info!("No pending videos.");
        return;
    }

    let rows: Vec<PendingTableRow> = pending
        .into_iter()
        .map(|v| PendingTableRow {
            handle: v.source_handle.to_string(),
            video: v.video_id,
            title: v.display_title,
            added: v.added_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub async fn queue_remove(handle: u64) {
    let queue = load_queue().await;
    if !queue.remove(SourceHandle(handle)).await {
        warning!("No pending video with handle {}", handle);
        return;
    }

    persist_queue(&queue).await;
    success!("Removed pending video {}.", handle);
}

pub async fn queue_clear() {
    let queue = load_queue().await;
    queue.clear().await;
    persist_queue(&queue).await;
    success!("Pending queue cleared.");
}
