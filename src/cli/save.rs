use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::{Context, queue::enqueue_inputs},
    error, info, success,
    types::PendingVideo,
    warning,
};

pub async fn add(inputs: Vec<String>) {
    let ctx = Context::load().await;
    let added = enqueue_inputs(&ctx.queue, &inputs, None).await;
    if added.is_empty() {
        return;
    }

    if let Err(e) = ctx.queue.persist().await {
        warning!("Failed to save pending queue: {}", e);
    }
    run(&ctx, added).await;
}

pub async fn save() {
    let ctx = Context::load().await;
    let pending = ctx.queue.all().await;
    if pending.is_empty() {
        info!("No pending videos.");
        return;
    }

    run(&ctx, pending).await;
}

async fn run(ctx: &Context, videos: Vec<PendingVideo>) {
    let total = videos.len();

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30.blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Saving...");

    let result = ctx
        .coordinator
        .run_batch(videos, |progress| {
            pb.inc(1);
            if let Some(reason) = progress.outcome.failure() {
                pb.suspend(|| {
                    warning!(
                        "{} ({}): {}",
                        progress.video.display_title,
                        progress.video.video_id,
                        reason
                    )
                });
            }
        })
        .await;
    pb.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => error!("Authorization failed, nothing was saved. Err: {}", e),
    };

    if summary.failed == 0 {
        success!("Done: {} saved", summary.succeeded);
    } else {
        warning!(
            "Done: {} saved, {} failed ({} still pending)",
            summary.succeeded,
            summary.failed,
            summary.remaining.len()
        );
    }

    if ctx.session.quota_halted() {
        warning!("The YouTube API quota is used up. Run `tubestash save` again later.");
    }
}
