use std::sync::Arc;

use crate::{
    error,
    management::{CredentialProvider, FileStore, PendingQueue, Session},
    youtube::{
        auth::issuer_from_env,
        batch::BatchCoordinator,
        client::{PlaylistApi, YouTubeClient},
        directory::{PlaylistDirectory, PlaylistNaming},
        enqueue::Enqueuer,
    },
};

/// Everything one command invocation needs, wired from the environment.
///
/// One `Context` is one session: the token cache, the target playlist and
/// the quota halt live exactly as long as it does.
pub struct Context {
    pub session: Arc<Session>,
    pub credentials: Arc<CredentialProvider>,
    pub queue: Arc<PendingQueue>,
    pub coordinator: BatchCoordinator,
}

impl Context {
    pub async fn load() -> Self {
        let queue = match PendingQueue::load(PendingQueue::default_path()).await {
            Ok(queue) => Arc::new(queue),
            Err(e) => error!("Failed to load pending queue. Err: {}", e),
        };

        let session = Arc::new(Session::new());
        let credentials = Arc::new(CredentialProvider::new(
            issuer_from_env(),
            Arc::new(FileStore::default()),
            Arc::clone(&session),
        ));

        let api: Arc<dyn PlaylistApi> = Arc::new(YouTubeClient::from_env());
        let directory = Arc::new(PlaylistDirectory::new(
            Arc::clone(&api),
            Arc::clone(&session),
            PlaylistNaming::from_env(),
        ));
        let enqueuer = Arc::new(Enqueuer::new(
            api,
            Arc::clone(&session),
            directory,
            Arc::clone(&credentials),
        ));
        let coordinator = BatchCoordinator::new(
            Arc::clone(&credentials),
            enqueuer,
            Arc::clone(&session),
            queue.clone(),
        );

        Self {
            session,
            credentials,
            queue,
            coordinator,
        }
    }
}
