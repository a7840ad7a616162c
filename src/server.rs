use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::watch};

use crate::{api, error::AuthError, youtube::auth::AuthFlowStatus};

/// Shared state of one authorization flow, handed to the callback handlers.
#[derive(Clone)]
pub struct CallbackState {
    pub expected_state: String,
    pub status: Arc<watch::Sender<AuthFlowStatus>>,
}

impl CallbackState {
    /// Publishes the flow result unless one was already published.
    pub fn settle(&self, status: AuthFlowStatus) -> bool {
        self.status.send_if_modified(|current| {
            if matches!(current, AuthFlowStatus::Pending) {
                *current = status;
                true
            } else {
                false
            }
        })
    }
}

pub async fn bind(addr: &str) -> Result<TcpListener, String> {
    TcpListener::bind(addr).await.map_err(|e| e.to_string())
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/token", get(api::token))
        .layer(Extension(state))
}

/// Serves the callback routes until the flow has a result.
pub async fn serve_callback(listener: TcpListener, state: CallbackState) {
    let mut status = state.status.subscribe();
    let shutdown = async move {
        loop {
            let settled = !matches!(*status.borrow_and_update(), AuthFlowStatus::Pending);
            if settled || status.changed().await.is_err() {
                break;
            }
        }
    };

    let app = router(state.clone());
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        state.settle(AuthFlowStatus::Failed(AuthError::Flow(e.to_string())));
    }
}
