use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{server::CallbackState, youtube::auth::AuthFlowStatus};

pub async fn health(Extension(state): Extension<CallbackState>) -> Json<Value> {
    let flow = match &*state.status.borrow() {
        AuthFlowStatus::Pending => "pending",
        AuthFlowStatus::Completed(_) => "completed",
        AuthFlowStatus::Failed(_) => "failed",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "flow": flow
    }))
}
