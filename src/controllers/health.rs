use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::speech::DispatcherService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(dispatcher): State<Arc<DispatcherService>>) -> impl IntoResponse {
    let settings = dispatcher.settings();

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "bucket": settings.bucket,
            "voices": dispatcher.voice_selector().voices().len(),
            "sync_task_limit": settings.sync_task_limit
        })),
    )
}
