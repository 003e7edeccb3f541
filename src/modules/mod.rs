use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub mod asset;
pub mod project;
pub mod render;

/// Liveness plus a quick look at the collaborators the editor depends on.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.documents.ping().await {
        Ok(()) => json!({"backend": state.documents.backend(), "status": "connected"}),
        Err(e) => json!({"backend": state.documents.backend(), "status": "error", "detail": e.to_string()}),
    };

    let engine = state.engine.clone();
    let engine_available = tokio::task::spawn_blocking(move || engine.is_available())
        .await
        .unwrap_or(false);

    Json(json!({
        "backend": "running",
        "database": database,
        "engine": {"name": state.engine.name(), "available": engine_available},
    }))
}
