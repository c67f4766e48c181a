use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::{AppState, GeneratorState};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness plus corpus stats. A degraded service still answers here; the
/// recorded reason tells operators what to fix before restarting.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.generator {
        GeneratorState::Ready(generator) => Json(json!({
            "ready": true,
            "documents": generator.document_count(),
            "dimension": generator.dimension(),
            "embedding_model": state.settings.embedding.model,
            "generation_model": state.settings.generation.model,
        })),
        GeneratorState::Degraded { reason } => Json(json!({
            "ready": false,
            "reason": reason,
        })),
    }
}
