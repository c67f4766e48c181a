use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::generation::GenerationError;
use crate::retrieval::RetrievalError;
use crate::state::{AppState, GeneratorState};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let generator = match &state.generator {
        GeneratorState::Ready(generator) => generator.clone(),
        GeneratorState::Degraded { reason } => {
            return Err(ApiError::ServiceUnavailable(format!(
                "generation disabled: {reason}"
            )));
        }
    };

    let code = generator
        .generate(prompt, request.top_k)
        .await
        .map_err(api_error_for)?;

    Ok(Json(json!({ "code": code })))
}

/// One failing request must not look like a failing service: caller mistakes
/// become 400s, provider trouble becomes 502s, and only contract violations
/// inside the pipeline surface as 500s.
fn api_error_for(err: GenerationError) -> ApiError {
    let message = err.to_string();
    match err {
        GenerationError::Retrieval(RetrievalError::InvalidK { .. }) => {
            ApiError::BadRequest(message)
        }
        GenerationError::Retrieval(RetrievalError::Embedding(_))
        | GenerationError::Request(_)
        | GenerationError::Api { .. }
        | GenerationError::EmptyResponse => ApiError::Upstream(message),
        GenerationError::Retrieval(_) | GenerationError::Pattern(_) => {
            ApiError::Internal(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::embedding::EmbeddingError;

    use super::*;

    #[test]
    fn invalid_k_is_the_callers_fault() {
        let err = GenerationError::Retrieval(RetrievalError::InvalidK { k: 9, len: 3 });
        assert!(matches!(api_error_for(err), ApiError::BadRequest(_)));
    }

    #[test]
    fn provider_trouble_maps_to_upstream() {
        let embed = GenerationError::Retrieval(RetrievalError::Embedding(EmbeddingError::Empty));
        assert!(matches!(api_error_for(embed), ApiError::Upstream(_)));

        let empty = GenerationError::EmptyResponse;
        assert!(matches!(api_error_for(empty), ApiError::Upstream(_)));
    }

    #[test]
    fn dimension_drift_is_internal() {
        let err = GenerationError::Retrieval(RetrievalError::DimensionMismatch {
            expected: 2,
            actual: 3,
        });
        match api_error_for(err) {
            ApiError::Internal(message) => {
                assert!(message.contains("expected 2"), "message: {message}");
                assert!(message.contains("got 3"), "message: {message}");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
