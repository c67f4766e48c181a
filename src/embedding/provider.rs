use async_trait::async_trait;
use thiserror::Error;

/// Turns a piece of text into a fixed-dimension embedding vector.
///
/// The retriever depends only on this trait, which keeps the HTTP client
/// swappable and lets tests inject deterministic stubs.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("embedding endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("embedding endpoint returned no vector")]
    Empty,
}
