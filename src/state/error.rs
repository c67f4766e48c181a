use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;
use crate::retrieval::LoadError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("failed to load knowledge snapshot: {0}")]
    Snapshot(#[from] LoadError),

    #[error("failed to construct embedding client: {0}")]
    Embedding(#[source] EmbeddingError),

    #[error("failed to construct chat client: {0}")]
    Chat(#[source] GenerationError),

    #[error("failed to construct code generator: {0}")]
    Generator(#[source] GenerationError),
}
