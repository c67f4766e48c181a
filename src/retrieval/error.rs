use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Per-query failures inside the retrieval pipeline.
///
/// These are recoverable: one bad query must never take the index or the
/// server down with it. Startup-time snapshot problems live in
/// [`LoadError`](super::snapshot::LoadError) instead.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cannot build an index from an empty vector set")]
    EmptyIndex,

    #[error("invalid k={k} for an index of {len} vectors")]
    InvalidK { k: usize, len: usize },

    #[error("position {position} is out of range for {len} stored texts")]
    OutOfRange { position: usize, len: usize },

    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}
