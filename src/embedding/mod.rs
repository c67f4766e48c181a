//! Query embedding through a remote OpenAI-compatible endpoint.

mod openai;
mod provider;

pub use openai::OpenAiEmbeddings;
pub use provider::{EmbeddingError, EmbeddingProvider};
