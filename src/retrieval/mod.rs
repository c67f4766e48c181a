//! Exact-retrieval core: the vector index, the snippet store, the snapshot
//! codec, and the query-time retriever that ties them together.

mod error;
mod index;
mod knowledge;
mod retriever;
pub mod snapshot;

pub use error::RetrievalError;
pub use index::VectorIndex;
pub use knowledge::KnowledgeStore;
pub use retriever::Retriever;
pub use snapshot::LoadError;
