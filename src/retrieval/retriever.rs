use std::sync::Arc;

use crate::embedding::EmbeddingProvider;

use super::error::RetrievalError;
use super::index::VectorIndex;
use super::knowledge::KnowledgeStore;
use super::snapshot::LoadError;

/// Embeds a query, searches the index, and assembles the context block.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    store: KnowledgeStore,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever").finish_non_exhaustive()
    }
}

impl Retriever {
    /// The index and store must describe the same corpus. A length mismatch
    /// would make every positional lookup lie, so it is rejected here even
    /// though the snapshot loader already checks it.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: VectorIndex,
        store: KnowledgeStore,
    ) -> Result<Self, LoadError> {
        if index.len() != store.len() {
            return Err(LoadError::LengthMismatch {
                vectors: index.len(),
                texts: store.len(),
            });
        }
        Ok(Self {
            embedder,
            index,
            store,
        })
    }

    /// Returns the `k` snippets most relevant to `query`, joined with blank
    /// lines, closest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<String, RetrievalError> {
        let embedding = self.embedder.embed(query).await?;
        tracing::debug!(
            query_dim = embedding.len(),
            index_dim = self.index.dimension(),
            "embedded retrieval query"
        );

        let hits = self.index.search(&embedding, k)?;
        let mut sections = Vec::with_capacity(hits.len());
        for (position, _distance) in hits {
            sections.push(self.store.text_at(position)?);
        }
        Ok(sections.join("\n\n"))
    }

    pub fn document_count(&self) -> usize {
        self.index.len()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }
}
