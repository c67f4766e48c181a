use std::sync::Arc;

use crate::core::config::{AppPaths, Settings};
use crate::embedding::OpenAiEmbeddings;
use crate::generation::{CodeGenerator, OpenAiChat};
use crate::retrieval::{snapshot, Retriever};

pub mod error;

use error::InitializationError;

/// How far startup got.
///
/// A failed snapshot load or client build leaves the service running in
/// `Degraded`: every generate call is refused with the recorded reason while
/// health and status endpoints keep answering. A restart after fixing the
/// snapshot is the recovery path.
pub enum GeneratorState {
    Ready(Arc<CodeGenerator>),
    Degraded { reason: String },
}

/// Application state shared across all routes.
///
/// Built once at startup and handed to the router behind an `Arc`. Nothing
/// in here mutates afterwards, so the read path needs no locks.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub generator: GeneratorState,
}

impl AppState {
    pub fn initialize(paths: Arc<AppPaths>) -> Arc<Self> {
        let settings = Settings::load(&paths);

        let generator = match build_generator(&paths, &settings) {
            Ok(generator) => {
                tracing::info!(
                    documents = generator.document_count(),
                    dimension = generator.dimension(),
                    "retrieval pipeline ready"
                );
                GeneratorState::Ready(Arc::new(generator))
            }
            Err(err) => {
                tracing::error!("Startup left generation disabled: {}", err);
                GeneratorState::Degraded {
                    reason: err.to_string(),
                }
            }
        };

        Arc::new(AppState {
            paths,
            settings,
            generator,
        })
    }
}

fn build_generator(
    paths: &AppPaths,
    settings: &Settings,
) -> Result<CodeGenerator, InitializationError> {
    let embedder =
        OpenAiEmbeddings::new(&settings.embedding).map_err(InitializationError::Embedding)?;

    let (index, store) = snapshot::load(&paths.knowledge_dir)?;
    let retriever = Retriever::new(Arc::new(embedder), index, store)?;

    let chat = OpenAiChat::new(&settings.generation).map_err(InitializationError::Chat)?;

    CodeGenerator::new(
        Arc::new(retriever),
        Arc::new(chat),
        settings.retrieval.top_k,
    )
    .map_err(InitializationError::Generator)
}
