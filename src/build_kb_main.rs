//! Builds the knowledge snapshot: embeds the seed guideline corpus through
//! the configured endpoint and writes the `index.vec` / `texts.json` pair.
//!
//! Run it whenever the corpus or the embedding model changes; the server
//! picks the new snapshot up on its next start.

use anyhow::Context;

use codesmith_backend::core::config::{AppPaths, Settings};
use codesmith_backend::core::logging;
use codesmith_backend::embedding::{EmbeddingProvider, OpenAiEmbeddings};
use codesmith_backend::retrieval::snapshot;

const SEED_DOCUMENTS: [&str; 9] = [
    "Clarify intent before writing code: restate the goal, the target language, and the shape of \
     the deliverable (script, library, web service). Ask for constraints such as runtime version \
     or dependency limits when they are missing.",
    "Structure code for the next reader: descriptive names, small functions with one purpose \
     each, and modules grouped by responsibility. Follow the dominant style guide of the target \
     language.",
    "Validate all inputs and handle the unhappy paths explicitly. Cover empty values, \
     out-of-range numbers, and malformed data instead of assuming callers behave.",
    "Treat security as a default: never hardcode credentials, sanitize anything that reaches a \
     shell or a query, and prefer TLS plus token-based authentication for network code.",
    "Document the surface, not the obvious: a short usage note per public entry point and a \
     comment wherever intent cannot be read from the code itself.",
    "Deliver complete, runnable snippets: include the imports, keep indentation consistent, and \
     strip debugging leftovers before presenting the result.",
    "Make behavior configurable instead of baked in: lift tunable values into parameters or \
     configuration, and mark the intended extension points.",
    "Keep quality visible: code should pass the standard linter of its language, contain no dead \
     branches, and ship with a minimal test or a usage example.",
    "When a request is ambiguous, state the assumption chosen, note the main alternative, and \
     proceed; an explicit assumption beats a silent guess.",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = AppPaths::new();
    logging::init(&paths);

    let settings = Settings::load(&paths);
    let embedder = OpenAiEmbeddings::new(&settings.embedding)
        .context("embedding client construction failed")?;

    tracing::info!(
        documents = SEED_DOCUMENTS.len(),
        model = %settings.embedding.model,
        "embedding seed corpus"
    );

    let mut vectors = Vec::with_capacity(SEED_DOCUMENTS.len());
    for (position, text) in SEED_DOCUMENTS.iter().enumerate() {
        let vector = embedder
            .embed(text)
            .await
            .with_context(|| format!("embedding document {position} failed"))?;
        vectors.push(vector);
    }

    let texts: Vec<String> = SEED_DOCUMENTS.iter().map(|s| s.to_string()).collect();
    snapshot::write(&paths.knowledge_dir, &vectors, &texts)
        .context("writing the snapshot failed")?;

    tracing::info!(
        dir = %paths.knowledge_dir.display(),
        count = vectors.len(),
        dimension = vectors.first().map(Vec::len).unwrap_or(0),
        "knowledge snapshot written"
    );

    Ok(())
}
