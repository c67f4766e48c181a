use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::retrieval::{RetrievalError, Retriever};

/// Produces a completion for a fully assembled prompt.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("context retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("chat endpoint returned no content")]
    EmptyResponse,

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Pulls the first fenced code block out of a model reply.
///
/// Replies without any fence come back whole; models often skip the fence
/// for one-liners and the raw text is still the best answer we have.
pub struct CodeExtractor {
    fence: Regex,
}

impl CodeExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            fence: Regex::new(r"(?s)```[^\n]*\n(.*?)\n```")?,
        })
    }

    pub fn extract(&self, reply: &str) -> String {
        match self.fence.captures(reply).and_then(|caps| caps.get(1)) {
            Some(block) => block.as_str().to_string(),
            None => reply.to_string(),
        }
    }
}

/// Orchestrates one code-generation round: retrieve context, assemble the
/// prompt, call the model, extract the code.
pub struct CodeGenerator {
    retriever: Arc<Retriever>,
    chat: Arc<dyn ChatProvider>,
    extractor: CodeExtractor,
    top_k: usize,
}

impl CodeGenerator {
    pub fn new(
        retriever: Arc<Retriever>,
        chat: Arc<dyn ChatProvider>,
        top_k: usize,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            retriever,
            chat,
            extractor: CodeExtractor::new()?,
            top_k,
        })
    }

    /// Generates code for `request`.
    ///
    /// Without an explicit `top_k` the configured default applies, capped at
    /// the corpus size so a small snapshot stays usable. An explicit value
    /// is taken literally and can fail with `InvalidK`.
    pub async fn generate(
        &self,
        request: &str,
        top_k: Option<usize>,
    ) -> Result<String, GenerationError> {
        let k = top_k.unwrap_or_else(|| self.top_k.min(self.retriever.document_count()));
        let context = self.retriever.retrieve(request, k).await?;
        let prompt = build_prompt(&context, request);

        tracing::debug!(k, prompt_chars = prompt.len(), "requesting completion");
        let reply = self.chat.complete(&prompt).await?;
        Ok(self.extractor.extract(&reply))
    }

    pub fn document_count(&self) -> usize {
        self.retriever.document_count()
    }

    pub fn dimension(&self) -> usize {
        self.retriever.dimension()
    }
}

fn build_prompt(context: &str, request: &str) -> String {
    format!(
        "[Knowledge Base]\n{context}\n\n\
         [User Request]\n{request}\n\n\
         [Instructions]\n\
         Follow the knowledge base guidance above. Reply with one complete, \
         working solution inside a fenced code block; add prose only if the \
         request asks for an explanation.\n"
    )
}
