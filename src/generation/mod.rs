//! Prompt assembly and chat-completion calls around the retrieval core.

mod generator;
mod openai;

pub use generator::{ChatProvider, CodeExtractor, CodeGenerator, GenerationError};
pub use openai::OpenAiChat;
