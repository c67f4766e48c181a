//! Retrieval-augmented code generation service.
//!
//! A fixed corpus of coding guidelines is embedded offline into a snapshot
//! by the `build_kb` binary. At query time the service embeds the prompt,
//! finds the nearest snippets by exact squared-L2 search, and conditions a
//! chat model on them to produce code.

pub mod core;
pub mod embedding;
pub mod generation;
pub mod retrieval;
pub mod server;
pub mod state;
