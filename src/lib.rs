/// formrecall — contextual memory retrieval and relevance ranking engine
///
/// Given a user id and a free-text prompt, retrieves prior interaction
/// memories from a remote store, re-ranks them with a composite relevance
/// score, and synthesizes a compact insight string used to enrich downstream
/// AI prompts. The remote store owns persistence and raw text search; this
/// crate owns query composition, ranking, and synthesis.

pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod insight;
pub mod keywords;
pub mod logging;
pub mod query;
pub mod scoring;

pub use client::{MemoryStoreClient, SearchResult};
pub use engine::RecallEngine;
pub use errors::MemoryError;
pub use keywords::extract_keywords;
