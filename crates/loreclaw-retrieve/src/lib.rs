//! # LoreClaw Retrieval
//!
//! The hybrid retriever: merges knowledge-store hits with live web snippets
//! into one ranked, deduplicated, budget-bounded context set, and assembles
//! the hand-off to answer synthesis.
//!
//! ```text
//! question ──embed──▶ KB top-k ─┐
//!                               ├─▶ merge ▶ rank ▶ dedup ▶ truncate ▶ context
//! question ──search──▶ web top-k ┘
//! ```
//!
//! Adapter failures on this path are never fatal: a dead web search or
//! embedding endpoint degrades the corresponding leg to empty, and an empty
//! overall result is a valid outcome.

pub mod context;
pub mod recency;
pub mod retriever;

pub use context::{build_synthesis_request, Assistant, DEFAULT_INSTRUCTIONS};
pub use recency::KeywordRecencyClassifier;
pub use retriever::HybridRetriever;
