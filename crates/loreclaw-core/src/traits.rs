//! Capability traits at the engine boundary.
//!
//! The retrieval core only depends on these seams; `loreclaw-adapters`
//! provides network-backed implementations and tests provide deterministic
//! in-process doubles. Every method returns an error as a value; the core
//! decides per the retrieval contract whether a failure propagates
//! (`DocumentExtractor`) or degrades to an empty result (everything else on
//! the read path).

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::{NewsItem, SearchSnippet, SynthesisRequest};

/// Maps text to a fixed-length vector. Must be deterministic for identical
/// input text; every embedding feeding one store shares `dimension()`.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// The dimensionality of every vector this provider produces.
    fn dimension(&self) -> usize;
}

/// Returns ranked snippets for a query string. "No results" is an empty
/// Vec, never an error.
#[async_trait]
pub trait WebSearchAdapter: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchSnippet>>;
}

/// Returns recent articles for a topic.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch(&self, topic: &str) -> Result<Vec<NewsItem>>;
}

/// Extracts full text from a document on disk. Failure is an
/// [`crate::LoreClawError::Extraction`] and must reach the caller: nothing
/// was ingested.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String>;
}

/// Consumes the assembled context and produces an answer. The generation
/// algorithm itself is outside the engine's scope.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &SynthesisRequest) -> Result<String>;
}

/// Decides whether a question depends on current/live information.
///
/// Deliberately a seam rather than core logic: the exact heuristic is not
/// load-bearing for retrieval correctness, so callers can swap in anything
/// from keyword cues to a learned classifier.
pub trait RecencyClassifier: Send + Sync {
    fn is_recency_sensitive(&self, question: &str) -> bool;
}
