//! LoreClaw error types.

use thiserror::Error;

/// Result type alias for LoreClaw operations.
pub type Result<T> = std::result::Result<T, LoreClawError>;

/// Errors that can occur across the LoreClaw crates.
#[derive(Error, Debug)]
pub enum LoreClawError {
    /// A passage id already exists in the store. Ids are generated with
    /// uuid v4, so hitting this signals an internal invariant violation
    /// rather than an expected condition.
    #[error("duplicate passage id: {0}")]
    DuplicateId(String),

    /// An embedding vector did not match the store's dimensionality.
    #[error("embedding dimension mismatch: store holds {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Document extraction failed. Surfaced to the caller because no content
    /// was ingested; aborts that one document only.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// A web search, news, or embedding collaborator failed or timed out.
    /// Retrieval and news ingestion recover from this locally as an empty
    /// result; it is never fatal on those paths.
    #[error("adapter unavailable: {0}")]
    Adapter(String),

    /// A generation provider returned an error response.
    #[error("provider error: {0}")]
    Provider(String),

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(String),

    /// Configuration could not be read, parsed, or written.
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
