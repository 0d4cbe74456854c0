//! # LoreClaw Adapters
//!
//! Network-backed implementations of the `loreclaw-core` capability traits:
//!
//! - [`OpenAiEmbeddings`]: OpenAI-compatible `/embeddings` endpoint
//! - [`OpenAiGenerator`]: OpenAI-compatible `/chat/completions` endpoint
//! - [`DuckDuckGoSearch`]: HTML search, no API key required
//! - [`SearchNewsFeed`]: news feed built over any web search adapter
//! - [`PlainTextExtractor`]: UTF-8 text files; the seam where a real PDF
//!   extractor plugs in (binary formats are out of scope)

pub mod embeddings;
pub mod extract;
pub mod generate;
pub mod news;
pub mod web;

pub use embeddings::OpenAiEmbeddings;
pub use extract::PlainTextExtractor;
pub use generate::OpenAiGenerator;
pub use news::SearchNewsFeed;
pub use web::DuckDuckGoSearch;
