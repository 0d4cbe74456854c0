//! # LoreClaw Ingestion
//!
//! Turns raw text into deduplicated, embedded passages in the
//! [`loreclaw_index::KnowledgeStore`].
//!
//! ```text
//! text ──chunk──▶ chunks ──embed──▶ vectors ──dedup check──▶ insert
//! ```
//!
//! Entry points: [`Ingestor::add`] for arbitrary text,
//! [`Ingestor::update_with_news`] for topic feeds (never fatal), and
//! [`Ingestor::add_document`] for extracted documents (extraction failures
//! surface to the caller).

pub mod chunker;
pub mod ingest;

pub use chunker::chunk;
pub use ingest::Ingestor;
