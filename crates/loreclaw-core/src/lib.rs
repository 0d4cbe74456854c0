//! # LoreClaw Core
//!
//! Shared foundation for the LoreClaw retrieval engine: the error type,
//! TOML configuration, the passage/query data model, and the capability
//! traits the engine consumes (embedding, web search, news, extraction,
//! generation).
//!
//! The engine itself lives in `loreclaw-index`, `loreclaw-ingest`, and
//! `loreclaw-retrieve`; concrete collaborators live in `loreclaw-adapters`.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{LoreClawError, Result};
