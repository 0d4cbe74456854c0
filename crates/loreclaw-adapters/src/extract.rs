//! Plain-text document extractor.

use std::path::Path;

use async_trait::async_trait;
use loreclaw_core::error::{LoreClawError, Result};
use loreclaw_core::traits::DocumentExtractor;

/// Reads UTF-8 text documents from disk.
///
/// Extraction from binary formats (real PDFs and friends) is out of scope;
/// anything unreadable as UTF-8 surfaces as [`LoreClawError::Extraction`],
/// which the ingestion layer passes through to the caller.
pub struct PlainTextExtractor;

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoreClawError::Extraction(format!("{}: {e}", path.display())))?;
        if text.trim().is_empty() {
            return Err(LoreClawError::Extraction(format!(
                "{}: document contains no text",
                path.display()
            )));
        }
        Ok(text)
    }
}
