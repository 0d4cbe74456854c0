//! Knowledge ingestion pipeline: chunk, embed, dedup-check, insert.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use loreclaw_core::config::{ChunkingConfig, RetrievalConfig};
use loreclaw_core::error::{LoreClawError, Result};
use loreclaw_core::traits::{DocumentExtractor, EmbeddingProvider, NewsFeed};
use loreclaw_core::types::{Passage, SourceKind};
use loreclaw_index::KnowledgeStore;

/// Writes passages into a [`KnowledgeStore`].
///
/// All writes are serialized through an internal async mutex: the
/// nearest-neighbor dedup check followed by the conditional insert is a
/// read-then-write sequence, so two concurrent `add` calls could otherwise
/// both pass the check and insert near-identical passages. Readers are not
/// blocked by this lock.
pub struct Ingestor {
    store: Arc<KnowledgeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    news: Option<Arc<dyn NewsFeed>>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
    max_chunk_chars: usize,
    overlap_chars: usize,
    dedup_threshold: f32,
    write_lock: tokio::sync::Mutex<()>,
}

impl Ingestor {
    /// Create an ingestor over a store and embedding provider.
    pub fn new(
        store: Arc<KnowledgeStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunking: &ChunkingConfig,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            news: None,
            extractor: None,
            max_chunk_chars: chunking.max_chunk_chars,
            overlap_chars: chunking.overlap_chars,
            dedup_threshold: retrieval.dedup_threshold,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Attach a news feed collaborator for [`Ingestor::update_with_news`].
    pub fn with_news_feed(mut self, feed: Arc<dyn NewsFeed>) -> Self {
        self.news = Some(feed);
        self
    }

    /// Attach a document extractor for [`Ingestor::add_document`].
    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Chunk `text`, embed each chunk, and insert every chunk whose nearest
    /// stored neighbor sits below the dedup threshold. Returns the number of
    /// chunks actually inserted.
    ///
    /// Re-ingesting identical text is a no-op: every chunk finds itself in
    /// the store at similarity 1.0 and is dropped.
    pub async fn add(&self, text: &str, source: SourceKind, source_uri: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let chunks = crate::chunker::chunk(text, self.max_chunk_chars, self.overlap_chars);
        let mut inserted = 0usize;

        for chunk in &chunks {
            let embedding = self.embedder.embed(chunk).await?;

            if let Some(neighbor) = self.store.nearest(&embedding) {
                if neighbor.score >= self.dedup_threshold {
                    tracing::debug!(
                        score = neighbor.score,
                        neighbor = %neighbor.passage.id,
                        "chunk already represented, skipping"
                    );
                    continue;
                }
            }

            self.store
                .insert(Passage::new(chunk.clone(), source, embedding, source_uri))?;
            inserted += 1;
        }

        tracing::info!(
            source = %source,
            uri = source_uri,
            chunks = chunks.len(),
            inserted,
            "ingestion complete"
        );
        Ok(inserted)
    }

    /// Fetch news for `topic` and ingest each article body. A missing,
    /// empty, or failing feed yields 0 inserted, never an error; per-item
    /// ingestion failures are logged and skipped.
    pub async fn update_with_news(&self, topic: &str) -> usize {
        let Some(feed) = &self.news else {
            tracing::warn!("no news feed configured, nothing ingested");
            return 0;
        };

        let items = match feed.fetch(topic).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(topic, "news feed unavailable: {e}");
                return 0;
            }
        };

        let mut inserted = 0usize;
        for item in items {
            if item.body.trim().is_empty() {
                continue;
            }
            match self.add(&item.body, SourceKind::News, &item.uri).await {
                Ok(n) => inserted += n,
                Err(e) => tracing::warn!(title = %item.title, "news item skipped: {e}"),
            }
        }
        inserted
    }

    /// Extract a document's text and ingest it. Extraction failure
    /// propagates: unlike the news path, nothing at all was ingested, and
    /// the caller must see that.
    pub async fn add_document(&self, path: &Path) -> Result<usize> {
        let extractor = self.extractor.as_ref().ok_or_else(|| {
            LoreClawError::Extraction("no document extractor configured".into())
        })?;
        let text = extractor.extract(path).await?;
        self.add(&text, SourceKind::Pdf, &path.display().to_string()).await
    }

    /// Ingest a batch of documents. Per-document failures are isolated: one
    /// unparsable document is logged and skipped without aborting the rest.
    /// Returns the total number of passages inserted.
    pub async fn add_documents(&self, paths: &[PathBuf]) -> usize {
        let mut inserted = 0usize;
        for path in paths {
            match self.add_document(path).await {
                Ok(n) => inserted += n,
                Err(e) => tracing::warn!(path = %path.display(), "document skipped: {e}"),
            }
        }
        inserted
    }

    /// The store this ingestor writes to.
    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }
}
