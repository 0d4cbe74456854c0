//! # LoreClaw Index
//!
//! Append-only, process-local vector index over [`Passage`]s.
//!
//! Brute-force cosine similarity over an insertion-ordered passage list.
//! Deliberately simple, since the store lives and dies with the process and
//! holds at most a few thousand passages. Owning the on-disk format of a real
//! vector database is explicitly out of scope.
//!
//! ## Concurrency
//!
//! Interior `RwLock`: queries take read guards and run concurrently with each
//! other; `insert` takes the write guard, so a reader never observes a
//! half-inserted passage. Serializing *check-then-insert* sequences across
//! writers is the ingestion layer's job, not the index's.

use std::collections::HashSet;
use std::sync::RwLock;

use loreclaw_core::error::{LoreClawError, Result};
use loreclaw_core::types::{Passage, SourceKind};

/// A query hit: the matched passage and its cosine similarity in [-1, 1].
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

#[derive(Default)]
struct Inner {
    /// Passages in insertion order; order is the query tie-break.
    passages: Vec<Passage>,
    ids: HashSet<String>,
    /// Fixed by the first insert; every later vector must match.
    dimension: Option<usize>,
}

/// The knowledge store: id-unique passages plus the vector index over them.
///
/// Append-only for the lifetime of the process. Passages are never altered
/// or removed, only superseded by newer insertions.
pub struct KnowledgeStore {
    inner: RwLock<Inner>,
}

impl KnowledgeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner::default()) }
    }

    /// Insert a passage, visible to queries immediately and atomically.
    ///
    /// Fails with [`LoreClawError::DuplicateId`] if the id is already present
    /// and [`LoreClawError::DimensionMismatch`] if the embedding length does
    /// not match the store's dimensionality.
    pub fn insert(&self, passage: Passage) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());

        if inner.ids.contains(&passage.id) {
            return Err(LoreClawError::DuplicateId(passage.id.clone()));
        }
        if let Some(expected) = inner.dimension {
            if passage.embedding.len() != expected {
                return Err(LoreClawError::DimensionMismatch {
                    expected,
                    got: passage.embedding.len(),
                });
            }
        } else {
            inner.dimension = Some(passage.embedding.len());
        }

        tracing::debug!(id = %passage.id, source = %passage.source, "passage inserted");
        inner.ids.insert(passage.id.clone());
        inner.passages.push(passage);
        Ok(())
    }

    /// Return the `k` passages most similar to `vector`, ordered by
    /// descending cosine similarity; ties go to the earlier insertion.
    /// `k = 0` returns an empty Vec.
    pub fn query(&self, vector: &[f32], k: usize) -> Vec<ScoredPassage> {
        if k == 0 {
            return Vec::new();
        }
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());

        let mut hits: Vec<ScoredPassage> = inner
            .passages
            .iter()
            .map(|p| ScoredPassage {
                score: cosine_similarity(vector, &p.embedding),
                passage: p.clone(),
            })
            .collect();

        // Stable sort over insertion order: equal scores keep the earlier
        // passage first.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        hits
    }

    /// The single nearest neighbor, if the store is non-empty.
    pub fn nearest(&self, vector: &[f32]) -> Option<ScoredPassage> {
        self.query(vector, 1).pop()
    }

    /// Number of stored passages.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The store's embedding dimensionality, once fixed by the first insert.
    pub fn dimension(&self) -> Option<usize> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).dimension
    }

    /// Passage counts per provenance tag, for diagnostics.
    pub fn source_counts(&self) -> Vec<(SourceKind, usize)> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut counts = Vec::new();
        for kind in [SourceKind::Kb, SourceKind::Web, SourceKind::Pdf, SourceKind::News] {
            let n = inner.passages.iter().filter(|p| p.source == kind).count();
            if n > 0 {
                counts.push((kind, n));
            }
        }
        counts
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]; zero-magnitude vectors compare as 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_passage(id: &str, text: &str, embedding: Vec<f32>) -> Passage {
        Passage {
            id: id.to_string(),
            text: text.to_string(),
            source: SourceKind::Kb,
            embedding,
            inserted_at: chrono::Utc::now(),
            source_uri: "test".to_string(),
        }
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_insert_and_len() {
        let store = KnowledgeStore::new();
        assert!(store.is_empty());
        store.insert(make_passage("1", "hello", vec![1.0, 0.0])).unwrap();
        store.insert(make_passage("2", "world", vec![0.0, 1.0])).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), Some(2));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = KnowledgeStore::new();
        store.insert(make_passage("same", "first", vec![1.0])).unwrap();
        let err = store.insert(make_passage("same", "second", vec![0.5])).unwrap_err();
        assert!(matches!(err, LoreClawError::DuplicateId(id) if id == "same"));
        // The original passage is untouched
        assert_eq!(store.len(), 1);
        assert_eq!(store.query(&[1.0], 1)[0].passage.text, "first");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let store = KnowledgeStore::new();
        store.insert(make_passage("1", "a", vec![1.0, 0.0])).unwrap();
        let err = store.insert(make_passage("2", "b", vec![1.0, 0.0, 0.0])).unwrap_err();
        assert!(matches!(
            err,
            LoreClawError::DimensionMismatch { expected: 2, got: 3 }
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_query_sorted_descending() {
        let store = KnowledgeStore::new();
        store.insert(make_passage("far", "far", vec![0.0, 1.0, 0.0])).unwrap();
        store.insert(make_passage("exact", "exact", vec![1.0, 0.0, 0.0])).unwrap();
        store.insert(make_passage("mid", "mid", vec![0.5, 0.5, 0.0])).unwrap();

        let hits = store.query(&[1.0, 0.0, 0.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].passage.id, "exact");
        assert_eq!(hits[1].passage.id, "mid");
        assert_eq!(hits[2].passage.id, "far");
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_query_tie_breaks_by_insertion_order() {
        let store = KnowledgeStore::new();
        // Identical vectors, different insertion times
        store.insert(make_passage("first", "a", vec![1.0, 0.0])).unwrap();
        store.insert(make_passage("second", "b", vec![1.0, 0.0])).unwrap();

        let hits = store.query(&[1.0, 0.0], 2);
        assert_eq!(hits[0].passage.id, "first");
        assert_eq!(hits[1].passage.id, "second");
    }

    #[test]
    fn test_query_k_zero() {
        let store = KnowledgeStore::new();
        store.insert(make_passage("1", "a", vec![1.0])).unwrap();
        assert!(store.query(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_query_k_larger_than_store() {
        let store = KnowledgeStore::new();
        store.insert(make_passage("only", "one", vec![1.0, 0.0])).unwrap();
        let hits = store.query(&[1.0, 0.0], 100);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_query_empty_store() {
        let store = KnowledgeStore::new();
        assert!(store.query(&[1.0, 0.0], 5).is_empty());
        assert!(store.nearest(&[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_scores_within_bounds() {
        let store = KnowledgeStore::new();
        store.insert(make_passage("a", "a", vec![3.0, -2.0])).unwrap();
        store.insert(make_passage("b", "b", vec![-1.0, 4.0])).unwrap();
        for hit in store.query(&[0.7, 0.7], 2) {
            assert!((-1.0..=1.0).contains(&hit.score));
        }
    }

    #[test]
    fn test_source_counts() {
        let store = KnowledgeStore::new();
        let mut news = make_passage("n1", "news", vec![1.0]);
        news.source = SourceKind::News;
        store.insert(news).unwrap();
        store.insert(make_passage("k1", "kb", vec![0.0])).unwrap();
        store.insert(make_passage("k2", "kb2", vec![0.5])).unwrap();

        let counts = store.source_counts();
        assert!(counts.contains(&(SourceKind::Kb, 2)));
        assert!(counts.contains(&(SourceKind::News, 1)));
    }

    #[test]
    fn test_concurrent_readers_see_whole_passages() {
        use std::sync::Arc;

        let store = Arc::new(KnowledgeStore::new());
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..100 {
                    let p = make_passage(&format!("id-{i}"), "text", vec![i as f32, 1.0]);
                    store.insert(p).unwrap();
                }
            })
        };
        let reader = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    for hit in store.query(&[1.0, 0.0], 5) {
                        // Every visible passage is fully formed
                        assert!(!hit.passage.id.is_empty());
                        assert_eq!(hit.passage.embedding.len(), 2);
                    }
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(store.len(), 100);
    }
}
