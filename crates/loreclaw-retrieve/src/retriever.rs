//! Hybrid retrieval: KB hits + web snippets → ranked, deduplicated,
//! budget-bounded context.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use loreclaw_core::config::RetrievalConfig;
use loreclaw_core::traits::{EmbeddingProvider, RecencyClassifier, WebSearchAdapter};
use loreclaw_core::types::{ContextItem, Query, SourceKind};
use loreclaw_index::KnowledgeStore;

use crate::recency::KeywordRecencyClassifier;

/// Combines knowledge-store hits with live web snippets.
///
/// `get_relevant` is deliberately infallible: adapter failures degrade the
/// corresponding leg to empty, and absence of retrievable content is an
/// empty Vec rather than an error.
pub struct HybridRetriever {
    store: Arc<KnowledgeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    web: Arc<dyn WebSearchAdapter>,
    classifier: Arc<dyn RecencyClassifier>,
    opts: RetrievalConfig,
}

impl HybridRetriever {
    pub fn new(
        store: Arc<KnowledgeStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        web: Arc<dyn WebSearchAdapter>,
        opts: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            web,
            classifier: Arc::new(KeywordRecencyClassifier::new()),
            opts,
        }
    }

    /// Replace the default keyword recency classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn RecencyClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Assemble the context set for `question`.
    ///
    /// 1. Embed the question and take the top `k_kb` store passages.
    /// 2. If the question is recency-sensitive, or the best KB similarity
    ///    falls below the relevance threshold, fetch up to `k_web` snippets.
    /// 3. Merge: recency puts web above KB wholesale; otherwise rank purely
    ///    by descending score. Ties keep their leg order.
    /// 4. Drop items whose text duplicates a higher-ranked survivor.
    /// 5. Trim from the bottom until the character budget holds.
    pub async fn get_relevant(&self, question: &str) -> Vec<ContextItem> {
        let query = self.build_query(question).await;

        let kb_hits = if query.embedding.is_empty() {
            Vec::new()
        } else {
            self.store.query(&query.embedding, self.opts.k_kb)
        };
        let best_kb = kb_hits.first().map(|h| h.score);

        let need_web = query.recency_sensitive
            || best_kb.is_none_or(|s| s < self.opts.relevance_threshold);

        let mut items: Vec<ContextItem> = kb_hits
            .into_iter()
            .map(|hit| ContextItem {
                text: hit.passage.text,
                score: hit.score,
                provenance: hit.passage.source,
                source_uri: hit.passage.source_uri,
            })
            .collect();

        if need_web && self.opts.k_web > 0 {
            match self.web.search(question, self.opts.k_web).await {
                Ok(snippets) => {
                    for (rank, s) in snippets.into_iter().take(self.opts.k_web).enumerate() {
                        let text = if s.snippet.trim().is_empty() { s.title } else { s.snippet };
                        if text.trim().is_empty() {
                            continue;
                        }
                        items.push(ContextItem {
                            text,
                            score: web_rank_score(rank),
                            provenance: SourceKind::Web,
                            source_uri: s.uri,
                        });
                    }
                }
                Err(e) => tracing::warn!("web search unavailable: {e}"),
            }
        }

        rank_items(&mut items, query.recency_sensitive);
        let items = dedup_by_text(items, self.opts.dedup_threshold);
        let items = truncate_to_budget(items, self.opts.context_budget_chars);

        tracing::debug!(
            question,
            recency = query.recency_sensitive,
            items = items.len(),
            "context assembled"
        );
        items
    }

    /// Embed the question and classify it. An embedding failure leaves the
    /// vector empty, which empties the KB leg and forces the web leg;
    /// adapter unavailability is recovered, not raised.
    async fn build_query(&self, question: &str) -> Query {
        let embedding = match self.embedder.embed(question).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("query embedding unavailable: {e}");
                Vec::new()
            }
        };
        Query {
            text: question.to_string(),
            embedding,
            recency_sensitive: self.classifier.is_recency_sensitive(question),
        }
    }
}

/// Score for the web snippet at `rank` (0-based). The web leg only runs when
/// it should dominate, so the head of the ranking starts at 1.0.
fn web_rank_score(rank: usize) -> f32 {
    (1.0 - rank as f32 * 0.05).max(0.0)
}

/// Stable sort: recency-sensitive queries rank every web item above every
/// KB item; within that (and for all non-recency queries) order is by
/// descending score.
fn rank_items(items: &mut [ContextItem], recency_sensitive: bool) {
    items.sort_by(|a, b| {
        let leg = if recency_sensitive {
            let a_web = a.provenance == SourceKind::Web;
            let b_web = b.provenance == SourceKind::Web;
            b_web.cmp(&a_web)
        } else {
            Ordering::Equal
        };
        leg.then(b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
}

/// Scan in rank order and drop any item whose text duplicates an
/// already-kept item; the higher-ranked occurrence always survives.
fn dedup_by_text(items: Vec<ContextItem>, threshold: f32) -> Vec<ContextItem> {
    let mut kept: Vec<ContextItem> = Vec::with_capacity(items.len());
    for item in items {
        if kept.iter().any(|k| text_similarity(&k.text, &item.text) >= threshold) {
            tracing::debug!(uri = %item.source_uri, "dropping near-duplicate context item");
        } else {
            kept.push(item);
        }
    }
    kept
}

/// Token overlap coefficient: |A ∩ B| / min(|A|, |B|).
///
/// Web snippets carry no embedding, so retrieval-stage dedup compares raw
/// text. The overlap coefficient scores identical *and* contained texts at
/// 1.0, which is what duplicated articles and their snippets look like.
fn text_similarity(a: &str, b: &str) -> f32 {
    let ta = token_set(a);
    let tb = token_set(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let inter = ta.intersection(&tb).count() as f32;
    inter / ta.len().min(tb.len()) as f32
}

fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop the lowest-ranked items until total characters fit the budget; the
/// surviving order is unchanged.
fn truncate_to_budget(mut items: Vec<ContextItem>, budget_chars: usize) -> Vec<ContextItem> {
    let mut total: usize = items.iter().map(|i| i.text.chars().count()).sum();
    while total > budget_chars {
        match items.pop() {
            Some(dropped) => {
                total -= dropped.text.chars().count();
                tracing::debug!(uri = %dropped.source_uri, "context budget exceeded, dropping item");
            }
            None => break,
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use loreclaw_core::error::{LoreClawError, Result};
    use loreclaw_core::types::{Passage, SearchSnippet};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    const DIM: usize = 64;

    struct HashEmbedder;

    #[async_trait]
    impl EmbeddingProvider for HashEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0f32; DIM];
            for word in text
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
            {
                let mut h = DefaultHasher::new();
                word.hash(&mut h);
                v[(h.finish() % DIM as u64) as usize] += 1.0;
            }
            Ok(v)
        }

        fn dimension(&self) -> usize {
            DIM
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(LoreClawError::Adapter("embedding endpoint down".into()))
        }

        fn dimension(&self) -> usize {
            DIM
        }
    }

    struct StubSearch {
        snippets: Vec<SearchSnippet>,
        calls: AtomicUsize,
    }

    impl StubSearch {
        fn new(snippets: Vec<SearchSnippet>) -> Self {
            Self { snippets, calls: AtomicUsize::new(0) }
        }

        fn empty() -> Self {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl WebSearchAdapter for StubSearch {
        async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchSnippet>> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(self.snippets.iter().take(limit).cloned().collect())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl WebSearchAdapter for FailingSearch {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchSnippet>> {
            Err(LoreClawError::Adapter("search timed out".into()))
        }
    }

    fn snippet(n: usize, text: &str) -> SearchSnippet {
        SearchSnippet {
            title: format!("Result {n}"),
            snippet: text.to_string(),
            uri: format!("https://web.example/{n}"),
        }
    }

    async fn insert_text(store: &KnowledgeStore, text: &str, source: SourceKind) {
        let embedding = HashEmbedder.embed(text).await.unwrap();
        store
            .insert(Passage::new(text, source, embedding, "test://kb"))
            .unwrap();
    }

    fn retriever(store: Arc<KnowledgeStore>, web: Arc<dyn WebSearchAdapter>) -> HybridRetriever {
        HybridRetriever::new(store, Arc::new(HashEmbedder), web, RetrievalConfig::default())
    }

    #[tokio::test]
    async fn test_capital_of_france_scenario() {
        let store = Arc::new(KnowledgeStore::new());
        insert_text(&store, "Paris is the capital of France.", SourceKind::Kb).await;
        insert_text(&store, "The borrow checker rejects aliased mutation.", SourceKind::Kb).await;

        let r = retriever(Arc::clone(&store), Arc::new(StubSearch::empty()));
        let items = r.get_relevant("What is the capital of France?").await;

        assert!(!items.is_empty());
        assert_eq!(items[0].text, "Paris is the capital of France.");
        assert!(items[0].score > RetrievalConfig::default().relevance_threshold);
        assert_eq!(items[0].provenance, SourceKind::Kb);
    }

    #[tokio::test]
    async fn test_strong_kb_match_skips_web() {
        let store = Arc::new(KnowledgeStore::new());
        insert_text(&store, "Paris is the capital of France.", SourceKind::Kb).await;

        let web = Arc::new(StubSearch::empty());
        let r = retriever(Arc::clone(&store), web.clone());
        r.get_relevant("What is the capital of France?").await;

        assert_eq!(web.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_weak_kb_match_falls_back_to_web() {
        let store = Arc::new(KnowledgeStore::new());
        insert_text(&store, "Completely unrelated passage about gardening tools.", SourceKind::Kb).await;

        let web = Arc::new(StubSearch::new(vec![snippet(1, "Quantum computers use qubits.")]));
        let r = retriever(Arc::clone(&store), web.clone());
        let items = r.get_relevant("How do quantum computers work?").await;

        assert_eq!(web.calls.load(AtomicOrdering::SeqCst), 1);
        assert!(items.iter().any(|i| i.provenance == SourceKind::Web));
    }

    #[tokio::test]
    async fn test_recency_query_empty_kb_returns_web_items() {
        let store = Arc::new(KnowledgeStore::new());
        let web = Arc::new(StubSearch::new(vec![
            snippet(1, "The team won three nil tonight."),
            snippet(2, "Full match report from the stadium."),
        ]));

        let r = retriever(store, web);
        let items = r.get_relevant("Who won the match today?").await;

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.provenance == SourceKind::Web));
    }

    #[tokio::test]
    async fn test_everything_empty_is_not_an_error() {
        let store = Arc::new(KnowledgeStore::new());
        let r = retriever(store, Arc::new(StubSearch::empty()));
        let items = r.get_relevant("Anything at all?").await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_web_failure_recovers_to_kb_only() {
        let store = Arc::new(KnowledgeStore::new());
        insert_text(&store, "Stored fact about the topic of interest.", SourceKind::Kb).await;

        let r = retriever(store, Arc::new(FailingSearch));
        // Recency-sensitive so the web leg is attempted and fails
        let items = r.get_relevant("latest topic of interest fact?").await;
        assert!(items.iter().all(|i| i.provenance != SourceKind::Web));
    }

    #[tokio::test]
    async fn test_embedding_failure_recovers_to_web_only() {
        let store = Arc::new(KnowledgeStore::new());
        insert_text(&store, "A stored passage.", SourceKind::Kb).await;

        let web = Arc::new(StubSearch::new(vec![snippet(1, "Fresh web answer.")]));
        let r = HybridRetriever::new(
            Arc::clone(&store),
            Arc::new(FailingEmbedder),
            web,
            RetrievalConfig::default(),
        );
        let items = r.get_relevant("Some question").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].provenance, SourceKind::Web);
    }

    #[tokio::test]
    async fn test_recency_ranks_web_above_kb() {
        let store = Arc::new(KnowledgeStore::new());
        // KB passage that matches the question words exactly: similarity
        // near 1.0, far above any web rank score except the first.
        insert_text(&store, "who won the cup final today", SourceKind::Kb).await;

        let web = Arc::new(StubSearch::new(vec![
            snippet(1, "United won the cup final this evening."),
            snippet(2, "Report from the final whistle."),
        ]));
        let r = retriever(store, web);
        let items = r.get_relevant("Who won the cup final today?").await;

        assert!(items.len() >= 3);
        assert_eq!(items[0].provenance, SourceKind::Web);
        assert_eq!(items[1].provenance, SourceKind::Web);
        assert_eq!(items[2].provenance, SourceKind::Kb);
    }

    #[tokio::test]
    async fn test_dedup_keeps_higher_ranked() {
        let mut items = vec![
            ContextItem {
                text: "The committee announced a ruling on Tuesday.".into(),
                score: 0.9,
                provenance: SourceKind::Kb,
                source_uri: "kept".into(),
            },
            ContextItem {
                text: "the committee announced a ruling on tuesday".into(),
                score: 0.5,
                provenance: SourceKind::Web,
                source_uri: "dropped".into(),
            },
            ContextItem {
                text: "An entirely different sentence about pottery.".into(),
                score: 0.4,
                provenance: SourceKind::Kb,
                source_uri: "other".into(),
            },
        ];
        rank_items(&mut items, false);
        let kept = dedup_by_text(items, 0.95);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].source_uri, "kept");
        assert_eq!(kept[1].source_uri, "other");
    }

    #[tokio::test]
    async fn test_budget_truncation_drops_lowest_ranked() {
        let items = vec![
            ContextItem { text: "a".repeat(40), score: 0.9, provenance: SourceKind::Kb, source_uri: "1".into() },
            ContextItem { text: "b".repeat(40), score: 0.8, provenance: SourceKind::Kb, source_uri: "2".into() },
            ContextItem { text: "c".repeat(40), score: 0.7, provenance: SourceKind::Kb, source_uri: "3".into() },
        ];
        let kept = truncate_to_budget(items, 90);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].source_uri, "1");
        assert_eq!(kept[1].source_uri, "2");
        let total: usize = kept.iter().map(|i| i.text.chars().count()).sum();
        assert!(total <= 90);
    }

    #[tokio::test]
    async fn test_budget_smaller_than_any_item() {
        let items = vec![ContextItem {
            text: "x".repeat(100),
            score: 0.9,
            provenance: SourceKind::Kb,
            source_uri: "1".into(),
        }];
        assert!(truncate_to_budget(items, 50).is_empty());
    }

    #[test]
    fn test_text_similarity_identical_and_contained() {
        assert!((text_similarity("a b c d", "A b C d") - 1.0).abs() < 1e-6);
        // Contained fragment scores 1.0 under the overlap coefficient
        assert!((text_similarity("a b", "a b c d e f") - 1.0).abs() < 1e-6);
        assert_eq!(text_similarity("", "anything"), 0.0);
        assert!(text_similarity("alpha beta", "gamma delta") < 0.01);
    }

    #[test]
    fn test_rank_items_stable_for_ties() {
        let mut items = vec![
            ContextItem { text: "first".into(), score: 0.5, provenance: SourceKind::Kb, source_uri: "a".into() },
            ContextItem { text: "second".into(), score: 0.5, provenance: SourceKind::Kb, source_uri: "b".into() },
        ];
        rank_items(&mut items, false);
        assert_eq!(items[0].source_uri, "a");
        assert_eq!(items[1].source_uri, "b");
    }
}
