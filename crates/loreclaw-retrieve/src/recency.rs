//! Default recency classifier.
//!
//! A keyword-cue heuristic behind the [`RecencyClassifier`] seam. The exact
//! heuristic is not load-bearing for retrieval correctness; swap in a
//! learned classifier by implementing the trait.

use loreclaw_core::traits::RecencyClassifier;

/// Cues that usually mark a question as depending on live information.
const DEFAULT_CUES: &[&str] = &[
    "today",
    "tonight",
    "yesterday",
    "right now",
    "currently",
    "latest",
    "breaking",
    "this week",
    "this month",
    "this year",
    "recent",
    "news",
    "price of",
    "stock",
    "weather",
    "score",
    "who won",
];

/// Flags a question as recency-sensitive when it contains any configured cue.
pub struct KeywordRecencyClassifier {
    cues: Vec<String>,
}

impl KeywordRecencyClassifier {
    pub fn new() -> Self {
        Self {
            cues: DEFAULT_CUES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Use a custom cue list instead of the defaults.
    pub fn with_cues(cues: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            cues: cues.into_iter().map(|c| c.into().to_lowercase()).collect(),
        }
    }
}

impl Default for KeywordRecencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyClassifier for KeywordRecencyClassifier {
    fn is_recency_sensitive(&self, question: &str) -> bool {
        let lowered = question.to_lowercase();
        self.cues.iter().any(|cue| lowered.contains(cue.as_str()))
    }
}
