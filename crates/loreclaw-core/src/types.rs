//! Core data model: passages, queries, retrieval results, and the shapes
//! exchanged with collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance tag for a piece of retrievable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// General knowledge-base content.
    Kb,
    /// Live web search result.
    Web,
    /// Extracted document (PDF path today, any document extractor tomorrow).
    Pdf,
    /// Ingested news article.
    News,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceKind::Kb => "kb",
            SourceKind::Web => "web",
            SourceKind::Pdf => "pdf",
            SourceKind::News => "news",
        };
        f.write_str(s)
    }
}

/// An ingested chunk of text with its embedding and provenance.
///
/// Immutable once created: updates are represented as new passages carrying a
/// later `inserted_at`, never by in-place mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub text: String,
    pub source: SourceKind,
    pub embedding: Vec<f32>,
    pub inserted_at: DateTime<Utc>,
    pub source_uri: String,
}

impl Passage {
    /// Build a passage with a fresh uuid and the current timestamp.
    pub fn new(text: impl Into<String>, source: SourceKind, embedding: Vec<f32>, source_uri: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            source,
            embedding,
            inserted_at: Utc::now(),
            source_uri: source_uri.into(),
        }
    }
}

/// A retrieval query: the raw question, its embedding, and whether the
/// answer depends on live information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub embedding: Vec<f32>,
    pub recency_sensitive: bool,
}

/// One entry of an assembled context set: ranked, deduplicated, and tagged
/// with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextItem {
    pub text: String,
    pub score: f32,
    pub provenance: SourceKind,
    pub source_uri: String,
}

/// A ranked web search result as returned by a [`crate::traits::WebSearchAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSnippet {
    pub title: String,
    pub snippet: String,
    pub uri: String,
}

/// A news article as returned by a [`crate::traits::NewsFeed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub body: String,
    pub uri: String,
}

/// The structured hand-off to the answer-synthesis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub question: String,
    pub context_items: Vec<ContextItem>,
    pub instructions: String,
}

impl SynthesisRequest {
    /// Render the request as a single prompt string: instruction preamble,
    /// numbered provenance-tagged context blocks, then the question.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.instructions, self.render_context())
    }

    /// The context blocks and question without the instruction preamble, for
    /// callers that carry instructions out of band (a system message, say).
    pub fn render_context(&self) -> String {
        let mut prompt = String::new();

        if self.context_items.is_empty() {
            prompt.push_str("[No context available]\n");
        } else {
            prompt.push_str("[Context]\n");
            for (i, item) in self.context_items.iter().enumerate() {
                prompt.push_str(&format!(
                    "[{}] ({} | {})\n{}\n\n",
                    i + 1,
                    item.provenance,
                    item.source_uri,
                    item.text.trim()
                ));
            }
        }

        prompt.push_str(&format!("[Question]\n{}", self.question));
        prompt
    }
}
