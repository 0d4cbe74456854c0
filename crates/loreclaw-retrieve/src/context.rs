//! Context assembly: the hand-off to answer synthesis.
//!
//! The engine's obligation ends at building a [`SynthesisRequest`]; the
//! generation algorithm itself lives behind the [`GenerativeModel`] seam.

use std::sync::Arc;

use loreclaw_core::error::Result;
use loreclaw_core::traits::GenerativeModel;
use loreclaw_core::types::{ContextItem, SynthesisRequest};

use crate::retriever::HybridRetriever;

/// Default synthesis instructions.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a question answering assistant. \
Answer using only the numbered context passages below. \
Cite passages by number, prefer more recent sources when they conflict, \
and say so plainly if the context does not contain the answer.";

/// Build the structured hand-off for the generation collaborator.
pub fn build_synthesis_request(
    question: &str,
    context_items: Vec<ContextItem>,
    instructions: Option<&str>,
) -> SynthesisRequest {
    SynthesisRequest {
        question: question.to_string(),
        context_items,
        instructions: instructions.unwrap_or(DEFAULT_INSTRUCTIONS).to_string(),
    }
}

/// End-to-end convenience: retrieve context, then generate an answer.
pub struct Assistant {
    retriever: HybridRetriever,
    model: Arc<dyn GenerativeModel>,
}

impl Assistant {
    pub fn new(retriever: HybridRetriever, model: Arc<dyn GenerativeModel>) -> Self {
        Self { retriever, model }
    }

    /// Retrieve context for `question` and hand it to the generative model.
    /// Retrieval never fails; generation errors propagate.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let items = self.retriever.get_relevant(question).await;
        tracing::info!(question, context_items = items.len(), "synthesizing answer");
        let request = build_synthesis_request(question, items, None);
        self.model.generate(&request).await
    }

    pub fn retriever(&self) -> &HybridRetriever {
        &self.retriever
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loreclaw_core::types::SourceKind;

    fn item(text: &str, score: f32) -> ContextItem {
        ContextItem {
            text: text.into(),
            score,
            provenance: SourceKind::Kb,
            source_uri: "test".into(),
        }
    }

    #[test]
    fn test_default_instructions_applied() {
        let req = build_synthesis_request("Q?", vec![item("ctx", 0.9)], None);
        assert_eq!(req.instructions, DEFAULT_INSTRUCTIONS);
        assert_eq!(req.question, "Q?");
        assert_eq!(req.context_items.len(), 1);
    }

    #[test]
    fn test_custom_instructions_win() {
        let req = build_synthesis_request("Q?", vec![], Some("Be terse."));
        assert_eq!(req.instructions, "Be terse.");
    }

    #[test]
    fn test_rendered_prompt_orders_items() {
        let req = build_synthesis_request(
            "Which?",
            vec![item("first passage", 0.9), item("second passage", 0.8)],
            None,
        );
        let prompt = req.render();
        let first = prompt.find("first passage").unwrap();
        let second = prompt.find("second passage").unwrap();
        assert!(first < second);
    }
}
