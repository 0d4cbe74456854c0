//! DuckDuckGo HTML web search adapter (no API key required).

use async_trait::async_trait;
use loreclaw_core::config::SearchConfig;
use loreclaw_core::error::{LoreClawError, Result};
use loreclaw_core::traits::WebSearchAdapter;
use loreclaw_core::types::SearchSnippet;

/// Web search against the DuckDuckGo HTML endpoint.
///
/// Transport failures map to [`LoreClawError::Adapter`]; zero parsed results
/// is an empty Vec, not an error.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LoreClawError::Adapter(format!("http client build failed: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebSearchAdapter for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchSnippet>> {
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoreClawError::Adapter(format!("search failed: {e}")))?;

        let html = resp
            .text()
            .await
            .map_err(|e| LoreClawError::Adapter(format!("search read failed: {e}")))?;

        let results = parse_results(&html, limit);
        tracing::debug!(query, results = results.len(), "web search complete");
        Ok(results)
    }
}

/// Pull `{title, snippet, uri}` triples out of the result page markup.
fn parse_results(html: &str, max: usize) -> Vec<SearchSnippet> {
    let mut results = Vec::new();

    for segment in html.split("class=\"result__a\"").skip(1).take(max) {
        let title = extract_between(segment, ">", "</a>")
            .map(strip_bold)
            .unwrap_or_default();

        let uri = extract_between(segment, "href=\"", "\"").unwrap_or_default();

        let snippet = segment
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| extract_between(s, ">", "</a>"))
            .map(strip_bold)
            .unwrap_or_default();

        if !title.is_empty() {
            results.push(SearchSnippet {
                title: title.trim().to_string(),
                snippet: snippet.trim().to_string(),
                uri: uri.trim().to_string(),
            });
        }
    }
    results
}

fn strip_bold(s: String) -> String {
    s.replace("<b>", "").replace("</b>", "")
}

fn extract_between(text: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = text.find(start)? + start.len();
    let remaining = &text[start_idx..];
    let end_idx = remaining.find(end)?;
    Some(remaining[..end_idx].to_string())
}
