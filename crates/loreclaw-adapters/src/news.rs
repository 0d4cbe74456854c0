//! News feed built over a web search adapter.

use std::sync::Arc;

use async_trait::async_trait;
use loreclaw_core::error::Result;
use loreclaw_core::traits::{NewsFeed, WebSearchAdapter};
use loreclaw_core::types::NewsItem;

/// Fetches "news" by running a recency-slanted web search for the topic and
/// treating each snippet as an article body.
///
/// A proper wire-service client would implement [`NewsFeed`] directly; this
/// keeps the news path working with nothing but the search adapter.
pub struct SearchNewsFeed {
    search: Arc<dyn WebSearchAdapter>,
    limit: usize,
}

impl SearchNewsFeed {
    pub fn new(search: Arc<dyn WebSearchAdapter>, limit: usize) -> Self {
        Self { search, limit }
    }
}

#[async_trait]
impl NewsFeed for SearchNewsFeed {
    async fn fetch(&self, topic: &str) -> Result<Vec<NewsItem>> {
        let query = format!("{topic} latest news");
        let snippets = self.search.search(&query, self.limit).await?;
        Ok(snippets
            .into_iter()
            .filter(|s| !s.snippet.trim().is_empty())
            .map(|s| NewsItem {
                title: s.title,
                body: s.snippet,
                uri: s.uri,
            })
            .collect())
    }
}
