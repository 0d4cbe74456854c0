//! OpenAI-compatible embedding provider.

use async_trait::async_trait;
use loreclaw_core::config::LoreClawConfig;
use loreclaw_core::error::{LoreClawError, Result};
use loreclaw_core::traits::EmbeddingProvider;
use serde_json::{json, Value};

/// Embeddings via any OpenAI-compatible `/embeddings` endpoint.
///
/// Failures map to [`LoreClawError::Adapter`]: on the retrieval path an
/// unavailable embedding endpoint degrades to an empty KB leg rather than
/// failing the query.
pub struct OpenAiEmbeddings {
    base_url: String,
    model: String,
    api_key: String,
    dimension: usize,
    client: reqwest::Client,
}

impl OpenAiEmbeddings {
    /// Create from config. API key resolution: `[embedding]` key > shared
    /// key > `OPENAI_API_KEY`.
    pub fn from_config(config: &LoreClawConfig) -> Self {
        Self {
            base_url: config.embedding.endpoint.trim_end_matches('/').to_string(),
            model: config.embedding.model.clone(),
            api_key: config.embedding_api_key(),
            dimension: config.embedding.dimension,
            client: reqwest::Client::new(),
        }
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": text,
        });

        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let resp = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| LoreClawError::Adapter(format!("embedding request failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(LoreClawError::Adapter(format!(
                "embedding API error {status}: {text}"
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| LoreClawError::Adapter(e.to_string()))?;

        let vector: Vec<f32> = json["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| LoreClawError::Adapter("no embedding in response".into()))?
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|v| v as f32)
            .collect();

        if vector.is_empty() {
            return Err(LoreClawError::Adapter("empty embedding in response".into()));
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
