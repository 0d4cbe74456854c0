//! OpenAI-compatible answer-synthesis provider.

use async_trait::async_trait;
use loreclaw_core::config::LoreClawConfig;
use loreclaw_core::error::{LoreClawError, Result};
use loreclaw_core::traits::GenerativeModel;
use loreclaw_core::types::SynthesisRequest;
use serde_json::{json, Value};

/// Chat-completions generation against any OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// Create from config. API key resolution: `[llm]` key > shared key >
    /// `OPENAI_API_KEY`.
    pub fn from_config(config: &LoreClawConfig) -> Self {
        Self {
            base_url: config.llm.endpoint.trim_end_matches('/').to_string(),
            model: config.llm.model.clone(),
            api_key: config.llm_api_key(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
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
impl GenerativeModel for OpenAiGenerator {
    async fn generate(&self, request: &SynthesisRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": request.instructions },
                { "role": "user", "content": request.render_context() },
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let resp = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| LoreClawError::Http(format!("connection failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(LoreClawError::Provider(format!("API error {status}: {text}")));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| LoreClawError::Http(e.to_string()))?;

        json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(String::from)
            .ok_or_else(|| LoreClawError::Provider("no choices in response".into()))
    }
}
