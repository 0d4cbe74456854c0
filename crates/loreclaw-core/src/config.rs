//! LoreClaw configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoreClawConfig {
    /// Shared API key, used when a section does not carry its own.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for LoreClawConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl LoreClawConfig {
    /// Load config from the default path (~/.loreclaw/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::LoreClawError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::LoreClawError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LoreClawError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loreclaw")
            .join("config.toml")
    }

    /// Get the LoreClaw home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loreclaw")
    }

    /// Resolve the embedding API key: section key > shared key > env var.
    pub fn embedding_api_key(&self) -> String {
        if !self.embedding.api_key.is_empty() {
            self.embedding.api_key.clone()
        } else if !self.api_key.is_empty() {
            self.api_key.clone()
        } else {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        }
    }

    /// Resolve the LLM API key: section key > shared key > env var.
    pub fn llm_api_key(&self) -> String {
        if !self.llm.api_key.is_empty() {
            self.llm.api_key.clone()
        } else if !self.api_key.is_empty() {
            self.api_key.clone()
        } else {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        }
    }
}

/// Embedding provider configuration (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default)]
    pub api_key: String,
}

fn default_embedding_endpoint() -> String { "https://api.openai.com/v1".into() }
fn default_embedding_model() -> String { "text-embedding-3-small".into() }
fn default_embedding_dimension() -> usize { 1536 }

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            api_key: String::new(),
        }
    }
}

/// Answer-synthesis model configuration (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub api_key: String,
}

fn default_llm_endpoint() -> String { "https://api.openai.com/v1".into() }
fn default_llm_model() -> String { "gpt-4o-mini".into() }
fn default_temperature() -> f32 { 0.2 }
fn default_max_tokens() -> u32 { 1024 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: String::new(),
        }
    }
}

/// Text chunking configuration. Sizes are in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

fn default_max_chunk_chars() -> usize { 1200 }
fn default_overlap_chars() -> usize { 150 }

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            overlap_chars: default_overlap_chars(),
        }
    }
}

/// Retrieval and dedup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Cosine/text similarity at or above which two passages are duplicates.
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f32,
    /// Best KB similarity below which the web leg is consulted.
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f32,
    #[serde(default = "default_k_kb")]
    pub k_kb: usize,
    #[serde(default = "default_k_web")]
    pub k_web: usize,
    /// Maximum total characters handed to answer synthesis.
    #[serde(default = "default_context_budget_chars")]
    pub context_budget_chars: usize,
}

fn default_dedup_threshold() -> f32 { 0.95 }
fn default_relevance_threshold() -> f32 { 0.35 }
fn default_k_kb() -> usize { 6 }
fn default_k_web() -> usize { 4 }
fn default_context_budget_chars() -> usize { 6000 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            dedup_threshold: default_dedup_threshold(),
            relevance_threshold: default_relevance_threshold(),
            k_kb: default_k_kb(),
            k_web: default_k_web(),
            context_budget_chars: default_context_budget_chars(),
        }
    }
}

/// Web search adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_user_agent() -> String { "LoreClaw/0.1".into() }
fn default_timeout_secs() -> u64 { 10 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
