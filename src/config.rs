//! Environment-provided configuration.
//!
//! All deployment knobs are read once at startup. `MODEL_NAME` and
//! `INFERENCE_SERVER_URL` are required; everything else has defaults.
//! A `.env` file is honored for local development.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    /// Directory scanned for `*.pdf` on the auto-load path.
    pub docs_dir: PathBuf,
}

/// Remote completion endpoint and its fixed decoding parameters.
/// These are deployment settings, not per-request knobs.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub name: String,
    /// OpenAI-compatible base URL, e.g. `http://vllm.local:8000`.
    pub base_url: String,
    pub max_new_tokens: u32,
    pub top_p: f64,
    pub temperature: f64,
    pub presence_penalty: f64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Local sentence-embedding model name, e.g. `all-minilm-l6-v2`.
    pub model: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|e| anyhow::anyhow!("Failed to parse {}={}: {}", key, raw, e))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env if present (local development).
        dotenvy::dotenv().ok();

        let config = Config {
            model: ModelConfig {
                name: env::var("MODEL_NAME").context("MODEL_NAME must be set")?,
                base_url: env::var("INFERENCE_SERVER_URL")
                    .context("INFERENCE_SERVER_URL must be set")?
                    .trim_end_matches('/')
                    .to_string(),
                max_new_tokens: env_or("MAX_NEW_TOKENS", "512")?,
                top_p: env_or("TOP_P", "0.95")?,
                temperature: env_or("TEMPERATURE", "0.01")?,
                presence_penalty: env_or("PRESENCE_PENALTY", "1.03")?,
                timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "300")?,
            },
            chunking: ChunkingConfig {
                chunk_size: env_or("CHUNK_SIZE", "1000")?,
                overlap: env_or("CHUNK_OVERLAP", "200")?,
            },
            retrieval: RetrievalConfig {
                top_k: env_or("RETRIEVAL_TOP_K", "4")?,
            },
            embedding: EmbeddingConfig {
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "all-minilm-l6-v2".to_string()),
            },
            docs_dir: PathBuf::from(env::var("DOCS_DIR").unwrap_or_else(|_| "./docs".to_string())),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            anyhow::bail!("CHUNK_SIZE must be > 0");
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            anyhow::bail!("CHUNK_OVERLAP must be smaller than CHUNK_SIZE");
        }
        if self.retrieval.top_k < 1 {
            anyhow::bail!("RETRIEVAL_TOP_K must be >= 1");
        }
        if !(0.0..=1.0).contains(&self.model.top_p) {
            anyhow::bail!("TOP_P must be in [0.0, 1.0]");
        }
        Ok(())
    }
}
