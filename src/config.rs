//! Layered settings: built-in defaults, an optional `documind.toml`, then the
//! process environment (`.env` is loaded by the binary before this runs).

use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use reqwest::Url;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Documented per-request limit of the batch embedding endpoint.
pub const MAX_EMBED_BATCH: usize = 100;

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini: GeminiSettings,
    pub supabase: SupabaseSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub embed_batch_size: usize,
    /// Applied to every HTTP request; `None` keeps the client default.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub generation_model: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub key: String,
    pub table: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub match_threshold: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            match_threshold: 0.5,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    gemini_api_key: Option<String>,
    supabase_url: Option<String>,
    supabase_key: Option<String>,
    gemini_base_url: String,
    embedding_model: String,
    generation_model: String,
    supabase_table: String,
    chunk_size: usize,
    chunk_overlap: usize,
    top_k: usize,
    match_threshold: f32,
    embed_batch_size: usize,
    request_timeout_secs: Option<u64>,
}

/// Config builder preloaded with every default; callers add their sources on top.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    let chunking = ChunkingSettings::default();
    let retrieval = RetrievalSettings::default();

    let builder = Config::builder()
        .set_default("gemini_base_url", DEFAULT_GEMINI_BASE_URL)?
        .set_default("embedding_model", "text-embedding-004")?
        .set_default("generation_model", "gemini-2.5-flash")?
        .set_default("supabase_table", "document_chunks")?
        .set_default("chunk_size", chunking.chunk_size as i64)?
        .set_default("chunk_overlap", chunking.chunk_overlap as i64)?
        .set_default("top_k", retrieval.top_k as i64)?
        .set_default("match_threshold", f64::from(retrieval.match_threshold))?
        .set_default("embed_batch_size", MAX_EMBED_BATCH as i64)?;
    Ok(builder)
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config = defaults()?
            .add_source(File::with_name("documind").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let raw: RawSettings = config.try_deserialize()?;

        let api_key = required(raw.gemini_api_key, "GEMINI_API_KEY")?;
        let url = required(raw.supabase_url, "SUPABASE_URL")?;
        let key = required(raw.supabase_key, "SUPABASE_KEY")?;

        let parsed = Url::parse(&url)
            .map_err(|e| Error::Config(format!("SUPABASE_URL is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "SUPABASE_URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if raw.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than zero".to_string()));
        }
        if raw.chunk_overlap >= raw.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                raw.chunk_overlap, raw.chunk_size
            )));
        }
        if raw.top_k == 0 {
            return Err(Error::Config("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&raw.match_threshold) {
            return Err(Error::Config(format!(
                "match_threshold must be within [0, 1], got {}",
                raw.match_threshold
            )));
        }
        if raw.embed_batch_size == 0 || raw.embed_batch_size > MAX_EMBED_BATCH {
            return Err(Error::Config(format!(
                "embed_batch_size must be within 1..={MAX_EMBED_BATCH}, got {}",
                raw.embed_batch_size
            )));
        }

        Ok(Self {
            gemini: GeminiSettings {
                api_key,
                base_url: raw.gemini_base_url.trim_end_matches('/').to_string(),
                embedding_model: raw.embedding_model,
                generation_model: raw.generation_model,
            },
            supabase: SupabaseSettings {
                url: url.trim_end_matches('/').to_string(),
                key,
                table: raw.supabase_table,
            },
            chunking: ChunkingSettings {
                chunk_size: raw.chunk_size,
                chunk_overlap: raw.chunk_overlap,
            },
            retrieval: RetrievalSettings {
                top_k: raw.top_k,
                match_threshold: raw.match_threshold,
            },
            embed_batch_size: raw.embed_batch_size,
            request_timeout: raw.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{name} is not set"))),
    }
}
