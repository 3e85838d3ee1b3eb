use std::env;

use serde::Serialize;
use serde_json::Value;

use crate::dataset::DatasetKind;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_SENTIMENT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 10_000;

#[derive(Debug, Clone, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LlmSettings {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    pub sentiment_max_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub max_input_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSource {
    pub table: String,
    pub embeddings: String,
}

/// Typed view over the merged YAML config, with defaults for every field.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub retrieval: RetrievalSettings,
    pub sustainability: DatasetSource,
    pub christmas: DatasetSource,
}

impl Settings {
    pub fn from_config(config: &Value) -> Self {
        let server = config.get("server");
        let llm = config.get("llm");
        let retrieval = config.get("retrieval");
        let app = config.get("app");
        let datasets = config.get("datasets");

        let cors_allowed_origins = server
            .and_then(|s| s.get("cors_allowed_origins"))
            .and_then(|v| v.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|item| item.as_str())
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Settings {
            server: ServerSettings {
                host: str_field(server, "host").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: u64_field(server, "port")
                    .and_then(|v| u16::try_from(v).ok())
                    .unwrap_or(DEFAULT_PORT),
                cors_allowed_origins,
            },
            llm: LlmSettings {
                base_url: str_field(llm, "base_url")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key: str_field(llm, "api_key").filter(|key| !key.trim().is_empty()),
                chat_model: str_field(llm, "chat_model")
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                embedding_model: str_field(llm, "embedding_model")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
                max_tokens: u64_field(llm, "max_tokens")
                    .map(|v| v as u32)
                    .unwrap_or(DEFAULT_MAX_TOKENS),
                sentiment_max_tokens: u64_field(llm, "sentiment_max_tokens")
                    .map(|v| v as u32)
                    .unwrap_or(DEFAULT_SENTIMENT_MAX_TOKENS),
                request_timeout_secs: u64_field(llm, "request_timeout_secs").unwrap_or(60),
            },
            retrieval: RetrievalSettings {
                top_k: u64_field(retrieval, "top_k")
                    .map(|v| v as usize)
                    .unwrap_or(DEFAULT_TOP_K),
                max_input_length: u64_field(app, "max_input_length")
                    .map(|v| v as usize)
                    .unwrap_or(DEFAULT_MAX_INPUT_LENGTH),
            },
            sustainability: dataset_source(datasets, DatasetKind::Sustainability),
            christmas: dataset_source(datasets, DatasetKind::Christmas),
        }
    }

    /// `OPENAI_API_KEY` and `PORT` take precedence over the config files.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Some(port) = env::var("PORT").ok().and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }
    }

    pub fn source(&self, kind: DatasetKind) -> &DatasetSource {
        match kind {
            DatasetKind::Sustainability => &self.sustainability,
            DatasetKind::Christmas => &self.christmas,
        }
    }
}

fn dataset_source(datasets: Option<&Value>, kind: DatasetKind) -> DatasetSource {
    let entry = datasets.and_then(|d| d.get(kind.as_str()));
    let (default_table, default_embeddings) = match kind {
        DatasetKind::Sustainability => (
            "Dataset 1 (Sustainability Research Results).xlsx",
            "data_embeddings.json",
        ),
        DatasetKind::Christmas => (
            "Dataset 2 (Christmas Research Results).xlsx",
            "data_embeddings2.json",
        ),
    };

    DatasetSource {
        table: str_field(entry, "table").unwrap_or_else(|| default_table.to_string()),
        embeddings: str_field(entry, "embeddings")
            .unwrap_or_else(|| default_embeddings.to_string()),
    }
}

fn str_field(section: Option<&Value>, key: &str) -> Option<String> {
    section
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
}

fn u64_field(section: Option<&Value>, key: &str) -> Option<u64> {
    section.and_then(|s| s.get(key)).and_then(|v| v.as_u64())
}
