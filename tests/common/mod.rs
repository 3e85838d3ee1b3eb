#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use survey_rag::core::config::{AppPaths, ConfigService, Settings};
use survey_rag::core::errors::ApiError;
use survey_rag::dataset::{Dataset, DatasetKind, DatasetRegistry, Table};
use survey_rag::llm::{ChatRequest, LlmProvider};
use survey_rag::rag::{RagOptions, RagService};
use survey_rag::state::AppState;

/// Embeds "eco"/"green" questions as [1, 0] and everything else as [0, 1].
/// Chat replies echo the user prompt so tests can inspect the context.
#[derive(Default)]
pub struct EchoProvider {
    pub embed_calls: Mutex<usize>,
    pub chats: Mutex<Vec<ChatRequest>>,
    pub fail_chat: bool,
}

#[async_trait]
impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        if self.fail_chat {
            return Err(ApiError::Upstream("chat backend down".to_string()));
        }
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.chats.lock().unwrap().push(request);
        Ok(format!("echo: {}", prompt))
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        *self.embed_calls.lock().unwrap() += 1;
        Ok(inputs
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                if lower.contains("eco") || lower.contains("green") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

fn cells(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
        .collect()
}

pub fn sustainability() -> Dataset {
    let table = Table::new(
        cells(&["Respondent ID", "Age", "", "Shopping", ""]),
        vec![
            cells(&["Resp", "18-34", " ", "Second hand", "Refill"]),
            cells(&["1", "1", "", "1", ""]),
            cells(&["2", "", "1", "", "1"]),
        ],
    );
    Dataset::new(
        DatasetKind::Sustainability,
        table,
        vec![vec![0.2, 0.8], vec![0.95, 0.05], vec![0.6, 0.4]],
    )
    .unwrap()
}

pub fn christmas() -> Dataset {
    let table = Table::new(
        cells(&["Respondent ID", "Gifts"]),
        vec![cells(&["7", "Vouchers"]), cells(&["8", "Handmade"])],
    );
    Dataset::new(
        DatasetKind::Christmas,
        table,
        vec![vec![0.0, 1.0], vec![0.9, 0.1]],
    )
    .unwrap()
}

pub fn test_state(provider: Arc<EchoProvider>) -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yml"),
        "retrieval:\n  top_k: 2\nllm:\n  chat_model: gpt-3.5-turbo\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("secrets.yaml"), "llm:\n  api_key: sk-test-secret\n").unwrap();

    let paths = Arc::new(AppPaths::from_root(dir.path()));
    let config = ConfigService::new(paths.clone());
    let settings = Settings::from_config(&json!({ "retrieval": { "top_k": 2 } }));
    let registry = DatasetRegistry::new(sustainability(), christmas());
    let rag = RagService::new(
        provider,
        Arc::new(registry),
        RagOptions::from_settings(&settings),
    );

    (AppState::from_parts(paths, config, settings, rag), dir)
}
