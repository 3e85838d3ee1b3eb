use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::config::settings::LlmSettings;
use crate::core::errors::ApiError;

/// Client for an OpenAI-compatible HTTP API (`/v1/chat/completions`, `/v1/embeddings`).
#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    embedding_model: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        chat_model: String,
        embedding_model: String,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::internal)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model,
            embedding_model,
            client,
        })
    }

    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ApiError> {
        if settings.api_key.is_none() {
            tracing::warn!("No LLM API key configured; requests will be sent unauthenticated");
        }
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.chat_model.clone(),
            settings.embedding_model.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

async fn ensure_success(res: Response, what: &str) -> Result<Response, ApiError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    Err(ApiError::Upstream(format!(
        "{} failed with {}: {}",
        what, status, text
    )))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        let url = format!("{}/v1/models", self.base_url);
        let res = self.authorized(self.client.get(&url)).send().await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.chat_model,
            "messages": request.messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;
        let res = ensure_success(res, "Chat completion").await?;

        let payload: ChatCompletionResponse = res.json().await.map_err(ApiError::upstream)?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ApiError::Upstream("Chat completion returned no content".to_string()))
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.embedding_model,
            "input": inputs,
        });

        let res = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;
        let res = ensure_success(res, "Embedding request").await?;

        let mut payload: EmbeddingResponse = res.json().await.map_err(ApiError::upstream)?;
        if payload.data.len() != inputs.len() {
            return Err(ApiError::Upstream(format!(
                "Embedding request returned {} vectors for {} inputs",
                payload.data.len(),
                inputs.len()
            )));
        }
        payload.data.sort_by_key(|item| item.index);

        Ok(payload.data.into_iter().map(|item| item.embedding).collect())
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .finish_non_exhaustive()
    }
}
