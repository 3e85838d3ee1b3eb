use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// Text-in/text-out access to a hosted model service.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// provider name for logs and status (e.g. "openai")
    fn name(&self) -> &str;

    /// check if the provider is reachable with the configured credentials
    async fn health_check(&self) -> Result<bool, ApiError>;

    /// chat completion (non-streaming), returns the assistant message text
    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError>;

    /// generate one embedding per input, in input order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}
