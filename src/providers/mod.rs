mod anthropic;
mod factory;
mod google;
mod open_ai;
mod prompt;
mod retrying;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{
    generation_prompt, validation_prompt, GENERATION_PROMPT, NO_RECIPE_SIGNAL, VALIDATION_PROMPT,
};
pub use retrying::RetryingProvider;

use crate::error::ProviderError;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

/// Unified trait for all generative text services
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Get the model name (e.g., "gemini-1.5-flash")
    fn model_name(&self) -> &str;

    /// Send a prompt and return the free-text completion
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Read a JSON body, turning non-success statuses into `ProviderError::ApiError`
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    let body: Value = response.json().await?;
    debug!("{:?}", body);
    Ok(body)
}

/// Extract a string at a JSON pointer, or fail with a parse error naming the provider
pub(crate) fn text_at(body: &Value, pointer: &str, provider: &str) -> Result<String, ProviderError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            ProviderError::ParseError(format!(
                "Failed to extract content from {} response",
                provider
            ))
        })
}
