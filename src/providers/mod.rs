/*!
 * Backend implementations for batch translation.
 *
 * This module contains client implementations for the model services a
 * batch can be sent to:
 * - Anthropic: Anthropic Messages API
 * - Ollama: Local LLM server
 * - Mock: Scripted in-process backend for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{BackendConfig, BackendKind};
use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// A backend takes an opaque request payload, forwards it to a model, and
/// returns the model's raw text answer. Interpreting that text is left to
/// the caller.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Send one request payload to the model
    ///
    /// # Arguments
    /// * `model_id` - Model to invoke
    /// * `region` - Optional service region
    /// * `payload` - Serialized request document
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The model's raw text or an error
    async fn invoke(&self, model_id: &str, region: Option<&str>, payload: &str) -> Result<String, ProviderError>;
}

/// Build the backend described by `config`
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn Backend>, ProviderError> {
    match config.provider {
        BackendKind::Anthropic => {
            let api_key = config.api_key.clone().unwrap_or_default();
            if api_key.trim().is_empty() {
                return Err(ProviderError::AuthenticationError(
                    "an API key is required for the anthropic backend".to_string(),
                ));
            }
            Ok(Arc::new(
                anthropic::Anthropic::new(api_key, config.endpoint.clone(), config.timeout_secs)
                    .with_generation(config.max_tokens, config.temperature),
            ))
        }
        BackendKind::Ollama => Ok(Arc::new(
            ollama::Ollama::new(config.endpoint.clone(), config.timeout_secs)
                .with_temperature(config.temperature),
        )),
    }
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
