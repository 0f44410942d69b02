//! Client Factory
//!
//! Builds the configured `LlmClient` from the environment.

use anyhow::Result;
use std::sync::Arc;

use crate::anthropic_client::AnthropicClient;
use crate::backend::LlmBackend;
use crate::gemini_client::GeminiClient;
use crate::llm_client::LlmClient;

/// Create the client selected by `LOTOCHECK_LLM_BACKEND`
pub fn create_llm_client() -> Result<Arc<dyn LlmClient>> {
    create_llm_client_for(LlmBackend::from_env()?)
}

/// Create a client for an explicit backend, reading its key from the environment
pub fn create_llm_client_for(backend: LlmBackend) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match backend {
        LlmBackend::Gemini => Arc::new(GeminiClient::from_env()?),
        LlmBackend::Anthropic => Arc::new(AnthropicClient::from_env()?),
    };
    tracing::debug!(
        provider = client.provider_name(),
        model = client.model_name(),
        "created LLM client"
    );
    Ok(client)
}

/// Create a client for an explicit backend and key
pub fn create_llm_client_with_key(backend: LlmBackend, api_key: String) -> Arc<dyn LlmClient> {
    match backend {
        LlmBackend::Gemini => Arc::new(GeminiClient::new(api_key)),
        LlmBackend::Anthropic => Arc::new(AnthropicClient::new(api_key)),
    }
}
