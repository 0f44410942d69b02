//! Anthropic Client
//!
//! `LlmClient` over the Anthropic Messages API. There is no JSON response
//! mode, so `chat_json` tightens the system prompt instead.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::llm_client::LlmClient;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Large draw histories produce long JSON answers
const MAX_TOKENS: u32 = 8192;

const JSON_ONLY: &str =
    "Respond with valid JSON only. No markdown code blocks, no explanations.";

#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl AnthropicClient {
    /// Client for `ANTHROPIC_MODEL`, or the default model
    pub fn new(api_key: String) -> Self {
        match std::env::var("ANTHROPIC_MODEL") {
            Ok(model) => Self::with_model(api_key, &model),
            Err(_) => Self::with_model(api_key, DEFAULT_MODEL),
        }
    }

    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
        }
    }

    /// Key from `ANTHROPIC_API_KEY`
    pub fn from_env() -> Result<Self> {
        std::env::var("ANTHROPIC_API_KEY")
            .map(Self::new)
            .map_err(|_| anyhow!("ANTHROPIC_API_KEY is not set"))
    }

    fn request<'a>(&'a self, system: &'a str, user: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            system,
            messages: [Message {
                role: "user",
                content: user,
            }],
        }
    }

    async fn send(&self, system: &str, user: &str) -> Result<String> {
        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request(system, user))
            .send()
            .await
            .context("Anthropic request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Anthropic API returned {}: {}", status, detail));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .context("Unreadable Anthropic response")?;
        if reply.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!(model = %self.model, "Anthropic reply truncated at max_tokens");
        }

        let text: String = reply
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(anyhow!("Anthropic reply had no text content"));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.send(system_prompt, user_prompt).await
    }

    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let system = format!("{}\n\n{}", system_prompt, JSON_ONLY);
        self.send(&system, user_prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Anthropic"
    }
}
