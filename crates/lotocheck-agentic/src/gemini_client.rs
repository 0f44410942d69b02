//! Gemini Client
//!
//! `LlmClient` over the Google Gemini `generateContent` API. JSON requests
//! set `responseMimeType` so the model answers with bare JSON.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::llm_client::LlmClient;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.1;

/// Google Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(content.parts.into_iter().filter_map(|p| p.text).collect())
    }
}

impl GeminiClient {
    /// Client for `GEMINI_MODEL`, or the default model
    pub fn new(api_key: String) -> Self {
        match std::env::var("GEMINI_MODEL") {
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

    /// Key from `GEMINI_API_KEY`, falling back to `API_KEY`
    pub fn from_env() -> Result<Self> {
        std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map(Self::new)
            .map_err(|_| anyhow!("GEMINI_API_KEY (or API_KEY) is not set"))
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }

    fn request<'a>(&self, system: &'a str, user: &'a str, json_mode: bool) -> GenerateRequest<'a> {
        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part { text: system }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: user }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: json_mode.then_some("application/json"),
            },
        }
    }

    async fn generate(&self, system: &str, user: &str, json_mode: bool) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request(system, user, json_mode))
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        let raw = response.text().await.context("Unreadable Gemini response")?;
        if !status.is_success() {
            return Err(anyhow!("Gemini API returned {}: {}", status, raw));
        }
        tracing::debug!(
            model = %self.model,
            "Gemini raw response: {}",
            raw.chars().take(1000).collect::<String>()
        );

        let reply: GenerateResponse =
            serde_json::from_str(&raw).context("Malformed Gemini response")?;
        reply
            .into_text()
            .ok_or_else(|| anyhow!("Gemini returned no candidates"))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.generate(system_prompt, user_prompt, false).await
    }

    async fn chat_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.generate(system_prompt, user_prompt, true).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_model() {
        let client = GeminiClient::with_model("test-key".to_string(), "gemini-2.5-flash");
        assert_eq!(client.model_name(), "gemini-2.5-flash");
        assert_eq!(client.provider_name(), "Gemini");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_json_mode() {
        let client = GeminiClient::with_model("k".to_string(), "m");

        let body = serde_json::to_value(client.request("sys", "text", true)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "text");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        let plain = serde_json::to_value(client.request("sys", "text", false)).unwrap();
        assert!(plain["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_reply_text() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.into_text().as_deref(), Some("[]"));

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_text().is_none());
    }
}
