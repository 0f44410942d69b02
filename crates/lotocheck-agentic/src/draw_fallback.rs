//! Best-effort draw parsing through an LLM
//!
//! Used only when the deterministic parser finds nothing or the pasted text
//! is large. Whatever the model returns is filtered down to well-formed
//! draws: fifteen numbers in 1..=25. The caller decides whether the result
//! replaces its own parse.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use lotocheck_core::types::{is_valid_number, OfficialDraw, NUMBERS_PER_GAME, UNKNOWN_CONTEST};

use crate::llm_client::{strip_code_fence, LlmClient};

/// A parser that may turn raw draw text into draws, or fail
#[async_trait]
pub trait DrawFallbackParser: Send + Sync {
    async fn parse_draws_best_effort(&self, text: &str) -> Result<Vec<OfficialDraw>>;

    /// Label for logs
    fn name(&self) -> &str;
}

const SYSTEM_PROMPT: &str = "You extract Lotofácil draw results from pasted text. \
Answer with a JSON array of objects with the keys \"concurso\" (string), \"data\" (string) \
and \"numeros\" (array of exactly 15 integers between 1 and 25).";

fn user_prompt(text: &str) -> String {
    format!(
        "Parse the following Lotofácil draw results.\n\
         The primary format is: {{concurso}} ({{date}}) {{numbers}}\n\
         Example: 0001 (29/09/2003) 02 03 05 06 09 10 11 13 14 16 18 20 23 24 25\n\
         \n\
         Rules:\n\
         - Extract 'concurso' number (usually 4 digits).\n\
         - Extract 'data' from between parentheses.\n\
         - Extract exactly 15 'numeros' (values between 1-25).\n\
         - If the format varies slightly, map it to the fields above.\n\
         \n\
         Text to parse:\n{}",
        text
    )
}

/// Draw parser backed by any `LlmClient`
pub struct LlmDrawParser {
    client: Arc<dyn LlmClient>,
}

impl LlmDrawParser {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DrawFallbackParser for LlmDrawParser {
    async fn parse_draws_best_effort(&self, text: &str) -> Result<Vec<OfficialDraw>> {
        tracing::info!(
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            bytes = text.len(),
            "asking LLM to parse draws"
        );
        let reply = self.client.chat_json(SYSTEM_PROMPT, &user_prompt(text)).await?;
        decode_draws(&reply)
    }

    fn name(&self) -> &str {
        self.client.provider_name()
    }
}

#[derive(Deserialize)]
struct RawDraw {
    #[serde(default)]
    concurso: serde_json::Value,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    numeros: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReply {
    List(Vec<RawDraw>),
    Wrapped { draws: Vec<RawDraw> },
}

/// Decode a model reply into draws, dropping malformed records
pub fn decode_draws(reply: &str) -> Result<Vec<OfficialDraw>> {
    let body = strip_code_fence(reply);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let raw: RawReply = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse LLM draw response: {}", e))?;
    let raw = match raw {
        RawReply::List(draws) | RawReply::Wrapped { draws } => draws,
    };

    let total = raw.len();
    let draws: Vec<OfficialDraw> = raw.into_iter().filter_map(into_draw).collect();
    if draws.len() < total {
        tracing::debug!(
            kept = draws.len(),
            dropped = total - draws.len(),
            "dropped malformed LLM draws"
        );
    }
    Ok(draws)
}

fn into_draw(raw: RawDraw) -> Option<OfficialDraw> {
    let numbers: Vec<u8> = raw
        .numeros
        .iter()
        .map(|value| value.as_i64().filter(|n| is_valid_number(*n)).map(|n| n as u8))
        .collect::<Option<_>>()?;
    if numbers.len() != NUMBERS_PER_GAME {
        return None;
    }

    let contest_id = match raw.concurso {
        serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => UNKNOWN_CONTEST.to_string(),
    };

    Some(OfficialDraw::new(
        contest_id,
        raw.data.unwrap_or_default(),
        numbers,
    ))
}
