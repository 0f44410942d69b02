//! Backend Selection
//!
//! Enum for selecting between LLM providers (Gemini, Anthropic).

use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming the backend
pub const BACKEND_ENV: &str = "LOTOCHECK_LLM_BACKEND";

/// LLM backend provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// Google Gemini (default)
    #[default]
    Gemini,
    /// Anthropic Claude
    Anthropic,
}

/// Error type for parsing LlmBackend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown LOTOCHECK_LLM_BACKEND '{0}'. Valid values: gemini, google, anthropic, claude")]
pub struct ParseBackendError(pub String);

impl LlmBackend {
    /// Read `LOTOCHECK_LLM_BACKEND`, defaulting to Gemini when unset
    pub fn from_env() -> Result<Self, ParseBackendError> {
        match std::env::var(BACKEND_ENV) {
            Ok(value) => value.parse(),
            Err(_) => Ok(LlmBackend::default()),
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            LlmBackend::Gemini => "Gemini",
            LlmBackend::Anthropic => "Anthropic",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmBackend::Gemini),
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            other => Err(ParseBackendError(other.to_string())),
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("gemini".parse::<LlmBackend>().unwrap(), LlmBackend::Gemini);
        assert_eq!("Google".parse::<LlmBackend>().unwrap(), LlmBackend::Gemini);
        assert_eq!("claude".parse::<LlmBackend>().unwrap(), LlmBackend::Anthropic);
        assert!("gpt".parse::<LlmBackend>().is_err());
    }

    #[test]
    fn test_error_message_lists_values() {
        let err = "bogus".parse::<LlmBackend>().unwrap_err();
        assert!(err.to_string().contains("bogus"));
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_display() {
        assert_eq!(LlmBackend::Anthropic.to_string(), "Anthropic");
    }
}
