//! Configuration
//!
//! Settings come from the environment (after `.env` is loaded) and can be
//! overridden by CLI flags. Prize tables are loaded from YAML or JSON files.
//!
//! | Variable | Default |
//! |---|---|
//! | `LOTOCHECK_PRIZES` | unset |
//! | `LOTOCHECK_AI_FALLBACK` | `false` |
//! | `LOTOCHECK_FALLBACK_THRESHOLD` | `500` |
//! | `LOTOCHECK_MAX_TICKETS` | `50000` |
//! | `LOTOCHECK_TICKET_DEBOUNCE_MS` | `300` |
//! | `LOTOCHECK_DRAW_DEBOUNCE_MS` | `1500` |
//! | `LOTOCHECK_LLM_BACKEND` | `gemini` |

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use lotocheck_agentic::LlmBackend;
use lotocheck_core::{PrizeTable, MAX_TICKETS};

use crate::draw_source::FallbackPolicy;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Prize table file, if any
    pub prizes_path: Option<PathBuf>,
    /// Consult the LLM draw parser when the gate allows it
    pub ai_fallback: bool,
    /// Input size in bytes above which the fallback is consulted
    pub fallback_threshold: usize,
    pub max_tickets: usize,
    pub ticket_debounce: Duration,
    pub draw_debounce: Duration,
    pub llm_backend: LlmBackend,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            prizes_path: None,
            ai_fallback: false,
            fallback_threshold: FallbackPolicy::DEFAULT_SIZE_THRESHOLD,
            max_tickets: MAX_TICKETS,
            ticket_debounce: Duration::from_millis(300),
            draw_debounce: Duration::from_millis(1500),
            llm_backend: LlmBackend::default(),
        }
    }
}

impl CheckerConfig {
    /// Build from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("LOTOCHECK_PRIZES").filter(|p| !p.trim().is_empty()) {
            config.prizes_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("LOTOCHECK_AI_FALLBACK") {
            config.ai_fallback = parse_flag("LOTOCHECK_AI_FALLBACK", &value)?;
        }
        if let Some(value) = lookup("LOTOCHECK_FALLBACK_THRESHOLD") {
            config.fallback_threshold = parse_number("LOTOCHECK_FALLBACK_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("LOTOCHECK_MAX_TICKETS") {
            let max: usize = parse_number("LOTOCHECK_MAX_TICKETS", &value)?;
            if max > MAX_TICKETS {
                return Err(ConfigError::OutOfRange {
                    key: "LOTOCHECK_MAX_TICKETS",
                    value: max,
                    limit: MAX_TICKETS,
                });
            }
            config.max_tickets = max;
        }
        if let Some(value) = lookup("LOTOCHECK_TICKET_DEBOUNCE_MS") {
            config.ticket_debounce =
                Duration::from_millis(parse_number("LOTOCHECK_TICKET_DEBOUNCE_MS", &value)?);
        }
        if let Some(value) = lookup("LOTOCHECK_DRAW_DEBOUNCE_MS") {
            config.draw_debounce =
                Duration::from_millis(parse_number("LOTOCHECK_DRAW_DEBOUNCE_MS", &value)?);
        }
        if let Some(value) = lookup(lotocheck_agentic::backend::BACKEND_ENV) {
            config.llm_backend = value.parse()?;
        }

        Ok(config)
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            size_threshold: self.fallback_threshold,
        }
    }

    /// Load the configured prize table, or an empty one when none is set
    pub fn load_prizes(&self) -> Result<PrizeTable> {
        match &self.prizes_path {
            Some(path) => load_prize_table(path),
            None => Ok(PrizeTable::default()),
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected true/false")),
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, value, e))
}

/// Load and validate a prize table from a `.yaml`/`.yml` or `.json` file
pub fn load_prize_table(path: &Path) -> Result<PrizeTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prize table {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let table: PrizeTable = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML prize table {}", path.display()))?,
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON prize table {}", path.display()))?,
        other => {
            return Err(anyhow!(
                "Unsupported prize table format {:?} for {} (use .yaml, .yml or .json)",
                other.unwrap_or(""),
                path.display()
            ))
        }
    };

    table
        .validate()
        .with_context(|| format!("Invalid prize table {}", path.display()))?;

    info!(
        contests = table.contest_count(),
        path = %path.display(),
        "loaded prize table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotocheck_core::Tier;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CheckerConfig::default());
        assert_eq!(config.max_tickets, 50_000);
        assert_eq!(config.fallback_threshold, 500);
        assert_eq!(config.ticket_debounce, Duration::from_millis(300));
        assert!(!config.ai_fallback);
    }

    #[test]
    fn test_overrides() {
        let config = CheckerConfig::from_lookup(lookup(&[
            ("LOTOCHECK_AI_FALLBACK", "yes"),
            ("LOTOCHECK_FALLBACK_THRESHOLD", "1000"),
            ("LOTOCHECK_MAX_TICKETS", "10"),
            ("LOTOCHECK_DRAW_DEBOUNCE_MS", "50"),
            ("LOTOCHECK_LLM_BACKEND", "anthropic"),
            ("LOTOCHECK_PRIZES", "prizes.yaml"),
        ]))
        .unwrap();
        assert!(config.ai_fallback);
        assert_eq!(config.fallback_policy().size_threshold, 1000);
        assert_eq!(config.max_tickets, 10);
        assert_eq!(config.draw_debounce, Duration::from_millis(50));
        assert_eq!(config.llm_backend, LlmBackend::Anthropic);
        assert_eq!(config.prizes_path, Some(PathBuf::from("prizes.yaml")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CheckerConfig::from_lookup(lookup(&[("LOTOCHECK_AI_FALLBACK", "maybe")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            CheckerConfig::from_lookup(lookup(&[("LOTOCHECK_MAX_TICKETS", "60000")])),
            Err(ConfigError::OutOfRange { limit: 50_000, .. })
        ));
        assert!(matches!(
            CheckerConfig::from_lookup(lookup(&[("LOTOCHECK_LLM_BACKEND", "gpt")])),
            Err(ConfigError::Backend(_))
        ));
    }

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_table() {
        let file = write_temp(".yaml", "\"3000\":\n  15: 1500000\n  14: 1800\n");
        let table = load_prize_table(file.path()).unwrap();
        assert_eq!(table.payout("3000", Tier::Fourteen), Decimal::from(1800));
    }

    #[test]
    fn test_load_json_table() {
        let file = write_temp(".json", r#"{"3000": {"11": "6.00"}}"#);
        let table = load_prize_table(file.path()).unwrap();
        assert_eq!(table.payout("3000", Tier::Eleven), Decimal::from(6));
    }

    #[test]
    fn test_load_rejects_negative_payout() {
        let file = write_temp(".json", r#"{"3000": {"11": -6}}"#);
        let err = load_prize_table(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("negative"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = write_temp(".txt", "{}");
        assert!(load_prize_table(file.path()).is_err());
    }

    #[test]
    fn test_missing_path_means_empty_table() {
        let table = CheckerConfig::default().load_prizes().unwrap();
        assert!(table.is_empty());
    }
}
