//! Draw source gating
//!
//! The deterministic parser always runs first and its result is always
//! usable. A fallback parser is consulted only when the local parse found no
//! draws or the input is larger than the policy threshold. A non-empty
//! fallback answer replaces the local parse; an empty answer or a failure
//! leaves it in place.

use serde::Serialize;

use lotocheck_agentic::DrawFallbackParser;
use lotocheck_core::{parse_draws, OfficialDraw};

/// When to consult the fallback parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Input length in bytes above which the fallback is consulted
    pub size_threshold: usize,
}

impl FallbackPolicy {
    pub const DEFAULT_SIZE_THRESHOLD: usize = 500;

    pub fn needs_fallback(&self, text: &str, local: &[OfficialDraw]) -> bool {
        !text.trim().is_empty() && (local.is_empty() || text.len() > self.size_threshold)
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            size_threshold: Self::DEFAULT_SIZE_THRESHOLD,
        }
    }
}

/// Which parser produced the draws in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawOrigin {
    Local,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawSource {
    pub draws: Vec<OfficialDraw>,
    pub origin: DrawOrigin,
    pub fallback_consulted: bool,
    /// Set when the fallback was consulted and failed
    pub fallback_error: Option<String>,
}

impl DrawSource {
    /// Deterministic parse only
    pub fn local(text: &str) -> Self {
        Self {
            draws: parse_draws(text),
            origin: DrawOrigin::Local,
            fallback_consulted: false,
            fallback_error: None,
        }
    }

    /// Consult `fallback` on `text`, keeping the current draws unless it
    /// returns something
    pub async fn apply_fallback(mut self, text: &str, fallback: &dyn DrawFallbackParser) -> Self {
        self.fallback_consulted = true;
        match fallback.parse_draws_best_effort(text).await {
            Ok(draws) if !draws.is_empty() => {
                tracing::info!(
                    parser = fallback.name(),
                    local = self.draws.len(),
                    fallback = draws.len(),
                    "fallback parse replaced local draws"
                );
                self.draws = draws;
                self.origin = DrawOrigin::Fallback;
            }
            Ok(_) => {
                tracing::debug!(parser = fallback.name(), "fallback parse returned nothing");
            }
            Err(e) => {
                tracing::warn!(parser = fallback.name(), error = %e, "fallback draw parsing failed");
                self.fallback_error = Some(e.to_string());
            }
        }
        self
    }
}

/// Parse draws locally, then consult the fallback if the policy says so
pub async fn resolve_draws(
    text: &str,
    fallback: Option<&dyn DrawFallbackParser>,
    policy: &FallbackPolicy,
) -> DrawSource {
    let source = DrawSource::local(text);
    match fallback {
        Some(parser) if policy.needs_fallback(text, &source.draws) => {
            source.apply_fallback(text, parser).await
        }
        _ => source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "0001 (29/09/2003) 02 03 05 06 09 10 11 13 14 16 18 20 23 24 25";

    #[test]
    fn test_policy() {
        let policy = FallbackPolicy::default();
        let local = parse_draws(LINE);
        assert!(!policy.needs_fallback(LINE, &local));
        assert!(policy.needs_fallback("garbage", &[]));
        assert!(!policy.needs_fallback("   ", &[]));

        let big = std::iter::repeat(LINE).take(10).collect::<Vec<_>>().join("\n");
        assert!(big.len() > 500);
        assert!(policy.needs_fallback(&big, &parse_draws(&big)));
    }

    #[tokio::test]
    async fn test_without_fallback_is_local() {
        let source = resolve_draws("nothing here", None, &FallbackPolicy::default()).await;
        assert!(source.draws.is_empty());
        assert_eq!(source.origin, DrawOrigin::Local);
        assert!(!source.fallback_consulted);
    }
}
