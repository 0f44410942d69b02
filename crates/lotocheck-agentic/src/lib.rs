//! LLM-assisted helpers for lotocheck
//!
//! Nothing here is needed for correct results: the deterministic parsers in
//! `lotocheck-core` always run first. This crate supplies
//! - a best-effort draw parser used when the deterministic parse is empty or
//!   the input is large
//! - a short written balance summary of a ticket batch
//!
//! ## Backend Selection
//!
//! Set `LOTOCHECK_LLM_BACKEND` environment variable:
//! - `gemini` (default): Google Gemini API (`GEMINI_API_KEY`)
//! - `anthropic`: Anthropic Claude API (`ANTHROPIC_API_KEY`)

// LLM client abstraction
pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod gemini_client;
pub mod llm_client;

// Collaborators
pub mod draw_fallback;
pub mod ticket_summary;

// Re-exports for convenience
pub use backend::{LlmBackend, ParseBackendError};
pub use client_factory::{create_llm_client, create_llm_client_for, create_llm_client_with_key};
pub use draw_fallback::{DrawFallbackParser, LlmDrawParser};
pub use llm_client::LlmClient;
pub use ticket_summary::summarize_tickets;
