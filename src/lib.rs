//! lotocheck: check Lotofácil-style tickets against official draws
//!
//! This crate is the orchestration shell around the pure core:
//! - `config`: environment configuration and prize-table loading
//! - `draw_source`: deterministic draw parsing with the optional LLM fallback gate
//! - `debounce`: idle-period scheduling for re-parsing edited input
//! - `session`: mutable state (texts, parsed records, last results)
//! - `report`: serializable check summary for output
//!
//! The matching engine and parsers live in `lotocheck-core`; LLM clients in
//! `lotocheck-agentic`.

pub mod config;
pub mod debounce;
pub mod draw_source;
pub mod error;
pub mod report;
pub mod session;

pub use config::{load_prize_table, CheckerConfig};
pub use debounce::Debouncer;
pub use draw_source::{resolve_draws, DrawOrigin, DrawSource, FallbackPolicy};
pub use error::ConfigError;
pub use report::{CheckReport, RankedDraw};
pub use session::CheckSession;
