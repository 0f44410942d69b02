//! Check session
//!
//! Holds the mutable state around the pure core: the latest raw texts, the
//! records parsed from them, the prize table and the last check results.
//! Any input change drops stale results.

use std::sync::Arc;

use lotocheck_agentic::DrawFallbackParser;
use lotocheck_core::{
    batch_balance, check_results, export_tsv, parse_tickets_capped, rank_results, tier_totals,
    BatchBalance, DrawResult, OfficialDraw, PrizeTable, TierTotals, UserTicket,
};

use crate::config::CheckerConfig;
use crate::draw_source::{resolve_draws, DrawOrigin, DrawSource, FallbackPolicy};

pub struct CheckSession {
    policy: FallbackPolicy,
    max_tickets: usize,
    fallback: Option<Arc<dyn DrawFallbackParser>>,
    prizes: PrizeTable,
    tickets: Vec<UserTicket>,
    draws: Vec<OfficialDraw>,
    draw_origin: DrawOrigin,
    results: Option<Vec<DrawResult>>,
}

impl CheckSession {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            policy: config.fallback_policy(),
            max_tickets: config.max_tickets,
            fallback: None,
            prizes: PrizeTable::default(),
            tickets: Vec::new(),
            draws: Vec::new(),
            draw_origin: DrawOrigin::Local,
            results: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn DrawFallbackParser>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_prizes(mut self, prizes: PrizeTable) -> Self {
        self.set_prizes(prizes);
        self
    }

    pub fn set_prizes(&mut self, prizes: PrizeTable) {
        self.prizes = prizes;
        self.results = None;
    }

    /// Re-parse the ticket text; returns the number of tickets kept
    pub fn set_tickets_text(&mut self, text: &str) -> usize {
        self.replace_tickets(parse_tickets_capped(text, self.max_tickets));
        self.tickets.len()
    }

    pub fn replace_tickets(&mut self, tickets: Vec<UserTicket>) {
        self.tickets = tickets;
        self.results = None;
    }

    /// Re-parse the draw text through the fallback gate
    pub async fn set_draws_text(&mut self, text: &str) -> DrawSource {
        let source = resolve_draws(text, self.fallback.as_deref(), &self.policy).await;
        self.replace_draws(&source);
        source
    }

    pub fn replace_draws(&mut self, source: &DrawSource) {
        self.draws = source.draws.clone();
        self.draw_origin = source.origin;
        self.results = None;
    }

    /// Match every ticket against every draw and keep the results
    pub fn run_check(&mut self) -> &[DrawResult] {
        let results = check_results(&self.draws, &self.tickets, Some(&self.prizes));
        self.results.insert(results)
    }

    /// Last results in draw order; empty until `run_check` runs
    pub fn results(&self) -> &[DrawResult] {
        self.results.as_deref().unwrap_or_default()
    }

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }

    pub fn ranked(&self) -> Vec<&DrawResult> {
        rank_results(self.results())
    }

    pub fn tier_totals(&self) -> TierTotals {
        tier_totals(self.results())
    }

    pub fn export_tsv(&self) -> String {
        export_tsv(self.results())
    }

    pub fn batch_balance(&self) -> BatchBalance {
        batch_balance(&self.tickets)
    }

    pub fn tickets(&self) -> &[UserTicket] {
        &self.tickets
    }

    pub fn draws(&self) -> &[OfficialDraw] {
        &self.draws
    }

    pub fn draw_origin(&self) -> DrawOrigin {
        self.draw_origin
    }

    pub fn prizes(&self) -> &PrizeTable {
        &self.prizes
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn fallback(&self) -> Option<Arc<dyn DrawFallbackParser>> {
        self.fallback.clone()
    }
}
