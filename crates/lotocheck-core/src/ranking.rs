//! Result ranking and tier totals
//!
//! Display order puts draws with the best wins first. Draws are compared tier
//! by tier from fifteen hits down: any winner at a tier beats none, and more
//! winners beat fewer. Full ties keep their input order.

use serde::Serialize;
use std::cmp::Ordering;

use crate::types::{DrawResult, Tier};

/// Order two results for display; `Less` means `a` is shown first
pub fn compare_results(a: &DrawResult, b: &DrawResult) -> Ordering {
    for tier in Tier::DESCENDING {
        let a_count = a.hits.count(tier);
        let b_count = b.hits.count(tier);
        match (a_count, b_count) {
            (0, 0) => continue,
            (_, 0) => return Ordering::Less,
            (0, _) => return Ordering::Greater,
            _ if a_count != b_count => return b_count.cmp(&a_count),
            _ => continue,
        }
    }
    Ordering::Equal
}

/// Results in display order, leaving the input untouched
pub fn rank_results(results: &[DrawResult]) -> Vec<&DrawResult> {
    let mut ranked: Vec<&DrawResult> = results.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| compare_results(a, b));
    ranked
}

/// Winning matches per tier across all draws
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TierTotals {
    pub fifteen: usize,
    pub fourteen: usize,
    pub thirteen: usize,
    pub twelve: usize,
    pub eleven: usize,
}

impl TierTotals {
    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Fifteen => self.fifteen,
            Tier::Fourteen => self.fourteen,
            Tier::Thirteen => self.thirteen,
            Tier::Twelve => self.twelve,
            Tier::Eleven => self.eleven,
        }
    }

    fn add(&mut self, tier: Tier, count: usize) {
        let slot = match tier {
            Tier::Fifteen => &mut self.fifteen,
            Tier::Fourteen => &mut self.fourteen,
            Tier::Thirteen => &mut self.thirteen,
            Tier::Twelve => &mut self.twelve,
            Tier::Eleven => &mut self.eleven,
        };
        *slot += count;
    }

    pub fn total(&self) -> usize {
        Tier::DESCENDING.iter().map(|tier| self.get(*tier)).sum()
    }
}

pub fn tier_totals(results: &[DrawResult]) -> TierTotals {
    let mut totals = TierTotals::default();
    for result in results {
        for tier in Tier::DESCENDING {
            totals.add(tier, result.hits.count(tier));
        }
    }
    totals
}
