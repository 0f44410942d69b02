//! Prize table and aggregation
//!
//! The payout table is external data: contest id → hits → payout. Missing
//! contests or tiers pay zero. Aggregation never fails; validation exists for
//! whoever loads a table from disk.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::types::{Tier, TierBuckets};

/// Payouts for one contest, keyed by hit count
pub type ContestPayouts = BTreeMap<u8, Decimal>;

/// Problems found by [`PrizeTable::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrizeTableError {
    #[error("contest '{contest}': {hits} hits is not a prize tier (expected 11..=15)")]
    UnknownTier { contest: String, hits: u8 },

    #[error("contest '{contest}': payout for {hits} hits is negative ({amount})")]
    NegativePayout {
        contest: String,
        hits: u8,
        amount: Decimal,
    },
}

/// Payout amounts per contest and tier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable {
    contests: BTreeMap<String, ContestPayouts>,
}

impl PrizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payout for `tier` in `contest`, replacing any previous value
    pub fn set(&mut self, contest: impl Into<String>, tier: Tier, amount: Decimal) {
        self.contests
            .entry(contest.into())
            .or_default()
            .insert(tier.hits(), amount);
    }

    pub fn with(mut self, contest: impl Into<String>, tier: Tier, amount: Decimal) -> Self {
        self.set(contest, tier, amount);
        self
    }

    /// Payouts for a contest; unknown contests get an empty table
    pub fn payouts_for(&self, contest: &str) -> ContestPayouts {
        self.contests.get(contest).cloned().unwrap_or_default()
    }

    /// Payout for a single tier, zero when absent
    pub fn payout(&self, contest: &str, tier: Tier) -> Decimal {
        self.contests
            .get(contest)
            .and_then(|payouts| payouts.get(&tier.hits()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.contests.is_empty()
    }

    pub fn contest_count(&self) -> usize {
        self.contests.len()
    }

    /// Check every entry is a real tier with a non-negative payout
    pub fn validate(&self) -> Result<(), PrizeTableError> {
        for (contest, payouts) in &self.contests {
            for (&hits, &amount) in payouts {
                if Tier::from_hits(hits).is_none() {
                    return Err(PrizeTableError::UnknownTier {
                        contest: contest.clone(),
                        hits,
                    });
                }
                if amount.is_sign_negative() && !amount.is_zero() {
                    return Err(PrizeTableError::NegativePayout {
                        contest: contest.clone(),
                        hits,
                        amount,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Sum of (winners in tier × payout for tier) over tiers 15..=11
///
/// Saturates at `Decimal::MAX` instead of overflowing.
pub fn total_prize(hits: &TierBuckets, payouts: &ContestPayouts) -> Decimal {
    sum_prizes(Tier::DESCENDING.iter().map(|tier| {
        let payout = payouts
            .get(&tier.hits())
            .copied()
            .unwrap_or(Decimal::ZERO);
        Decimal::from(hits.count(*tier)).saturating_mul(payout)
    }))
}

/// Saturating sum of prize amounts
pub fn sum_prizes<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}
