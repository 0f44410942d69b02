//! Core data types
//!
//! Value types shared by the parsers, the matching engine, the ranker and the
//! exporter. Everything here is plain owned data: the core never keeps
//! references to caller state between calls.

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// A single lottery number, always within `NUMBER_MIN..=NUMBER_MAX`
pub type LotteryNumber = u8;

/// Smallest valid lottery number
pub const NUMBER_MIN: LotteryNumber = 1;

/// Largest valid lottery number
pub const NUMBER_MAX: LotteryNumber = 25;

/// Numbers on every ticket and every official draw
pub const NUMBERS_PER_GAME: usize = 15;

/// Hard cap on tickets kept from one ticket batch
pub const MAX_TICKETS: usize = 50_000;

/// Contest id used when a draw line carries no recognisable contest number
pub const UNKNOWN_CONTEST: &str = "?";

/// Returns true if `n` is a valid lottery number
pub fn is_valid_number(n: i64) -> bool {
    (NUMBER_MIN as i64..=NUMBER_MAX as i64).contains(&n)
}

// =============================================================================
// PARSED RECORDS
// =============================================================================

/// One official draw result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialDraw {
    /// Contest identifier as written in the source ("0001"), or `UNKNOWN_CONTEST`
    pub contest_id: String,
    /// Free-form draw date; empty when the line had none
    pub date: String,
    /// The drawn numbers in source order
    pub numbers: Vec<LotteryNumber>,
}

impl OfficialDraw {
    pub fn new(
        contest_id: impl Into<String>,
        date: impl Into<String>,
        numbers: Vec<LotteryNumber>,
    ) -> Self {
        Self {
            contest_id: contest_id.into(),
            date: date.into(),
            numbers,
        }
    }

    /// True when the contest id is the placeholder for an unnumbered line
    pub fn has_unknown_contest(&self) -> bool {
        self.contest_id == UNKNOWN_CONTEST
    }
}

/// One user ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTicket {
    /// Stable id derived from the source line (`game-<line>`)
    pub id: String,
    /// Zero-based line index in the text the ticket was parsed from
    pub line: usize,
    /// The chosen numbers in source order
    pub numbers: Vec<LotteryNumber>,
}

impl UserTicket {
    pub fn from_line(line: usize, numbers: Vec<LotteryNumber>) -> Self {
        Self {
            id: format!("game-{}", line),
            line,
            numbers,
        }
    }

    /// Numbers sorted ascending, as shown in results and exports
    pub fn sorted_numbers(&self) -> Vec<LotteryNumber> {
        let mut sorted = self.numbers.clone();
        sorted.sort_unstable();
        sorted
    }
}

// =============================================================================
// TIERS
// =============================================================================

/// Error for hit counts that are not a prize tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} hits is not a prize tier (expected 11..=15)")]
pub struct InvalidTier(pub u8);

/// Prize tier, named by the number of hits it pays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Eleven = 11,
    Twelve = 12,
    Thirteen = 13,
    Fourteen = 14,
    Fifteen = 15,
}

impl Tier {
    /// All tiers from the top prize down
    pub const DESCENDING: [Tier; 5] = [
        Tier::Fifteen,
        Tier::Fourteen,
        Tier::Thirteen,
        Tier::Twelve,
        Tier::Eleven,
    ];

    /// Lowest hit count that wins anything
    pub const MIN_HITS: u8 = 11;

    pub fn hits(self) -> u8 {
        self as u8
    }

    pub fn from_hits(hits: u8) -> Option<Tier> {
        match hits {
            15 => Some(Tier::Fifteen),
            14 => Some(Tier::Fourteen),
            13 => Some(Tier::Thirteen),
            12 => Some(Tier::Twelve),
            11 => Some(Tier::Eleven),
            _ => None,
        }
    }

    /// Position in `DESCENDING`
    fn slot(self) -> usize {
        (Tier::Fifteen.hits() - self.hits()) as usize
    }
}

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(hits: u8) -> Result<Self, Self::Error> {
        Tier::from_hits(hits).ok_or(InvalidTier(hits))
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.hits()
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hits", self.hits())
    }
}

// =============================================================================
// MATCH RESULTS
// =============================================================================

/// A ticket that reached a prize tier in one draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMatch {
    /// Position of the ticket in the batch that was checked
    pub ticket_index: usize,
    /// Ticket numbers sorted ascending
    pub numbers: Vec<LotteryNumber>,
    /// Numbers shared with the draw (11..=15)
    pub hits: u8,
}

/// Matches of one draw grouped by tier
///
/// Always holds all five tiers; a tier with no winners is an empty bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierBuckets {
    buckets: [Vec<TicketMatch>; 5],
}

impl TierBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tier: Tier) -> &[TicketMatch] {
        &self.buckets[tier.slot()]
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.buckets[tier.slot()].len()
    }

    pub fn push(&mut self, tier: Tier, found: TicketMatch) {
        self.buckets[tier.slot()].push(found);
    }

    /// Total matches over every tier
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Buckets from the top tier down
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[TicketMatch])> + '_ {
        Tier::DESCENDING
            .iter()
            .map(move |tier| (*tier, self.get(*tier)))
    }

    /// Count per tier, top tier first
    pub fn counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for (slot, tier) in Tier::DESCENDING.iter().enumerate() {
            counts[slot] = self.count(*tier);
        }
        counts
    }
}

impl Serialize for TierBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Tier::DESCENDING.len()))?;
        for (tier, matches) in self.iter() {
            map.serialize_entry(&tier.hits(), matches)?;
        }
        map.end()
    }
}

/// Outcome of checking a ticket batch against one draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    pub contest_id: String,
    pub hits: TierBuckets,
    /// Sum of payouts for every winning match in this draw
    pub total_prize: Decimal,
}

impl DrawResult {
    pub fn has_winners(&self) -> bool {
        !self.hits.is_empty()
    }

    /// Highest tier with at least one winner
    pub fn best_tier(&self) -> Option<Tier> {
        Tier::DESCENDING
            .into_iter()
            .find(|tier| self.hits.count(*tier) > 0)
    }
}
