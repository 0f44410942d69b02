//! lotocheck-core: ticket checking for 15-number lottery games
//!
//! Pure, synchronous functions with NO I/O or network access:
//! - Number tokenizer for free-form text
//! - Official draw and ticket batch parsers
//! - Matching engine (bitmask intersection, tier buckets)
//! - Prize table and per-draw aggregation
//! - Result ranking and tier totals
//! - Tab-separated export
//! - Ticket balance statistics
//!
//! ```text
//! raw text → tokenizer → parsers → matching → ranking / export
//!                                     ↑
//!                                prize table
//! ```
//!
//! Scheduling (debounced re-parsing), the LLM fallback parser and prize-table
//! loading live in the `lotocheck` shell.

pub mod balance;
pub mod draw_parser;
pub mod export;
pub mod matching;
pub mod prize;
pub mod ranking;
pub mod ticket_parser;
pub mod tokenizer;
pub mod types;

// Re-export commonly used items
pub use balance::{batch_balance, ticket_balance, BatchBalance, TicketBalance};
pub use draw_parser::{parse_draw_line, parse_draws};
pub use export::{export_tsv, flatten_matches, write_tsv, ExportRow, EXPORT_HEADER};
pub use matching::{check_results, intersection_size, NumberMask};
pub use prize::{sum_prizes, total_prize, ContestPayouts, PrizeTable, PrizeTableError};
pub use ranking::{compare_results, rank_results, tier_totals, TierTotals};
pub use ticket_parser::{parse_tickets, parse_tickets_capped};
pub use tokenizer::parse_numbers;
pub use types::{
    DrawResult, InvalidTier, LotteryNumber, OfficialDraw, TicketMatch, Tier, TierBuckets,
    UserTicket, MAX_TICKETS, NUMBERS_PER_GAME, NUMBER_MAX, NUMBER_MIN, UNKNOWN_CONTEST,
};
