//! Ticket batch parser
//!
//! One ticket per line, exactly fifteen numbers. Ticket ids come from the
//! source line index, so they stay meaningful after non-ticket lines are
//! dropped. The batch is capped at `MAX_TICKETS`.

use crate::tokenizer::parse_numbers;
use crate::types::{UserTicket, MAX_TICKETS, NUMBERS_PER_GAME};

/// Parse a ticket batch with the default cap
pub fn parse_tickets(text: &str) -> Vec<UserTicket> {
    parse_tickets_capped(text, MAX_TICKETS)
}

/// Parse a ticket batch keeping at most `cap` tickets (never more than `MAX_TICKETS`)
pub fn parse_tickets_capped(text: &str, cap: usize) -> Vec<UserTicket> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let cap = cap.min(MAX_TICKETS);
    let tickets: Vec<UserTicket> = text
        .lines()
        .enumerate()
        .filter_map(|(line, content)| {
            let numbers = parse_numbers(content);
            (numbers.len() == NUMBERS_PER_GAME).then(|| UserTicket::from_line(line, numbers))
        })
        .take(cap)
        .collect();

    if tickets.len() == cap {
        tracing::debug!(cap, "ticket batch reached the cap; later lines ignored");
    }
    tracing::debug!(tickets = tickets.len(), "parsed ticket batch");
    tickets
}
