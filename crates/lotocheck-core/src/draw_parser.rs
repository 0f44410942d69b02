//! Official draw parser
//!
//! One draw per line. The canonical shape is
//!
//! ```text
//! 0001 (29/09/2003) 02 03 05 06 09 10 11 13 14 16 18 20 23 24 25
//! ```
//!
//! A bare line of exactly fifteen numbers is also accepted and gets the
//! placeholder contest id. Anything else is skipped.

use regex::Regex;
use std::sync::LazyLock;

use crate::tokenizer::parse_numbers;
use crate::types::{OfficialDraw, NUMBERS_PER_GAME, UNKNOWN_CONTEST};

/// `<contest> (<date>) <numbers>`
static CANONICAL_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\s*\(([^)]+)\)\s*(.*)$").unwrap());

/// Parse one line into a draw, or `None` if it is not a draw line
pub fn parse_draw_line(line: &str) -> Option<OfficialDraw> {
    let line = line.trim_start_matches('\u{FEFF}');
    if let Some(caps) = CANONICAL_LINE_RE.captures(line) {
        let numbers = parse_numbers(&caps[3]);
        if numbers.len() == NUMBERS_PER_GAME {
            return Some(OfficialDraw::new(&caps[1], &caps[2], numbers));
        }
    }

    let numbers = parse_numbers(line);
    if numbers.len() == NUMBERS_PER_GAME {
        return Some(OfficialDraw::new(UNKNOWN_CONTEST, "", numbers));
    }

    None
}

/// Parse every line of `text`; lines that are not draws are left out
pub fn parse_draws(text: &str) -> Vec<OfficialDraw> {
    let draws: Vec<OfficialDraw> = text
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let parsed = parse_draw_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                tracing::trace!(line = index, "skipping unrecognised draw line");
            }
            parsed
        })
        .collect();

    tracing::debug!(draws = draws.len(), "parsed official draws");
    draws
}
