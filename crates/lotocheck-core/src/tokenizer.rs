//! Number tokenizer
//!
//! Pulls lottery numbers out of free text. Tokens are separated by runs of
//! whitespace, `,`, `.` or `;`. A byte order mark counts as whitespace. A token counts when it starts with an optional
//! sign and at least one digit; anything after the leading digits is ignored,
//! so `05)` reads as 5 while `(29/09` is dropped. Values outside 1..=25 are
//! discarded. The tokenizer never fails.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{is_valid_number, LotteryNumber};

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{FEFF},.;]+").unwrap());

/// Extract valid lottery numbers from `text`, in order, duplicates kept
pub fn parse_numbers(text: &str) -> Vec<LotteryNumber> {
    SEPARATOR_RE
        .split(text.trim())
        .filter_map(parse_token)
        .collect()
}

/// Parse the leading integer of a token and keep it if it is a lottery number
fn parse_token(token: &str) -> Option<LotteryNumber> {
    let (negative, rest) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Leading zeros are fine ("02"); anything longer than two significant
    // digits is out of range anyway and must not overflow.
    let significant = rest[..digits_len].trim_start_matches('0');
    if significant.len() > 2 {
        return None;
    }
    let magnitude: i64 = if significant.is_empty() {
        0
    } else {
        significant.parse().ok()?
    };
    let value = if negative { -magnitude } else { magnitude };

    is_valid_number(value).then_some(value as LotteryNumber)
}
