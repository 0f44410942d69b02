//! Tab-separated export of winning tickets
//!
//! The output is pasted straight into spreadsheets, so the layout is fixed:
//! a header row, then one row per winning ticket and draw with the contest,
//! the hit count and the fifteen sorted numbers in their own columns. Rows
//! are ordered by hit count, highest first.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

use crate::types::{DrawResult, LotteryNumber};

/// Header row of the export, without the trailing newline
pub const EXPORT_HEADER: &str = "Concurso\tAcertos\tDezena1\tDezena2\tDezena3\tDezena4\tDezena5\tDezena6\tDezena7\tDezena8\tDezena9\tDezena10\tDezena11\tDezena12\tDezena13\tDezena14\tDezena15";

/// One flattened winning match
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub contest_id: String,
    pub hits: u8,
    pub numbers: Vec<LotteryNumber>,
}

/// The row's tab-separated columns, without the trailing newline
impl fmt::Display for ExportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.contest_id, self.hits)?;
        for number in &self.numbers {
            write!(f, "\t{}", number)?;
        }
        Ok(())
    }
}

/// Every match across all results, highest hit count first
///
/// Rows are gathered draw by draw, tiers fifteen to eleven, then stably
/// sorted on hits alone; rows with equal hits keep that gathering order.
pub fn flatten_matches(results: &[DrawResult]) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = results
        .iter()
        .flat_map(|result| {
            result.hits.iter().flat_map(move |(tier, matches)| {
                matches.iter().map(move |found| ExportRow {
                    contest_id: result.contest_id.clone(),
                    hits: tier.hits(),
                    numbers: found.numbers.clone(),
                })
            })
        })
        .collect();

    rows.sort_by(|a, b| b.hits.cmp(&a.hits));
    rows
}

/// Stream the export to a writer
pub fn write_tsv<W: Write>(results: &[DrawResult], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", EXPORT_HEADER)?;
    for row in flatten_matches(results) {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

/// Render the export as a string
pub fn export_tsv(results: &[DrawResult]) -> String {
    let mut tsv = String::from(EXPORT_HEADER);
    tsv.push('\n');
    for row in flatten_matches(results) {
        tsv.push_str(&row.to_string());
        tsv.push('\n');
    }
    tsv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TicketMatch, Tier, TierBuckets};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn result(contest: &str, matches: &[(Tier, Vec<u8>)]) -> DrawResult {
        let mut hits = TierBuckets::new();
        for (index, (tier, numbers)) in matches.iter().enumerate() {
            hits.push(
                *tier,
                TicketMatch {
                    ticket_index: index,
                    numbers: numbers.clone(),
                    hits: tier.hits(),
                },
            );
        }
        DrawResult {
            contest_id: contest.to_string(),
            hits,
            total_prize: Decimal::ZERO,
        }
    }

    fn game(offset: u8) -> Vec<u8> {
        (1 + offset..=15 + offset).collect()
    }

    #[test]
    fn test_header_has_seventeen_columns() {
        assert_eq!(EXPORT_HEADER.split('\t').count(), 17);
        assert!(export_tsv(&[]).starts_with("Concurso\tAcertos\tDezena1\t"));
        assert_eq!(export_tsv(&[]), format!("{}\n", EXPORT_HEADER));
    }

    #[test]
    fn test_string_and_writer_agree() {
        let results = [
            result("0001", &[(Tier::Eleven, game(0)), (Tier::Fifteen, game(1))]),
            result("0002", &[(Tier::Thirteen, game(2))]),
        ];
        let mut written = Vec::new();
        write_tsv(&results, &mut written).unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), export_tsv(&results));
    }

    #[test]
    fn test_row_layout() {
        let tsv = export_tsv(&[result("0001", &[(Tier::Eleven, game(0))])]);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "0001\t11\t1\t2\t3\t4\t5\t6\t7\t8\t9\t10\t11\t12\t13\t14\t15");
        assert!(tsv.ends_with('\n'));
    }

    #[test]
    fn test_higher_hits_first_across_draws() {
        let results = vec![
            result("A", &[(Tier::Fourteen, game(0))]),
            result("B", &[(Tier::Fifteen, game(1))]),
        ];
        let tsv = export_tsv(&results);
        let lines: Vec<&str> = tsv.lines().collect();
        assert!(lines[1].starts_with("B\t15\t"));
        assert!(lines[2].starts_with("A\t14\t"));
    }

    #[test]
    fn test_equal_hits_keep_draw_order() {
        let results = vec![
            result("A", &[(Tier::Twelve, game(0)), (Tier::Thirteen, game(2))]),
            result("B", &[(Tier::Twelve, game(1))]),
            result("C", &[(Tier::Thirteen, game(3))]),
        ];
        let rows = flatten_matches(&results);
        let order: Vec<(&str, u8)> = rows.iter().map(|r| (r.contest_id.as_str(), r.hits)).collect();
        assert_eq!(order, vec![("A", 13), ("C", 13), ("A", 12), ("B", 12)]);
    }

    #[test]
    fn test_write_tsv_matches_string() {
        let results = vec![result("9", &[(Tier::Fifteen, game(0))])];
        let mut out = Vec::new();
        write_tsv(&results, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), export_tsv(&results));
    }
}
