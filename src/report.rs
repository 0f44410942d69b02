//! Serializable summary of a check run

use rust_decimal::Decimal;
use serde::Serialize;

use lotocheck_core::{sum_prizes, DrawResult, TierTotals};

use crate::draw_source::DrawOrigin;
use crate::session::CheckSession;

/// One draw in display order
#[derive(Debug, Clone, Serialize)]
pub struct RankedDraw<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub result: &'a DrawResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport<'a> {
    pub draws: usize,
    pub tickets: usize,
    pub draw_origin: DrawOrigin,
    pub totals: TierTotals,
    pub total_prize: Decimal,
    pub ranked: Vec<RankedDraw<'a>>,
}

impl<'a> CheckReport<'a> {
    pub fn from_session(session: &'a CheckSession) -> Self {
        let ranked: Vec<RankedDraw<'a>> = session
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(index, result)| RankedDraw {
                rank: index + 1,
                result,
            })
            .collect();

        Self {
            draws: session.draws().len(),
            tickets: session.tickets().len(),
            draw_origin: session.draw_origin(),
            totals: session.tier_totals(),
            total_prize: sum_prizes(session.results().iter().map(|r| r.total_prize)),
            ranked,
        }
    }

    /// Draws with at least one winning ticket
    pub fn winning_draws(&self) -> impl Iterator<Item = &RankedDraw<'a>> {
        self.ranked.iter().filter(|draw| draw.result.has_winners())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;

    #[tokio::test]
    async fn test_report_ranks_and_serializes() {
        let mut session = CheckSession::new(&CheckerConfig::default());
        session.set_tickets_text("01 02 03 04 05 06 07 08 09 10 11 12 13 14 15");
        session
            .set_draws_text(
                "0001 (a) 16 17 18 19 20 21 22 23 24 25 01 02 03 04 05\n\
                 0002 (b) 01 02 03 04 05 06 07 08 09 10 11 12 13 14 15",
            )
            .await;
        session.run_check();

        let report = CheckReport::from_session(&session);
        assert_eq!(report.ranked[0].result.contest_id, "0002");
        assert_eq!(report.ranked[0].rank, 1);
        assert_eq!(report.winning_draws().count(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ranked"][0]["contest_id"], "0002");
        assert_eq!(json["totals"]["fifteen"], 1);
        assert_eq!(json["draw_origin"], "local");
    }

    #[tokio::test]
    async fn test_total_prize_saturates_across_draws() {
        let prizes = lotocheck_core::PrizeTable::new()
            .with("0001", lotocheck_core::Tier::Fifteen, Decimal::MAX)
            .with("0002", lotocheck_core::Tier::Fifteen, Decimal::MAX);
        let mut session = CheckSession::new(&CheckerConfig::default()).with_prizes(prizes);
        session.set_tickets_text("01 02 03 04 05 06 07 08 09 10 11 12 13 14 15");
        session
            .set_draws_text(
                "0001 (a) 01 02 03 04 05 06 07 08 09 10 11 12 13 14 15\n\
                 0002 (b) 01 02 03 04 05 06 07 08 09 10 11 12 13 14 15",
            )
            .await;
        session.run_check();

        let report = CheckReport::from_session(&session);
        assert_eq!(report.total_prize, Decimal::MAX);
    }
}
