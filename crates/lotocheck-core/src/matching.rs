//! Matching engine
//!
//! Checks a ticket batch against every official draw and groups winning
//! tickets by tier.
//!
//! Numbers live in 1..=25, so each ticket or draw folds into a 25-bit
//! presence mask and a hit count is `popcount(ticket & draw)`. Ticket masks
//! are built once per run; the per-pair cost is constant, keeping a full run
//! at O(tickets × draws) for batches of up to 50,000 tickets.

use crate::prize::{total_prize, PrizeTable};
use crate::types::{
    DrawResult, LotteryNumber, OfficialDraw, TicketMatch, Tier, TierBuckets, UserTicket,
    NUMBER_MAX, NUMBER_MIN,
};

/// Presence table for the numbers of one ticket or draw
///
/// Bit `n` is set when number `n` is present. Repeated numbers collapse into
/// one bit, so intersections count distinct values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NumberMask(u32);

impl NumberMask {
    pub fn from_numbers(numbers: &[LotteryNumber]) -> Self {
        let bits = numbers
            .iter()
            .filter(|n| (NUMBER_MIN..=NUMBER_MAX).contains(*n))
            .fold(0u32, |bits, n| bits | (1u32 << *n));
        Self(bits)
    }

    pub fn contains(self, number: LotteryNumber) -> bool {
        number <= NUMBER_MAX && self.0 & (1u32 << number) != 0
    }

    /// Distinct numbers present in the mask
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Count of numbers present in both masks
    pub fn intersection_size(self, other: NumberMask) -> u8 {
        (self.0 & other.0).count_ones() as u8
    }
}

/// Distinct numbers shared by a ticket and a draw
pub fn intersection_size(ticket: &[LotteryNumber], draw: &[LotteryNumber]) -> u8 {
    NumberMask::from_numbers(ticket).intersection_size(NumberMask::from_numbers(draw))
}

/// Check every ticket against every draw
///
/// Returns one result per draw, in draw order. Within a tier, matches keep
/// the batch order of their tickets. Tickets below eleven hits leave no
/// trace. `prizes` defaults to an empty table, which makes every total zero.
pub fn check_results(
    draws: &[OfficialDraw],
    tickets: &[UserTicket],
    prizes: Option<&PrizeTable>,
) -> Vec<DrawResult> {
    let empty = PrizeTable::default();
    let prizes = prizes.unwrap_or(&empty);

    let ticket_masks: Vec<NumberMask> = tickets
        .iter()
        .map(|ticket| NumberMask::from_numbers(&ticket.numbers))
        .collect();

    let results: Vec<DrawResult> = draws
        .iter()
        .map(|draw| {
            let hits = bucket_draw(draw, tickets, &ticket_masks);
            let total_prize = total_prize(&hits, &prizes.payouts_for(&draw.contest_id));
            DrawResult {
                contest_id: draw.contest_id.clone(),
                hits,
                total_prize,
            }
        })
        .collect();

    tracing::debug!(
        draws = draws.len(),
        tickets = tickets.len(),
        winners = results.iter().map(|r| r.hits.total()).sum::<usize>(),
        "checked ticket batch"
    );
    results
}

fn bucket_draw(
    draw: &OfficialDraw,
    tickets: &[UserTicket],
    ticket_masks: &[NumberMask],
) -> TierBuckets {
    let draw_mask = NumberMask::from_numbers(&draw.numbers);
    let mut hits = TierBuckets::new();

    for (ticket_index, (ticket, mask)) in tickets.iter().zip(ticket_masks).enumerate() {
        let count = mask.intersection_size(draw_mask);
        if let Some(tier) = Tier::from_hits(count) {
            hits.push(
                tier,
                TicketMatch {
                    ticket_index,
                    numbers: ticket.sorted_numbers(),
                    hits: count,
                },
            );
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn draw(contest: &str, numbers: &[u8]) -> OfficialDraw {
        OfficialDraw::new(contest, "", numbers.to_vec())
    }

    fn ticket(line: usize, numbers: &[u8]) -> UserTicket {
        UserTicket::from_line(line, numbers.to_vec())
    }

    const ONE_TO_FIFTEEN: [u8; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    #[test]
    fn test_mask_membership() {
        let mask = NumberMask::from_numbers(&[1, 25, 25, 0, 26]);
        assert!(mask.contains(1));
        assert!(mask.contains(25));
        assert!(!mask.contains(2));
        assert!(!mask.contains(26));
        assert_eq!(mask.len(), 2);
    }

    #[test]
    fn test_fourteen_hits_only_in_fourteen_bucket() {
        let draws = [draw("1", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 16])];
        let tickets = [ticket(0, &ONE_TO_FIFTEEN)];
        let results = check_results(&draws, &tickets, None);

        assert_eq!(results.len(), 1);
        let hits = &results[0].hits;
        assert_eq!(hits.count(Tier::Fourteen), 1);
        assert_eq!(hits.total(), 1);
        assert_eq!(hits.get(Tier::Fourteen)[0].hits, 14);
        assert_eq!(hits.get(Tier::Fourteen)[0].ticket_index, 0);
    }

    #[test]
    fn test_below_eleven_is_omitted() {
        let draws = [draw("1", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 16, 17, 18, 19, 20])];
        let tickets = [ticket(0, &ONE_TO_FIFTEEN)];
        let results = check_results(&draws, &tickets, None);
        assert!(!results[0].has_winners());
    }

    #[test]
    fn test_match_numbers_are_sorted() {
        let draws = [draw("1", &ONE_TO_FIFTEEN)];
        let tickets = [ticket(3, &[15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1])];
        let results = check_results(&draws, &tickets, None);
        let found = &results[0].hits.get(Tier::Fifteen)[0];
        assert_eq!(found.numbers, ONE_TO_FIFTEEN.to_vec());
    }

    #[test]
    fn test_bucket_order_follows_batch() {
        let draws = [draw("1", &ONE_TO_FIFTEEN)];
        let tickets = [
            ticket(0, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 20, 21]),
            ticket(1, &ONE_TO_FIFTEEN),
            ticket(2, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 22, 23]),
        ];
        let results = check_results(&draws, &tickets, None);
        let thirteen: Vec<usize> = results[0]
            .hits
            .get(Tier::Thirteen)
            .iter()
            .map(|m| m.ticket_index)
            .collect();
        assert_eq!(thirteen, vec![0, 2]);
        assert_eq!(results[0].hits.count(Tier::Fifteen), 1);
    }

    #[test]
    fn test_preserves_draw_order() {
        let draws = [draw("b", &ONE_TO_FIFTEEN), draw("a", &ONE_TO_FIFTEEN)];
        let results = check_results(&draws, &[], None);
        assert_eq!(results[0].contest_id, "b");
        assert_eq!(results[1].contest_id, "a");
    }

    #[test]
    fn test_prize_totals() {
        let prizes = PrizeTable::new().with("1", Tier::Fifteen, Decimal::from(1000));
        let draws = [draw("1", &ONE_TO_FIFTEEN), draw("2", &ONE_TO_FIFTEEN)];
        let tickets = [ticket(0, &ONE_TO_FIFTEEN), ticket(1, &ONE_TO_FIFTEEN)];
        let results = check_results(&draws, &tickets, Some(&prizes));
        assert_eq!(results[0].total_prize, Decimal::from(2000));
        assert_eq!(results[1].total_prize, Decimal::ZERO);
    }

    #[test]
    fn test_validated_huge_payout_does_not_overflow() {
        let prizes = PrizeTable::new().with("1", Tier::Fifteen, Decimal::MAX);
        assert!(prizes.validate().is_ok());
        let draws = [draw("1", &ONE_TO_FIFTEEN)];
        let tickets = [ticket(0, &ONE_TO_FIFTEEN), ticket(1, &ONE_TO_FIFTEEN)];
        let results = check_results(&draws, &tickets, Some(&prizes));
        assert_eq!(results[0].hits.count(Tier::Fifteen), 2);
        assert_eq!(results[0].total_prize, Decimal::MAX);
    }

    #[test]
    fn test_duplicate_ticket_numbers_count_once() {
        let draws = [draw("1", &ONE_TO_FIFTEEN)];
        // Eleven distinct shared numbers, one of them repeated.
        let tickets = [ticket(0, &[1, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 20, 21, 22])];
        let results = check_results(&draws, &tickets, None);
        assert_eq!(results[0].hits.count(Tier::Eleven), 1);
    }

    fn arb_game() -> impl Strategy<Value = Vec<u8>> {
        prop::sample::subsequence((1u8..=25).collect::<Vec<_>>(), 15).prop_shuffle()
    }

    proptest! {
        #[test]
        fn intersection_matches_naive_count(a in arb_game(), b in arb_game()) {
            let naive = a.iter().filter(|n| b.contains(n)).count() as u8;
            prop_assert_eq!(intersection_size(&a, &b), naive);
        }

        #[test]
        fn checking_is_idempotent(
            draws in prop::collection::vec(arb_game(), 1..4),
            tickets in prop::collection::vec(arb_game(), 0..40),
        ) {
            let draws: Vec<OfficialDraw> = draws
                .into_iter()
                .enumerate()
                .map(|(i, numbers)| OfficialDraw::new(i.to_string(), "", numbers))
                .collect();
            let tickets: Vec<UserTicket> = tickets
                .into_iter()
                .enumerate()
                .map(|(i, numbers)| UserTicket::from_line(i, numbers))
                .collect();
            let first = check_results(&draws, &tickets, None);
            let second = check_results(&draws, &tickets, None);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn every_ticket_lands_in_at_most_one_bucket(
            d in arb_game(),
            tickets in prop::collection::vec(arb_game(), 0..40),
        ) {
            let draws = vec![OfficialDraw::new("1", "", d.clone())];
            let tickets: Vec<UserTicket> = tickets
                .into_iter()
                .enumerate()
                .map(|(i, numbers)| UserTicket::from_line(i, numbers))
                .collect();
            let results = check_results(&draws, &tickets, None);
            for (index, t) in tickets.iter().enumerate() {
                let expected = intersection_size(&t.numbers, &d);
                let appearances: Vec<u8> = results[0]
                    .hits
                    .iter()
                    .flat_map(|(_, matches)| matches.iter())
                    .filter(|m| m.ticket_index == index)
                    .map(|m| m.hits)
                    .collect();
                if expected >= 11 {
                    prop_assert_eq!(appearances, vec![expected]);
                } else {
                    prop_assert!(appearances.is_empty());
                }
            }
        }
    }
}
