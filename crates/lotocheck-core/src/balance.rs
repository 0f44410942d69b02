//! Ticket balance statistics
//!
//! Quick numeric profile of a ticket or a whole batch: how many even and odd
//! numbers, the sum, and which primes were picked.

use serde::Serialize;

use crate::types::{LotteryNumber, UserTicket};

const PRIMES: [LotteryNumber; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TicketBalance {
    pub even_count: usize,
    pub odd_count: usize,
    pub sum: u32,
    /// Primes on the ticket, ascending
    pub primes: Vec<LotteryNumber>,
}

pub fn ticket_balance(numbers: &[LotteryNumber]) -> TicketBalance {
    let even_count = numbers.iter().filter(|n| *n % 2 == 0).count();
    let mut primes: Vec<LotteryNumber> = numbers
        .iter()
        .copied()
        .filter(|n| PRIMES.contains(n))
        .collect();
    primes.sort_unstable();

    TicketBalance {
        even_count,
        odd_count: numbers.len() - even_count,
        sum: numbers.iter().map(|n| *n as u32).sum(),
        primes,
    }
}

/// Averages over a ticket batch
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchBalance {
    pub tickets: usize,
    pub avg_even: f64,
    pub avg_sum: f64,
    pub avg_primes: f64,
}

pub fn batch_balance(tickets: &[UserTicket]) -> BatchBalance {
    if tickets.is_empty() {
        return BatchBalance::default();
    }

    let (even, sum, primes) = tickets
        .iter()
        .map(|ticket| ticket_balance(&ticket.numbers))
        .fold((0usize, 0u64, 0usize), |(even, sum, primes), b| {
            (even + b.even_count, sum + b.sum as u64, primes + b.primes.len())
        });

    let count = tickets.len() as f64;
    BatchBalance {
        tickets: tickets.len(),
        avg_even: even as f64 / count,
        avg_sum: sum as f64 / count,
        avg_primes: primes as f64 / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_balance() {
        let numbers: Vec<u8> = (1..=15).collect();
        let balance = ticket_balance(&numbers);
        assert_eq!(balance.even_count, 7);
        assert_eq!(balance.odd_count, 8);
        assert_eq!(balance.sum, 120);
        assert_eq!(balance.primes, vec![2, 3, 5, 7, 11, 13]);
    }

    #[test]
    fn test_batch_balance() {
        let tickets = vec![
            UserTicket::from_line(0, (1..=15).collect()),
            UserTicket::from_line(1, (11..=25).collect()),
        ];
        let batch = batch_balance(&tickets);
        assert_eq!(batch.tickets, 2);
        // 120 and 270
        assert_eq!(batch.avg_sum, 195.0);
        // 7 and 7 evens
        assert_eq!(batch.avg_even, 7.0);
        // 6 and 5 primes
        assert_eq!(batch.avg_primes, 5.5);
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(batch_balance(&[]), BatchBalance::default());
    }
}
