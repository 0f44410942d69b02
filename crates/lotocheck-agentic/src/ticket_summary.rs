//! LLM-written balance summary for a ticket batch

use anyhow::{bail, Result};

use lotocheck_core::types::UserTicket;

use crate::llm_client::LlmClient;

/// Tickets included in the prompt
pub const SUMMARY_SAMPLE: usize = 50;

const SYSTEM_PROMPT: &str = "You review Lotofácil ticket sets for a player. Be brief and factual.";

/// One ticket per line, numbers comma-joined, first `SUMMARY_SAMPLE` tickets only
pub fn summary_prompt(tickets: &[UserTicket]) -> String {
    let games = tickets
        .iter()
        .take(SUMMARY_SAMPLE)
        .map(|ticket| {
            ticket
                .numbers
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze these Lotofácil games and provide a brief professional summary about balance \
         (odds/evens, sums, quadrants). Say whether the set is well-distributed. \
         Limit to 100 words.\nGames:\n{}",
        games
    )
}

/// Ask the model for a short balance summary of `tickets`
pub async fn summarize_tickets(client: &dyn LlmClient, tickets: &[UserTicket]) -> Result<String> {
    if tickets.is_empty() {
        bail!("no tickets to analyze");
    }
    tracing::info!(
        provider = client.provider_name(),
        tickets = tickets.len().min(SUMMARY_SAMPLE),
        "requesting ticket summary"
    );
    let summary = client.chat(SYSTEM_PROMPT, &summary_prompt(tickets)).await?;
    Ok(summary.trim().to_string())
}
