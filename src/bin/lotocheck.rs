//! lotocheck Command Line Interface
//!
//! Check ticket batches against official draws, rank the draws by their best
//! wins and export winning tickets for spreadsheets.
//!
//! # Usage
//!
//! ```bash
//! # Ranked summary of winners
//! lotocheck check --draws resultados.txt --tickets jogos.txt
//!
//! # Winning tickets as tab-separated rows
//! lotocheck export --draws resultados.txt --tickets jogos.txt --output premiados.tsv
//!
//! # Inspect what the parsers recognise
//! cat resultados.txt | lotocheck parse-draws
//! lotocheck parse-tickets --file jogos.txt -o json
//!
//! # Re-check whenever either file changes
//! lotocheck watch --draws resultados.txt --tickets jogos.txt
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use lotocheck::{
    resolve_draws, CheckReport, CheckSession, CheckerConfig, Debouncer, DrawOrigin, DrawSource,
};
use lotocheck_agentic::{
    create_llm_client_for, summarize_tickets, DrawFallbackParser, LlmDrawParser,
};
use lotocheck_core::{parse_tickets_capped, ticket_balance, write_tsv, OfficialDraw, Tier};

#[derive(Parser)]
#[command(name = "lotocheck")]
#[command(version = "0.1.0")]
#[command(about = "Check Lotofácil tickets against official draws and export the winners")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Check tickets against draws and show draws ranked by their best wins
    Check {
        /// Official draws, one per line
        #[arg(short, long)]
        draws: PathBuf,

        /// Tickets, one per line
        #[arg(short, long)]
        tickets: PathBuf,

        /// Prize table (.yaml/.yml/.json); overrides LOTOCHECK_PRIZES
        #[arg(short, long)]
        prizes: Option<PathBuf>,

        /// Let the LLM parser take over when the draw text is not recognised
        #[arg(long)]
        ai_fallback: bool,
    },

    /// Export winning tickets as tab-separated rows
    Export {
        #[arg(short, long)]
        draws: PathBuf,

        #[arg(short, long)]
        tickets: PathBuf,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        ai_fallback: bool,
    },

    /// Show the draws recognised in a text
    ParseDraws {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long)]
        ai_fallback: bool,
    },

    /// Show the tickets recognised in a text
    ParseTickets {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Balance statistics for a ticket batch
    Stats {
        #[arg(short, long)]
        tickets: PathBuf,

        /// Add a short LLM-written summary
        #[arg(long)]
        ai: bool,
    },

    /// Poll both files and re-check after each edit settles
    Watch {
        #[arg(short, long)]
        draws: PathBuf,

        #[arg(short, long)]
        tickets: PathBuf,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        #[arg(long)]
        ai_fallback: bool,
    },
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match CheckerConfig::from_env() {
        Ok(config) => run(cli.command, config, cli.format, cli.quiet).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    mut config: CheckerConfig,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        Commands::Check {
            draws,
            tickets,
            prizes,
            ai_fallback,
        } => {
            config.ai_fallback |= ai_fallback;
            if prizes.is_some() {
                config.prizes_path = prizes;
            }
            cmd_check(&config, &draws, &tickets, format, quiet).await
        }
        Commands::Export {
            draws,
            tickets,
            output,
            ai_fallback,
        } => {
            config.ai_fallback |= ai_fallback;
            cmd_export(&config, &draws, &tickets, output, quiet).await
        }
        Commands::ParseDraws { file, ai_fallback } => {
            config.ai_fallback |= ai_fallback;
            cmd_parse_draws(&config, file, format).await
        }
        Commands::ParseTickets { file } => cmd_parse_tickets(&config, file, format),
        Commands::Stats { tickets, ai } => cmd_stats(&config, &tickets, ai, format).await,
        Commands::Watch {
            draws,
            tickets,
            interval_ms,
            ai_fallback,
        } => {
            config.ai_fallback |= ai_fallback;
            cmd_watch(&config, &draws, &tickets, interval_ms, format, quiet).await
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_check(
    config: &CheckerConfig,
    draws: &Path,
    tickets: &Path,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut session = load_session(config, draws, tickets).await?;
    session.run_check();
    print_report(&CheckReport::from_session(&session), format, quiet)
}

async fn cmd_export(
    config: &CheckerConfig,
    draws: &Path,
    tickets: &Path,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let mut session = load_session(config, draws, tickets).await?;
    let results = session.run_check();

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = io::BufWriter::new(file);
            write_tsv(results, &mut writer)?;
            writer.flush()?;
            if !quiet {
                let rows: usize = results.iter().map(|r| r.hits.total()).sum();
                eprintln!("{} wrote {} row(s) to {}", "OK".green(), rows, path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_tsv(results, &mut lock)?;
        }
    }
    Ok(())
}

async fn cmd_parse_draws(
    config: &CheckerConfig,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let text = read_input(file)?;
    let fallback = make_fallback(config);
    let source = resolve_draws(&text, fallback.as_deref(), &config.fallback_policy()).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&source)?),
        OutputFormat::Text | OutputFormat::Pretty => {
            let label = format!("{} draw(s) recognised", source.draws.len());
            if format == OutputFormat::Pretty {
                println!("{} {} ({:?})", "OK".green(), label, source.origin);
            } else {
                println!("{}", label);
            }
            for draw in &source.draws {
                println!("  {}", draw_line(draw));
            }
            if let Some(error) = &source.fallback_error {
                eprintln!("{} fallback parser failed: {}", "WARN".yellow(), error);
            }
        }
    }
    Ok(())
}

fn cmd_parse_tickets(
    config: &CheckerConfig,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let text = read_input(file)?;
    let tickets = parse_tickets_capped(&text, config.max_tickets);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tickets)?),
        OutputFormat::Text | OutputFormat::Pretty => {
            println!("{} ticket(s) recognised", tickets.len());
            for ticket in &tickets {
                println!("  {:<12} {}", ticket.id, join_numbers(&ticket.numbers));
            }
        }
    }
    Ok(())
}

async fn cmd_stats(
    config: &CheckerConfig,
    tickets: &Path,
    ai: bool,
    format: OutputFormat,
) -> Result<()> {
    let text = read_file(tickets)?;
    let mut session = CheckSession::new(config);
    session.set_tickets_text(&text);
    let batch = session.batch_balance();

    let summary = if ai {
        let client = create_llm_client_for(config.llm_backend)?;
        Some(summarize_tickets(client.as_ref(), session.tickets()).await?)
    } else {
        None
    };

    match format {
        OutputFormat::Json => {
            let per_ticket: Vec<_> = session
                .tickets()
                .iter()
                .map(|t| serde_json::json!({ "id": t.id, "balance": ticket_balance(&t.numbers) }))
                .collect();
            let output = serde_json::json!({
                "batch": batch,
                "tickets": per_ticket,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text | OutputFormat::Pretty => {
            println!("Tickets:        {}", batch.tickets);
            println!("Avg even:       {:.2}", batch.avg_even);
            if batch.tickets > 0 {
                println!("Avg odd:        {:.2}", 15.0 - batch.avg_even);
            }
            println!("Avg sum:        {:.2}", batch.avg_sum);
            println!("Avg primes:     {:.2}", batch.avg_primes);
            if let Some(summary) = summary {
                println!();
                println!("{}", summary);
            }
        }
    }
    Ok(())
}

async fn cmd_watch(
    config: &CheckerConfig,
    draws_path: &Path,
    tickets_path: &Path,
    interval_ms: u64,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let prizes = config.load_prizes()?;
    let fallback = make_fallback(config);
    let policy = config.fallback_policy();
    let mut session = CheckSession::new(config).with_prizes(prizes);

    let max_tickets = config.max_tickets;
    let mut ticket_parser = Debouncer::spawn(config.ticket_debounce, move |text: String| {
        async move { parse_tickets_capped(&text, max_tickets) }
    });

    let job_fallback = fallback.clone();
    let mut draw_fallback = Debouncer::spawn(config.draw_debounce, move |text: String| {
        let parser = job_fallback.clone();
        async move {
            let local = DrawSource::local(&text);
            let source = match parser {
                Some(parser) => local.apply_fallback(&text, parser.as_ref()).await,
                None => local,
            };
            (text, source)
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(50)));
    let mut tickets_text: Option<String> = None;
    let mut draws_text: Option<String> = None;

    if !quiet && format != OutputFormat::Json {
        eprintln!(
            "{} watching {} and {} (Ctrl-C to stop)",
            "..".cyan(),
            draws_path.display(),
            tickets_path.display()
        );
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let tickets = read_file_or_empty(tickets_path).await;
                if tickets_text.as_deref() != Some(tickets.as_str()) {
                    ticket_parser.push(tickets.clone());
                    tickets_text = Some(tickets);
                }

                let draws = read_file_or_empty(draws_path).await;
                if draws_text.as_deref() != Some(draws.as_str()) {
                    // Local parse is immediate; only the fallback waits for the text to settle
                    let local = DrawSource::local(&draws);
                    if fallback.is_some() && policy.needs_fallback(&draws, &local.draws) {
                        draw_fallback.push(draws.clone());
                    }
                    session.replace_draws(&local);
                    draws_text = Some(draws);
                    recheck(&mut session, format, quiet)?;
                }
            }
            alive = ticket_parser.changed() => {
                if !alive {
                    break;
                }
                if let Some(tickets) = ticket_parser.latest() {
                    session.replace_tickets(tickets);
                    recheck(&mut session, format, quiet)?;
                }
            }
            alive = draw_fallback.changed() => {
                if !alive {
                    break;
                }
                if let Some((text, source)) = draw_fallback.latest() {
                    // Ignore answers for text that has since been edited
                    if draws_text.as_deref() == Some(text.as_str())
                        && source.origin == DrawOrigin::Fallback
                    {
                        session.replace_draws(&source);
                        recheck(&mut session, format, quiet)?;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

fn recheck(session: &mut CheckSession, format: OutputFormat, quiet: bool) -> Result<()> {
    session.run_check();
    print_report(&CheckReport::from_session(session), format, quiet)
}

// =============================================================================
// HELPERS
// =============================================================================

async fn load_session(config: &CheckerConfig, draws: &Path, tickets: &Path) -> Result<CheckSession> {
    let mut session = CheckSession::new(config).with_prizes(config.load_prizes()?);
    if let Some(fallback) = make_fallback(config) {
        session = session.with_fallback(fallback);
    }

    session.set_tickets_text(&read_file(tickets)?);
    let source = session.set_draws_text(&read_file(draws)?).await;
    if let Some(error) = source.fallback_error {
        tracing::warn!("continuing with locally parsed draws: {}", error);
    }
    Ok(session)
}

/// The LLM draw parser, when enabled and a client can be built
fn make_fallback(config: &CheckerConfig) -> Option<Arc<dyn DrawFallbackParser>> {
    if !config.ai_fallback {
        return None;
    }
    match create_llm_client_for(config.llm_backend) {
        Ok(client) => {
            let parser: Arc<dyn DrawFallbackParser> = Arc::new(LlmDrawParser::new(client));
            Some(parser)
        }
        Err(e) => {
            tracing::warn!("AI fallback disabled: {:#}", e);
            None
        }
    }
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => read_file(&path),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn read_file_or_empty(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read watched file");
            String::new()
        }
    }
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_line(draw: &OfficialDraw) -> String {
    if draw.date.is_empty() {
        format!("{} {}", draw.contest_id, join_numbers(&draw.numbers))
    } else {
        format!(
            "{} ({}) {}",
            draw.contest_id,
            draw.date,
            join_numbers(&draw.numbers)
        )
    }
}

fn print_report(report: &CheckReport<'_>, format: OutputFormat, quiet: bool) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    let pretty = format == OutputFormat::Pretty;

    if !quiet {
        println!(
            "{} draw(s), {} ticket(s), draws parsed {}",
            report.draws,
            report.tickets,
            match report.draw_origin {
                DrawOrigin::Local => "locally",
                DrawOrigin::Fallback => "by the AI fallback",
            }
        );
    }

    let header = Tier::DESCENDING
        .iter()
        .map(|tier| format!("{:>6}", tier.hits()))
        .collect::<String>();
    println!("{:<10}{}{:>16}", "Concurso", header, "Prêmio");

    for ranked in &report.ranked {
        let result = ranked.result;
        if quiet && !result.has_winners() {
            continue;
        }
        let counts = Tier::DESCENDING
            .iter()
            .map(|tier| format!("{:>6}", result.hits.count(*tier)))
            .collect::<String>();
        let line = format!(
            "{:<10}{}{:>16}",
            result.contest_id,
            counts,
            result.total_prize.round_dp(2).to_string()
        );
        match (pretty, result.best_tier()) {
            (true, Some(Tier::Fifteen)) | (true, Some(Tier::Fourteen)) => {
                println!("{}", line.green().bold())
            }
            (true, Some(_)) => println!("{}", line.green()),
            _ => println!("{}", line),
        }
    }

    let totals = Tier::DESCENDING
        .iter()
        .map(|tier| format!("{:>6}", report.totals.get(*tier)))
        .collect::<String>();
    let footer = format!(
        "{:<10}{}{:>16}",
        "Total",
        totals,
        report.total_prize.round_dp(2).to_string()
    );
    if pretty {
        println!("{}", footer.bold());
    } else {
        println!("{}", footer);
    }
    Ok(())
}
