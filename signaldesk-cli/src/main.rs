//! SignalDesk CLI: trade plans from prediction signals.
//!
//! Commands:
//! - `plan`: request a signal for a symbol and print the derived trade plan
//! - `search`: autocomplete a company name or symbol prefix
//! - `rates`: show the exchange-rate table used for display
//! - `history`: list (or clear) the recent predictions
//! - `interactive`: search, pick and plan in a prompt loop

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use signaldesk_core::currency::currency_prefix;
use signaldesk_core::domain::{ConfidenceSource, SeriesOrigin};
use signaldesk_core::{PricePoint, TradePlan};
use signaldesk_runner::{
    load_history, save_history, AppConfig, Autocomplete, DataSource, Providers, Session,
    SourceKind,
};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(
    name = "signaldesk",
    about = "SignalDesk CLI: trade plans from BUY/SELL prediction signals"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the seeded offline data source regardless of config.
    #[arg(long, global = true, default_value_t = false, conflicts_with = "live")]
    mock: bool,

    /// Use the HTTP services regardless of config.
    #[arg(long, global = true, default_value_t = false)]
    live: bool,

    /// Master seed for mock signals and synthetic charts.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Display currency (e.g. USD, EUR, INR).
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Debug logging (RUST_LOG still wins when set).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a prediction and print the trade plan.
    Plan {
        /// Stock symbol (e.g. AAPL, TCS.NS).
        symbol: String,

        /// Company name shown with the plan.
        #[arg(long)]
        name: Option<String>,

        /// Print the plan as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Search symbols by name or prefix.
    Search {
        query: String,
    },
    /// Show the exchange-rate table.
    Rates,
    /// List recent predictions.
    History {
        /// Delete the saved history.
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    /// Prompt loop: type to search, pick a number to plan.
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli)?;
    let history_path = history_path(&config);
    debug!(history = %history_path.display(), source = ?config.source.kind, "config resolved");

    match cli.command {
        Commands::Plan { symbol, name, json } => {
            run_plan(&config, &history_path, &symbol, name.as_deref(), json)
        }
        Commands::Search { query } => run_search(&config, &query),
        Commands::Rates => run_rates(&config),
        Commands::History { clear } => run_history(&config, &history_path, clear),
        Commands::Interactive => run_interactive(&config, &history_path),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .init();
}

/// File config (explicit, then user default, then built-in) with flags on top.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => AppConfig::from_file(&path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => AppConfig::default(),
        },
    };

    if cli.mock {
        config.source.kind = SourceKind::Mock;
    }
    if cli.live {
        config.source.kind = SourceKind::Live;
    }
    if let Some(seed) = cli.seed {
        config.source.seed = seed;
    }
    if let Some(code) = &cli.currency {
        config.display.currency = code.trim().to_uppercase();
    }
    config.validate()?;
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("signaldesk").join("signaldesk.toml"))
}

fn history_path(config: &AppConfig) -> PathBuf {
    config.history.path.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("signaldesk")
            .join("history.json")
    })
}

fn providers(config: &AppConfig) -> Result<Providers> {
    Ok(DataSource::from_config(config)?.into_providers())
}

fn open_session(config: &AppConfig, history_path: &Path) -> Result<Session> {
    let session = Session::start(providers(config)?, config.clone());
    Ok(session.with_history(load_history(history_path)))
}

// ──────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────

fn run_plan(
    config: &AppConfig,
    history_path: &Path,
    symbol: &str,
    name: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut session = open_session(config, history_path)?;
    let plan = match session.request_plan(symbol, name) {
        Ok(plan) => plan,
        Err(e) => bail!(e.user_message()),
    };
    save_history(history_path, session.history())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&session, &plan);
    }
    Ok(())
}

fn run_search(config: &AppConfig, query: &str) -> Result<()> {
    let providers = providers(config)?;
    let mut autocomplete = Autocomplete::spawn(providers.search, config.search.clone())?;

    if !config.search.should_search(query) {
        bail!(
            "type at least {} characters to search",
            config.search.min_query_len
        );
    }
    autocomplete.on_input(query);
    if !autocomplete.wait(SEARCH_TIMEOUT) {
        bail!("symbol search timed out");
    }
    print_candidates(&autocomplete, &config.search.exchange_marker);
    Ok(())
}

fn run_rates(config: &AppConfig) -> Result<()> {
    let table = signaldesk_runner::load_rates(&providers(config)?);
    println!("{:<6} {:>14}", "Code", "Per 1 USD");
    println!("{}", "─".repeat(21));
    for code in table.codes() {
        println!("{:<6} {:>14.4}", code, table.rate(code));
    }
    if !table.contains(&config.display.currency) {
        println!();
        println!(
            "Display currency {} has no rate; amounts are shown as USD values.",
            config.display.currency
        );
    }
    Ok(())
}

fn run_history(config: &AppConfig, history_path: &Path, clear: bool) -> Result<()> {
    if clear {
        if history_path.exists() {
            std::fs::remove_file(history_path)
                .with_context(|| format!("removing {}", history_path.display()))?;
        }
        println!("History cleared.");
        return Ok(());
    }

    let log = load_history(history_path);
    if log.is_empty() {
        println!("No predictions yet.");
        return Ok(());
    }
    let session = Session::start(providers(config)?, config.clone()).with_history(log);
    print_history(&session);
    Ok(())
}

fn run_interactive(config: &AppConfig, history_path: &Path) -> Result<()> {
    let mut session = open_session(config, history_path)?;
    let mut autocomplete = Autocomplete::spawn(session.providers().search.clone(), config.search.clone())?;

    println!("SignalDesk ({:?} source). Type a name or symbol to search.", config.source.kind);
    println!("  <number>        plan the numbered suggestion");
    println!("  /plan SYMBOL    plan a symbol directly");
    println!("  /currency CODE  switch display currency");
    println!("  /history        show recent predictions");
    println!("  /quit           exit");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if let Some((command, arg)) = split_command(input) {
            match command {
                "quit" | "q" => break,
                "history" => print_history(&session),
                "currency" if arg.is_empty() => println!("Usage: /currency CODE"),
                "currency" => {
                    session.set_currency(arg);
                    println!("Showing prices in {}.", session.currency());
                }
                "plan" if arg.is_empty() => println!("Usage: /plan SYMBOL"),
                "plan" => {
                    autocomplete.dismiss();
                    plan_and_show(&mut session, history_path, arg, None)?;
                }
                other => println!("Unknown command /{other}."),
            }
            continue;
        }
        if let Ok(n) = input.parse::<usize>() {
            match n.checked_sub(1).and_then(|i| autocomplete.select(i)) {
                Some(selection) => plan_and_show(
                    &mut session,
                    history_path,
                    &selection.symbol,
                    Some(&selection.display_name),
                )?,
                None => println!("No suggestion numbered {n}."),
            }
            continue;
        }

        autocomplete.on_input(input);
        if !config.search.should_search(input) {
            println!(
                "Type at least {} characters to search.",
                config.search.min_query_len
            );
            continue;
        }
        if !autocomplete.wait(SEARCH_TIMEOUT) {
            println!("Search timed out.");
            continue;
        }
        print_candidates(&autocomplete, &config.search.exchange_marker);
    }
    Ok(())
}

/// Split `/word rest` into the command word and its trimmed argument.
fn split_command(input: &str) -> Option<(&str, &str)> {
    let body = input.strip_prefix('/')?;
    let (word, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    Some((word, rest.trim()))
}

fn plan_and_show(
    session: &mut Session,
    history_path: &Path,
    symbol: &str,
    name: Option<&str>,
) -> Result<()> {
    match session.request_plan(symbol, name) {
        Ok(plan) => {
            save_history(history_path, session.history())?;
            print_plan(session, &plan);
        }
        Err(e) => println!("{}", e.user_message()),
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Output
// ──────────────────────────────────────────────

fn print_candidates(autocomplete: &Autocomplete, marker: &str) {
    let candidates = autocomplete.suggestions().candidates();
    if candidates.is_empty() {
        println!("No {marker} matches.");
        return;
    }
    for (i, c) in candidates.iter().enumerate() {
        println!("{:>3}. {:<16} {} ({})", i + 1, c.symbol, c.display_name, c.exchange);
    }
}

fn print_plan(session: &Session, plan: &TradePlan) {
    let money = |v: f64| session.money(v);

    println!();
    match &plan.company_name {
        Some(name) => println!("{} · {}", plan.symbol, name),
        None => println!("{}", plan.symbol),
    }
    println!("{}", "═".repeat(50));
    println!("Signal:           {} ({})", plan.direction, plan.position_label());
    println!(
        "Confidence:       {:.2}%{}",
        plan.confidence_pct,
        match plan.confidence_source {
            ConfidenceSource::Model => "",
            ConfidenceSource::Synthesized => " (estimated)",
        }
    );
    println!("Entry:            {}", money(plan.current_price));
    println!("Target:           {}  (+{:.2}%)", money(plan.target_price), plan.profit_pct);
    println!("Stop-loss:        {}  (-{:.2}%)", money(plan.stop_loss), plan.risk_pct);
    println!("Reward/Risk:      {}", plan.reward_risk_label());
    println!("Holding period:   {}", plan.holding_period);
    if let Some(details) = &plan.details {
        let field = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
        println!(
            "Indicators:       RSI {}  Volatility {}  MA50 {}",
            field(details.rsi),
            field(details.volatility),
            field(details.ma_50)
        );
    }
    println!();
    println!(
        "Chart ({}, {} points): {}",
        match plan.series_origin {
            SeriesOrigin::Upstream => "history",
            SeriesOrigin::Synthetic => "simulated",
        },
        plan.series.len(),
        sparkline(&plan.series)
    );
    println!();
    println!("{}", plan.summary(money));
    println!(
        "Generated {} · prices in {} ({})",
        plan.generated_at.format("%Y-%m-%d %H:%M UTC"),
        session.currency(),
        currency_prefix(session.currency()).trim_end()
    );
}

fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("No predictions yet.");
        return;
    }
    println!(
        "{:<16} {:<6} {:>14} {:>14} {:>8}  When",
        "Symbol", "Side", "Entry", "Target", "R:R"
    );
    println!("{}", "─".repeat(80));
    for plan in session.history().iter() {
        println!(
            "{:<16} {:<6} {:>14} {:>14} {:>8}  {}",
            plan.symbol,
            plan.position_label(),
            session.money(plan.current_price),
            session.money(plan.target_price),
            plan.reward_risk_label(),
            plan.generated_at.format("%Y-%m-%d %H:%M")
        );
    }
}

/// One block character per point, scaled between the series min and max.
fn sparkline(points: &[PricePoint]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.price), hi.max(p.price))
        });
    let span = hi - lo;
    points
        .iter()
        .map(|p| {
            if span <= 0.0 {
                BARS[3]
            } else {
                let level = ((p.price - lo) / span * 7.0).round() as usize;
                BARS[level.min(7)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_word_must_match_exactly() {
        assert_eq!(split_command("/plan TCS.NS"), Some(("plan", "TCS.NS")));
        assert_eq!(split_command("/planet"), Some(("planet", "")));
        assert_eq!(split_command("/currency   inr "), Some(("currency", "inr")));
        assert_eq!(split_command("/q"), Some(("q", "")));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(split_command("reliance"), None);
        assert_eq!(split_command("12"), None);
    }
}
