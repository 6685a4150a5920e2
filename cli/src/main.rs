//! stakecalc - project staking rewards from a chain-state snapshot

mod report;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use stake_economics::{AccountId, CalculationPeriod};
use stake_service::{RewardModel, ServiceConfig};
use std::path::PathBuf;

use crate::report::Report;
use crate::state::ChainState;

#[derive(Parser)]
#[command(name = "stakecalc")]
#[command(about = "Staking reward calculator", version)]
struct Cli {
    /// Service configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chain state snapshot (JSON)
    #[arg(short, long, value_name = "FILE")]
    state: PathBuf,

    /// Reward model, overrides the one recorded in the state file
    #[arg(short, long)]
    model: Option<RewardModel>,

    /// Amount to stake, in whole tokens
    #[arg(short, long, default_value = "100")]
    amount: Decimal,

    /// day, week, month, year or a number of days
    #[arg(short, long, default_value = "year")]
    period: CalculationPeriod,

    /// Restake rewards every era
    #[arg(long)]
    compound: bool,

    /// Validator or collator account (hex)
    #[arg(long, value_name = "ACCOUNT")]
    validator: Option<String>,

    /// Language of the earning titles
    #[arg(long, default_value = "en")]
    locale: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    config.validate().context("Invalid configuration")?;

    let validator = cli
        .validator
        .as_deref()
        .map(|value| {
            value
                .parse::<AccountId>()
                .with_context(|| format!("Invalid validator account: {}", value))
        })
        .transpose()?;

    let state = ChainState::load(&cli.state)?;
    let model = state.resolve_model(cli.model)?;
    let engine = state.build_engine(model, &config)?;

    println!(
        "\n{} {} ({})",
        "📈".bold(),
        state.asset.label().cyan().bold(),
        model.to_string().bright_black()
    );
    println!("{}", "═══════════════════════════════════".bright_black());

    let report = Report::new(engine.as_ref(), cli.amount, cli.compound, cli.period);
    report.print(&state.asset.symbol, &cli.locale, validator.as_ref())?;

    Ok(())
}
