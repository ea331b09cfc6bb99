//! Bangus Cycle Profit Calculator
//!
//! Run with: cargo run -- calc --set fcr=1.6 --set survival_rate=0.8
//!
//! Computes the costs, revenue and net profit of one 4-month grow-out
//! cycle and prints a link that reproduces the calculation.

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use console::style;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bangus::config::Config;
use bangus::model::{CycleInputs, Param, ParamAssignment};
use bangus::report::CycleReport;
use bangus::session::CalculatorSession;
use bangus::{advisor, share};

#[derive(Parser)]
#[command(name = "bangus", version, about = "Bangus farming 4-month cycle profit calculator")]
struct Cli {
    /// Load settings from a TOML file instead of BANGUS_* environment variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a cycle and print the report (default)
    Calc {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Print parameters and results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the share link for a set of parameters
    Share {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Decode a share link and print its parameters as JSON
    Decode {
        /// Full URL, `data=...` query or bare payload
        link: String,

        /// Fail unless the link carries every required parameter; optional
        /// ones take their documented defaults instead of the configured ones
        #[arg(long)]
        complete: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write it to a TOML file instead
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct ScenarioArgs {
    /// Start from the parameters in a share link
    #[arg(long)]
    link: Option<String>,

    /// Override a parameter, e.g. --set feed_price=42 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<ParamAssignment>,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🐟 BANGUS FARMING PROFIT CALCULATOR").cyan().bold()
    );
    println!(
        "{}",
        style("    Costs, revenue and net profit for a 4-month cycle").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::from_file(p)?,
        None => Config::from_env()?,
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e);
    }

    Ok(config)
}

/// Build a session from config defaults, an optional link and overrides
fn build_session(config: &Config, scenario: &ScenarioArgs) -> Result<CalculatorSession> {
    let mut session = CalculatorSession::new(config.defaults);

    if let Some(link) = &scenario.link {
        if session.load_share_link(link) {
            info!("Loaded parameters from share link");
        }
    }

    let overrides = CycleInputs::from_assignments(&scenario.overrides);
    if !overrides.is_empty() {
        debug!("Applying {} overrides", overrides.present().len());
        session.apply(&overrides);
    }

    let warnings = session.params().validate();
    for w in &warnings {
        warn!("Parameter out of range: {}", w);
    }
    if config.strict_validation && !warnings.is_empty() {
        return Err(eyre!(
            "{} parameter(s) out of range and strict validation is enabled",
            warnings.len()
        ));
    }

    Ok(session)
}

fn run_calc(config: &Config, scenario: &ScenarioArgs, json: bool) -> Result<()> {
    let session = build_session(config, scenario)?;
    let share_url = session.share_url(&config.share_base_url)?;
    let tips = advisor::advise(session.params(), session.result(), &config.advisories);

    let report = CycleReport {
        params: session.params(),
        analysis: session.analysis(),
        advisories: &tips,
        currency: &config.currency,
        share_url: Some(share_url.as_str()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print_banner();
        report.print();
    }

    Ok(())
}

fn run_share(config: &Config, scenario: &ScenarioArgs) -> Result<()> {
    let session = build_session(config, scenario)?;
    println!("{}", session.share_url(&config.share_base_url)?);
    Ok(())
}

fn run_decode(config: &Config, link: &str, complete: bool) -> Result<()> {
    let inputs = share::parse_link(link).wrap_err("Could not decode share link")?;

    if complete {
        let params = inputs.into_parameters()?;
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let missing: Vec<String> = Param::ALL
        .into_iter()
        .filter(|p| inputs.get(*p).is_none())
        .map(|p| p.to_string())
        .collect();
    if !missing.is_empty() {
        info!("Filled from defaults: {}", missing.join(", "));
    }

    let params = inputs.resolve(&config.defaults);
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn run_config(config: &Config, write: Option<&PathBuf>) -> Result<()> {
    match write {
        Some(path) => {
            config.save_to_file(path)?;
            println!(
                "{} Configuration written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => config.print_summary(),
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bangus=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        None => run_calc(&config, &ScenarioArgs::default(), false),
        Some(Command::Calc { scenario, json }) => run_calc(&config, &scenario, json),
        Some(Command::Share { scenario }) => run_share(&config, &scenario),
        Some(Command::Decode { link, complete }) => run_decode(&config, &link, complete),
        Some(Command::Config { write }) => run_config(&config, write.as_ref()),
    }
}
