#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive terminal client for the crime analytics gateway.
//!
//! Presents a menu for the three gateway workflows: the guided crime
//! analysis (cascading state/district/years/crimes selection, then a
//! submitted report), single-shot crime reporting, and natural-language
//! crime queries.
//!
//! Uses `indicatif-log-bridge` to route `log` output through
//! `indicatif::MultiProgress` so that log lines and the in-flight spinner
//! never fight for the terminal.

mod analyze;
mod query;
mod reporting;

use clap::Parser;
use crime_console_gateway::GatewayClient;
use dialoguer::Select;
use indicatif::MultiProgress;

/// Interactive client for the crime analytics gateway.
#[derive(Parser)]
#[command(name = "crime_console_cli")]
#[command(about = "Interactive client for the crime analytics gateway")]
struct Cli {
    /// Base URL of the analytics gateway. Falls back to the
    /// `CRIME_CONSOLE_API_URL` environment variable, then to the local
    /// development default.
    #[arg(long)]
    api_url: Option<String>,
}

/// Top-level workflow selection.
enum Tool {
    Analyze,
    Report,
    Query,
    Exit,
}

impl Tool {
    const ALL: &[Self] = &[Self::Analyze, Self::Report, Self::Query, Self::Exit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "Run a crime analysis",
            Self::Report => "Report a crime",
            Self::Query => "Ask about a crime",
            Self::Exit => "Exit",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();

    let cli = Cli::parse();
    let client = cli
        .api_url
        .map_or_else(GatewayClient::from_env, |url| GatewayClient::new(&url));

    println!("Crime Console");
    println!("Gateway: {}", client.base_url());
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Tool::ALL[idx] {
            Tool::Analyze => analyze::run(&client, &multi).await?,
            Tool::Report => reporting::run(&client).await?,
            Tool::Query => query::run(&client).await?,
            Tool::Exit => break,
        }

        println!();
    }

    Ok(())
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while the spinner redraws.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    // Build the pretty-env-logger logger manually so we can wrap it.
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}
