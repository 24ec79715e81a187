//! gatescript command line
//!
//! Expands and evaluates deployment action conditions.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Cli;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();
    match commands::execute(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(commands::EXIT_ERROR)
        }
    }
}

/// Initialize tracing subscriber on stderr
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gatescript=info,gatescript_sdk=info,gatescript_runtime=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
