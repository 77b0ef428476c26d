//! Headless battle runner.
//!
//! Run with: `battle-sim <command>`

mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Run, Skills};

/// Headless auto-battler simulator
#[derive(Parser)]
#[command(name = "battle-sim")]
#[command(about = "Run and inspect deterministic battles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Simulate a battle from a roster
    Run(Run),

    /// List the skill catalog
    Skills(Skills),

    /// Load and validate every content file
    Check(Check),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for BATTLE_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so JSON output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Skills(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
    }
}
