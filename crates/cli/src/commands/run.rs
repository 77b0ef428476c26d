//! Simulate one battle and print what happened.

use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::{ConfigLoader, RosterLoader};
use battle_core::{
    BattleEngine, BattleEnv, BattleReport, BattleState, Difficulty, PcgRng, compute_events_root,
};
use clap::Parser;
use console::style;

use super::ContentArgs;
use crate::render::{Names, describe};

/// Simulate a battle from a roster
#[derive(Parser)]
pub struct Run {
    /// Roster file, or the name of a roster under `<data-dir>/rosters/`
    #[arg(value_name = "ROSTER")]
    roster: String,

    /// Battle seed; the same seed always replays the same battle
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Config file overriding `<data-dir>/config.toml`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the enemy AI difficulty
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Override the action ceiling
    #[arg(long)]
    turn_cap: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(flatten)]
    content: ContentArgs,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One line per event, then the outcome
    Text,
    /// Outcome and event root only
    Summary,
    /// Full report as JSON
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let factory = self.content.factory();

        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => factory.load_config()?,
        };
        if let Some(difficulty) = self.difficulty {
            config.difficulty = Some(difficulty.into());
        }
        if let Some(turn_cap) = self.turn_cap {
            config.turn_cap = turn_cap;
        }

        let skills = factory.load_skills()?;
        let units = factory.load_units(&skills)?;

        let roster_path = PathBuf::from(&self.roster);
        let roster = if roster_path.is_file() {
            RosterLoader::load(&roster_path)?
        } else {
            factory.load_roster(&self.roster)?
        };
        let (allies, enemies) = roster.resolve(&units, &config)?;

        let mut state = BattleState::new(self.seed, &allies, &enemies, &config, &skills)
            .context("Failed to set up battle")?;
        let names = Names::from_state(&state);

        tracing::info!(
            seed = self.seed,
            allies = allies.len(),
            enemies = enemies.len(),
            "starting battle"
        );
        let rng = PcgRng;
        let report = BattleEngine::new(&mut state, BattleEnv::new(&config, &skills, &rng)).run();

        match self.format {
            OutputFormat::Text => {
                for event in &report.events {
                    println!("{}", describe(event, &names));
                }
                println!();
                print_summary(&report, &state);
            }
            OutputFormat::Summary => print_summary(&report, &state),
            OutputFormat::Json => print_json(&report)?,
        }
        Ok(())
    }
}

fn print_summary(report: &BattleReport, state: &BattleState) {
    let outcome = &report.outcome;
    let verdict = match outcome.winner {
        Some(side) => style(format!("{side} wins")).bold().green(),
        None => style("draw".to_string()).bold().yellow(),
    };
    println!("{} {}", style("Outcome:").bold().cyan(), verdict);
    println!("{} {}", style("Reason:").bold().cyan(), outcome.reason);
    println!("{} {}", style("Actions:").bold().cyan(), outcome.turns);
    println!("{} {}", style("Events:").bold().cyan(), report.events.len());
    println!("{} {}", style("Currency:").bold().cyan(), state.ally_currency);
    println!(
        "{} {}",
        style("Events root:").bold().cyan(),
        hex::encode(compute_events_root(&report.events))
    );

    println!();
    println!("{}", style("Survivors:").bold().yellow());
    for unit in state.units.iter().filter(|u| u.is_alive()) {
        println!(
            "  {} [{}] HP {}/{} at {}",
            unit.name, unit.side, unit.hp, unit.max_hp, unit.pos
        );
    }
}

fn print_json(report: &BattleReport) -> Result<()> {
    let output = serde_json::json!({
        "outcome": report.outcome,
        "events_root": hex::encode(compute_events_root(&report.events)),
        "events": report.events,
    });
    let json =
        serde_json::to_string_pretty(&output).context("Failed to serialize report to JSON")?;
    println!("{}", json);
    Ok(())
}
