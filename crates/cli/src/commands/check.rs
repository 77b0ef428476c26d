//! Validate content without running a battle.

use anyhow::Result;
use battle_core::BattleState;
use clap::Parser;
use console::style;

use super::ContentArgs;

/// Load and validate every content file
#[derive(Parser)]
pub struct Check {
    /// Rosters to set up (by name under `<data-dir>/rosters/`)
    #[arg(value_name = "ROSTER")]
    rosters: Vec<String>,

    #[command(flatten)]
    content: ContentArgs,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let factory = self.content.factory();
        let config = factory.load_config()?;
        let skills = factory.load_skills()?;
        let units = factory.load_units(&skills)?;

        println!(
            "{} {}",
            style("Data dir:").bold().cyan(),
            factory.data_dir().display()
        );
        println!("{} {}", style("Skills:").bold().cyan(), skills.len());
        println!("{} {}", style("Units:").bold().cyan(), units.len());

        for name in &self.rosters {
            let (allies, enemies) = factory.load_roster(name)?.resolve(&units, &config)?;
            // Setup runs placement and skill checks without resolving any action.
            BattleState::new(0, &allies, &enemies, &config, &skills)
                .map_err(|e| anyhow::anyhow!("Roster '{}': {}", name, e))?;
            println!(
                "{} {} ({} vs {})",
                style("Roster ok:").bold().green(),
                name,
                allies.len(),
                enemies.len()
            );
        }
        Ok(())
    }
}
