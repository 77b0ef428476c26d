//! List the skill catalog.

use anyhow::Result;
use clap::Parser;
use console::style;

use super::ContentArgs;

/// List the skill catalog
#[derive(Parser)]
pub struct Skills {
    /// Only show skills whose effect tag contains this text
    #[arg(short, long)]
    effect: Option<String>,

    #[command(flatten)]
    content: ContentArgs,
}

impl Skills {
    pub fn execute(self) -> Result<()> {
        let catalog = self.content.factory().load_skills()?;
        let filter = self.effect.as_deref().map(str::to_ascii_lowercase);

        println!("{}", style("=== Skill Catalog ===").bold().green());
        let mut shown = 0;
        for def in catalog.iter() {
            if let Some(filter) = &filter
                && !def.effect.as_ref().contains(filter.as_str())
            {
                continue;
            }
            shown += 1;
            println!(
                "  {:<24} {:<32} {:<14} {}",
                style(&def.id).bold(),
                def.effect,
                def.pattern,
                def.name
            );
        }
        println!();
        println!("{} {}/{}", style("Shown:").bold().cyan(), shown, catalog.len());
        Ok(())
    }
}
