//! Subcommand implementations.

mod check;
mod run;
mod skills;

pub use check::Check;
pub use run::Run;
pub use skills::Skills;

use std::path::PathBuf;

use battle_content::ContentFactory;
use clap::Args;

/// Where content is loaded from.
#[derive(Args)]
pub struct ContentArgs {
    /// Content directory (defaults to the data bundled with battle-content)
    #[arg(short, long, value_name = "DIR", env = "BATTLE_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl ContentArgs {
    pub fn factory(&self) -> ContentFactory {
        match &self.data_dir {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::bundled(),
        }
    }
}
