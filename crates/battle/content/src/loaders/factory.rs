//! Content factory for building battle inputs from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, SkillCatalog};

use crate::loaders::{
    ConfigLoader, LoadResult, Roster, RosterLoader, SkillLoader, UnitCatalog, UnitLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// ├── units.ron
/// └── rosters/
///     └── demo.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load unit templates from `units.ron`, checking their skills against `skills`.
    pub fn load_units(&self, skills: &SkillCatalog) -> LoadResult<UnitCatalog> {
        let units = UnitLoader::load(&self.data_dir.join("units.ron"))?;
        units.check_skills(skills)?;
        Ok(units)
    }

    /// Load a roster from `rosters/{name}.ron`.
    pub fn load_roster(&self, name: &str) -> LoadResult<Roster> {
        let path = self.data_dir.join("rosters").join(format!("{}.ron", name));
        RosterLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
