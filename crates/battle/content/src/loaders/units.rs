//! Unit template loader.
//!
//! Templates hold everything about a unit that does not depend on where it is
//! deployed. A roster entry pairs a template with a position and star level.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{
    BaseStats, BattleConfig, GridPos, PersistedStatuses, Role, SkillCatalog, Tribe, UnitMods,
    UnitSpec,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Reusable unit definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    pub tribe: Tribe,
    pub stats: BaseStats,
    pub skill: String,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub mods: UnitMods,
}

fn default_speed() -> u32 {
    BattleConfig::DEFAULT_SPEED
}

impl UnitTemplate {
    /// Builds a deployable spec at `position`.
    pub fn to_spec(&self, position: GridPos, star: u8, statuses: PersistedStatuses) -> UnitSpec {
        let name = if self.name.is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        };
        UnitSpec {
            template: self.id.clone(),
            name,
            role: self.role,
            tribe: self.tribe,
            stats: self.stats,
            star,
            skill: self.skill.clone(),
            position,
            speed: self.speed,
            mods: self.mods,
            statuses,
        }
    }
}

/// Unit file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitFile {
    pub units: Vec<UnitTemplate>,
}

/// Templates keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitCatalog {
    templates: BTreeMap<String, UnitTemplate>,
}

impl UnitCatalog {
    pub fn get(&self, id: &str) -> Option<&UnitTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitTemplate> {
        self.templates.values()
    }

    /// Checks that every template's skill exists in `skills`.
    pub fn check_skills(&self, skills: &SkillCatalog) -> LoadResult<()> {
        for template in self.templates.values() {
            if skills.get(&template.skill).is_none() {
                anyhow::bail!(
                    "Unit template '{}' references unknown skill '{}'",
                    template.id,
                    template.skill
                );
            }
        }
        Ok(())
    }
}

/// Loader for unit templates from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load unit templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<UnitCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// The templates shipped with this crate.
    pub fn embedded() -> LoadResult<UnitCatalog> {
        Self::parse(include_str!("../../data/units.ron"))
    }

    /// Parse unit templates from a RON string.
    pub fn parse(content: &str) -> LoadResult<UnitCatalog> {
        let file: UnitFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit templates RON: {}", e))?;

        let mut templates = BTreeMap::new();
        for template in file.units {
            if template.stats.rage_max == 0 {
                anyhow::bail!("Unit template '{}' has rage_max 0", template.id);
            }
            let id = template.id.clone();
            if templates.insert(id.clone(), template).is_some() {
                anyhow::bail!("Unit template '{}' is defined more than once", id);
            }
        }
        tracing::debug!(units = templates.len(), "loaded unit templates");
        Ok(UnitCatalog { templates })
    }
}
