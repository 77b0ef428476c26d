//! Roster loader.
//!
//! A roster places unit templates on the board for both sides. Status records
//! carried over from earlier battles are migrated to the current format here,
//! so the engine only ever sees current-version data.

use std::path::Path;

use battle_core::{BattleConfig, GridPos, PersistedStatuses, UnitSpec, migrate_legacy_statuses};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, UnitCatalog, read_file};

/// One deployed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Unit template id.
    pub template: String,
    pub position: GridPos,
    #[serde(default = "default_star")]
    pub star: u8,
    /// Statuses persisted from a previous battle, possibly in a legacy format.
    #[serde(default)]
    pub statuses: PersistedStatuses,
}

fn default_star() -> u8 {
    1
}

/// Both sides of a battle, as authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub allies: Vec<RosterEntry>,
    #[serde(default)]
    pub enemies: Vec<RosterEntry>,
}

impl Roster {
    /// Resolves templates into deployable specs for `(allies, enemies)`.
    ///
    /// Placement and star validation is left to battle setup, which reports
    /// it with full unit context.
    pub fn resolve(
        &self,
        units: &UnitCatalog,
        config: &BattleConfig,
    ) -> LoadResult<(Vec<UnitSpec>, Vec<UnitSpec>)> {
        let allies = resolve_side(&self.allies, units, config)?;
        let enemies = resolve_side(&self.enemies, units, config)?;
        Ok((allies, enemies))
    }
}

fn resolve_side(
    entries: &[RosterEntry],
    units: &UnitCatalog,
    config: &BattleConfig,
) -> LoadResult<Vec<UnitSpec>> {
    entries
        .iter()
        .map(|entry| {
            let template = units.get(&entry.template).ok_or_else(|| {
                anyhow::anyhow!("Roster references unknown unit template '{}'", entry.template)
            })?;

            let statuses = if entry.statuses.has_legacy_fields() {
                tracing::debug!(
                    template = %entry.template,
                    position = %entry.position,
                    slow_turns = ?entry.statuses.slow_turns,
                    haste_turns = ?entry.statuses.haste_turns,
                    "migrating legacy statuses"
                );
                migrate_legacy_statuses(entry.statuses.clone(), &config.legacy)
            } else {
                entry.statuses.clone()
            };

            Ok(template.to_spec(entry.position, entry.star, statuses))
        })
        .collect()
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse a roster from a RON string.
    pub fn parse(content: &str) -> LoadResult<Roster> {
        let roster: Roster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;
        if roster.allies.is_empty() && roster.enemies.is_empty() {
            anyhow::bail!("Roster deploys no units");
        }
        Ok(roster)
    }
}
