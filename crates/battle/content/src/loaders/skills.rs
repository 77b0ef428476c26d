//! Skill catalog loader.

use std::path::Path;

use battle_core::{SkillCatalog, SkillRecord};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillFile {
    pub skills: Vec<SkillRecord>,
}

/// Loader for the skill catalog from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load and validate a skill catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// The catalog shipped with this crate.
    pub fn embedded() -> LoadResult<SkillCatalog> {
        Self::parse(include_str!("../../data/skills.ron"))
    }

    /// Parse and validate a skill catalog from a RON string.
    ///
    /// Unknown effect tags, duplicate ids, and unusable parameters fail here.
    pub fn parse(content: &str) -> LoadResult<SkillCatalog> {
        let file: SkillFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;
        let count = file.skills.len();
        let catalog = SkillCatalog::from_records(file.skills)
            .map_err(|e| anyhow::anyhow!("Invalid skill catalog: {}", e))?;
        tracing::debug!(skills = count, "loaded skill catalog");
        Ok(catalog)
    }
}
