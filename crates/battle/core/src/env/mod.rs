//! Read-only collaborators consumed by the engine.
//!
//! The engine never owns configuration, the skill catalog, or the RNG; it
//! borrows them through a [`BattleEnv`] for the duration of a battle.

pub mod rng;

pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::BattleConfig;
use crate::skill::SkillCatalog;

/// Bundle of borrowed oracles handed to [`BattleEngine`](crate::BattleEngine).
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub config: &'a BattleConfig,
    pub catalog: &'a SkillCatalog,
    pub rng: &'a dyn RngOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(config: &'a BattleConfig, catalog: &'a SkillCatalog, rng: &'a dyn RngOracle) -> Self {
        Self {
            config,
            catalog,
            rng,
        }
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .field("skills", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
