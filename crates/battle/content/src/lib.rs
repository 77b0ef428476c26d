//! Data-driven battle content and loaders.
//!
//! This crate houses the static content a battle is built from and provides
//! loaders for RON/TOML data files:
//! - Skill catalog (data-driven via RON, with an embedded default)
//! - Unit templates (data-driven via RON)
//! - Rosters placing templates on the board (data-driven via RON)
//! - Battle configuration (data-driven via TOML)
//!
//! Every loader validates eagerly: an unknown effect tag, template, or skill
//! reference fails the load instead of surfacing mid-battle.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, Roster, RosterEntry, RosterLoader, SkillLoader,
    UnitCatalog, UnitLoader, UnitTemplate,
};
