//! Skill catalog, target selection, and the effect handler table.
pub mod catalog;
pub mod dispatch;
pub mod formula;
pub mod selector;

pub use catalog::{
    ASSASSIN_UPGRADE_SUFFIX, ActionPattern, CatalogError, EffectTag, HitComponent, ScaleStat,
    SkillCatalog, SkillDef, SkillParams, SkillRecord, StatusSpec,
};
pub use dispatch::{EffectStep, Phase, SkillHandler, handler};
pub use selector::{TargetSelector, pick_primary, score_target, select_targets, taunt_lock};
