//! Deterministic auto-battler combat resolution.
//!
//! `battle-core` defines the canonical battle rules (damage, statuses,
//! targeting, skills, turn order) as pure APIs with no I/O. A battle is built
//! from two rosters into a [`BattleState`], then driven to completion by a
//! [`BattleEngine`] that emits [`BattleEvent`]s for presentation. Content
//! loading lives in `battle-content`.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod skill;
pub mod state;
pub mod traits;

pub use combat::{DamageFlags, DamageOptions, DamageType, HitReport};
pub use config::{
    AiProfile, BasicAttackRules, BattleConfig, BoardDimensions, CapResolution, Counter,
    CritRules, DeathMatchRules, ElementalTable, LegacyConversion, RageRules, SpeedScaling,
};
pub use engine::{
    AbortHandle, BattleEngine, BattleReport, SkillResolution, build_turn_order, scale_duration,
    speed_multiplier,
};
pub use env::{BattleEnv, PcgRng, RngOracle, RollContext, compute_seed};
pub use error::{BattleError, ErrorContext, ErrorSeverity};
#[cfg(feature = "serde")]
pub use event::compute_events_root;
pub use event::{ActionKind, BattleEvent, BattleOutcome, EndReason, SkipReason};
pub use skill::{
    ActionPattern, CatalogError, EffectTag, ScaleStat, SkillCatalog, SkillDef, SkillParams,
    SkillRecord, TargetSelector,
};
pub use state::{
    BaseStats, BattleState, CombatUnit, GridPos, PersistedStatuses, SetupError, StatusEntry,
    StatusKind, StatusLedger, TurnState, UnitId, UnitMods, UnitSpec, migrate_legacy_statuses,
};
pub use traits::{Difficulty, Role, Side, Tribe};
