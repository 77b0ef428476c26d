//! Pure combat rules.
//!
//! Nothing here touches battle state: the engine's damage pipeline
//! ([`BattleEngine::resolve_damage`](crate::BattleEngine::resolve_damage))
//! composes these rules and applies the result.
pub mod damage;
pub mod elemental;
pub mod hit;
pub mod knockback;

pub use damage::{
    DamageFlags, DamageOptions, DamageType, HitReport, absorb, finalize_damage, mitigate,
};
pub use elemental::{ElementalOutcome, apply_elemental, elemental_modifier};
pub use hit::{calculate_hit_chance, check_hit};
pub use knockback::{RowOccupant, find_destination};
