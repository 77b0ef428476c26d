//! Elemental advantage rule.
//!
//! The counter table decides whether an attacker's tribe has advantage. The
//! modifier then depends on roles: a tank defender halves an advantaged hit,
//! otherwise a non-tank attacker gets the advantage bonus. A tank attacking
//! with advantage gets nothing.

use crate::config::ElementalTable;
use crate::state::CombatUnit;
use crate::traits::{Role, Tribe};

/// Result of evaluating the elemental rule for one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementalOutcome {
    /// True when the attacker's tribe counters the defender's.
    pub advantage: bool,
    /// Multiplier applied to raw damage before mitigation.
    pub modifier: f64,
}

impl ElementalOutcome {
    pub const NEUTRAL: Self = Self {
        advantage: false,
        modifier: 1.0,
    };
}

/// Evaluates the elemental rule from tribes and roles.
pub fn elemental_modifier(
    table: &ElementalTable,
    attacker_tribe: Tribe,
    attacker_role: Role,
    defender_tribe: Tribe,
    defender_role: Role,
) -> ElementalOutcome {
    if !table.counters(attacker_tribe, defender_tribe) {
        return ElementalOutcome::NEUTRAL;
    }

    let modifier = if defender_role.is_tank() {
        table.tank_defender_modifier
    } else if !attacker_role.is_tank() {
        table.advantage_modifier
    } else {
        1.0
    };

    ElementalOutcome {
        advantage: true,
        modifier,
    }
}

/// Applies the elemental rule to `raw` and emits the observability log entry.
///
/// Every hit with an advantage relation is logged, including the tank-attacker
/// case where the modifier is 1.0.
pub fn apply_elemental(
    table: &ElementalTable,
    attacker: &CombatUnit,
    defender: &CombatUnit,
    raw: f64,
) -> f64 {
    let outcome = elemental_modifier(
        table,
        attacker.tribe,
        attacker.role,
        defender.tribe,
        defender.role,
    );
    if outcome.advantage {
        tracing::debug!(
            attacker = %attacker.id,
            defender = %defender.id,
            attacker_tribe = %attacker.tribe,
            defender_tribe = %defender.tribe,
            attacker_role = %attacker.role,
            defender_role = %defender.role,
            modifier = outcome.modifier,
            "elemental advantage applied"
        );
    }
    raw * outcome.modifier
}
