//! Events emitted by the engine for the presentation layer.
//!
//! The engine never calls into presentation code. Each step returns the events
//! it produced, in resolution order; a renderer may animate them at its own
//! pace without affecting the simulation.

use crate::combat::DamageType;
use crate::skill::ActionPattern;
use crate::state::{StatusKind, UnitId};
use crate::traits::Side;

/// Why an actor's turn produced no action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    Stunned,
    Frozen,
    Asleep,
    /// Rage was not full (or silenced) and basic attacks are blocked.
    Disarmed,
    /// No living enemy could be selected.
    NoTarget,
    /// Died to damage over time at the start of the turn.
    DiedToStatus,
}

impl SkipReason {
    pub(crate) fn from_control(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Freeze => Self::Frozen,
            StatusKind::Sleep => Self::Asleep,
            _ => Self::Stunned,
        }
    }
}

/// Basic attack or skill cast.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionKind {
    Basic,
    /// Immediate extra basic attack granted by a kill bonus.
    FollowUp,
    Skill { skill: String },
}

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// At least one side has no living units.
    Elimination,
    /// The action ceiling was reached.
    TurnCap,
    /// An external abort was honored at a turn boundary.
    Aborted,
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    /// Winning side, or `None` for a draw.
    pub winner: Option<Side>,
    pub reason: EndReason,
    /// Actions resolved when the battle ended.
    pub turns: u32,
}

impl BattleOutcome {
    pub const fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// One observable state change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
        actor: UnitId,
    },
    ActionSkipped {
        actor: UnitId,
        reason: SkipReason,
    },
    /// Summary of one resolved action.
    ActionResolved {
        actor: UnitId,
        action: ActionKind,
        pattern: ActionPattern,
        targets: Vec<UnitId>,
        total_damage: u32,
    },
    Damage {
        source: Option<UnitId>,
        target: UnitId,
        amount: u32,
        absorbed: u32,
        damage_type: DamageType,
        crit: bool,
    },
    Evaded {
        source: Option<UnitId>,
        target: UnitId,
    },
    StatusApplied {
        source: Option<UnitId>,
        target: UnitId,
        kind: StatusKind,
        magnitude: f64,
        turns: u32,
    },
    StatusResisted {
        target: UnitId,
        kind: StatusKind,
    },
    StatusTicked {
        target: UnitId,
        kind: StatusKind,
        damage: u32,
    },
    StatusExpired {
        target: UnitId,
        kind: StatusKind,
    },
    Cleansed {
        target: UnitId,
        kinds: Vec<StatusKind>,
    },
    Healed {
        target: UnitId,
        amount: u32,
    },
    ShieldGained {
        target: UnitId,
        amount: u32,
    },
    RageGained {
        target: UnitId,
        amount: u32,
    },
    Knockback {
        target: UnitId,
        from_col: i32,
        to_col: i32,
    },
    UnitDied {
        unit: UnitId,
        killer: Option<UnitId>,
    },
    CurrencyAwarded {
        side: Side,
        amount: u32,
    },
    SpeedMultiplierChanged {
        multiplier: f64,
    },
    DamageMultiplierChanged {
        multiplier: f64,
    },
    BattleEnded(BattleOutcome),
}

/// Computes a replay commitment over a battle's event log.
///
/// Two runs with the same seed, rosters, and configuration produce the same
/// root. Hashes each event's bincode encoding in order with SHA-256.
#[cfg(feature = "serde")]
pub fn compute_events_root(events: &[BattleEvent]) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for event in events {
        if let Ok(bytes) = bincode::serialize(event) {
            hasher.update(&bytes);
        }
    }
    hasher.finalize().into()
}
