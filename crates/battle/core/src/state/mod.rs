//! Authoritative battle state representation.
//!
//! [`BattleState`] owns the roster of [`CombatUnit`]s and the turn bookkeeping
//! for one battle. Callers may read it freely but mutate it exclusively through
//! [`BattleEngine`](crate::BattleEngine).
pub mod error;
pub mod migrate;
pub mod status;
pub mod unit;

use std::collections::VecDeque;

pub use error::SetupError;
pub use migrate::{PersistedStatuses, STATUS_FORMAT_VERSION, migrate_legacy_statuses};
pub use status::{ApplyOutcome, StatusEntry, StatusKind, StatusLedger};
pub use unit::{BaseStats, CombatUnit, GridPos, UnitId, UnitMods, UnitSpec};

use crate::config::BattleConfig;
use crate::error::ErrorContext;
use crate::event::BattleOutcome;
use crate::skill::SkillCatalog;
use crate::traits::Side;

/// Turn bookkeeping.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Actions resolved so far, including skipped turns.
    pub action_count: u32,
    /// Scheduling rounds started so far.
    pub round: u32,
    /// Remaining actors of the current round, in order.
    pub queue: VecDeque<UnitId>,
    /// Monotonic counter feeding [`compute_seed`](crate::env::compute_seed).
    pub roll_nonce: u64,
}

/// Canonical snapshot of one battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// RNG seed, fixed at setup.
    pub battle_seed: u64,
    pub units: Vec<CombatUnit>,
    pub turn: TurnState,
    /// Global damage multiplier (death-match escalation).
    pub damage_mult: f64,
    /// Presentation-only speed multiplier.
    pub speed_multiplier: f64,
    /// Currency earned by the ally side from kill rewards.
    pub ally_currency: u32,
    pub outcome: Option<BattleOutcome>,
}

impl BattleState {
    /// Builds a battle from two rosters.
    ///
    /// Ally units receive ids first, in roster order. Legacy statuses are
    /// migrated, star variants are resolved against the catalog, and enemy
    /// units are scaled by the configured AI difficulty.
    pub fn new(
        battle_seed: u64,
        allies: &[UnitSpec],
        enemies: &[UnitSpec],
        config: &BattleConfig,
        catalog: &SkillCatalog,
    ) -> Result<Self, SetupError> {
        let ai = config.ai_profile();
        let mut units: Vec<CombatUnit> = Vec::with_capacity(allies.len() + enemies.len());

        let sides = allies
            .iter()
            .map(|spec| (Side::Ally, spec))
            .chain(enemies.iter().map(|spec| (Side::Enemy, spec)));

        for (side, spec) in sides {
            let id = UnitId(units.len() as u32);
            let context = ErrorContext::new()
                .with_unit(id)
                .with_position(spec.position)
                .with_template(spec.template.clone());

            validate_placement(side, spec, config, &units, &context)?;

            if !(1..=BattleConfig::MAX_STAR).contains(&spec.star) {
                return Err(SetupError::InvalidStar {
                    star: spec.star,
                    context,
                });
            }
            if spec.stats.rage_max == 0 {
                return Err(SetupError::ZeroRageMax { context });
            }

            let skill = catalog
                .resolve_for(&spec.skill, spec.role, spec.star)
                .ok_or_else(|| SetupError::MissingSkill {
                    skill: spec.skill.clone(),
                    context: context.clone(),
                })?
                .id
                .clone();

            let profile = match side {
                Side::Enemy => ai.as_ref(),
                Side::Ally => None,
            };
            let mut unit = CombatUnit::from_spec(id, side, spec, skill, profile);
            unit.statuses =
                migrate_legacy_statuses(spec.statuses.clone(), &config.legacy).to_ledger();
            units.push(unit);
        }

        let mut state = Self {
            battle_seed,
            units,
            turn: TurnState::default(),
            damage_mult: 1.0,
            speed_multiplier: 1.0,
            ally_currency: 0,
            outcome: None,
        };
        state.speed_multiplier = state.current_speed_multiplier(config);
        Ok(state)
    }

    pub fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.get(id.index())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.units.get_mut(id.index())
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(CombatUnit::is_alive)
    }

    /// Living units of `side`, in roster order.
    pub fn alive_on(&self, side: Side) -> impl Iterator<Item = &CombatUnit> + '_ {
        self.units
            .iter()
            .filter(move |u| u.side == side && u.is_alive())
    }

    pub fn alive_count(&self, side: Side) -> usize {
        self.alive_on(side).count()
    }

    /// Living unit on `pos`, if any.
    pub fn occupant(&self, pos: GridPos) -> Option<&CombatUnit> {
        self.units.iter().find(|u| u.is_alive() && u.pos == pos)
    }

    pub fn total_hp(&self, side: Side) -> u64 {
        self.alive_on(side).map(|u| u64::from(u.hp)).sum()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub(crate) fn current_speed_multiplier(&self, config: &BattleConfig) -> f64 {
        crate::engine::speed_multiplier(
            self.alive_count(Side::Ally),
            self.alive_count(Side::Enemy),
            &config.speed,
        )
    }

    /// Returns the next roll nonce and advances the counter.
    pub(crate) fn next_roll(&mut self) -> u64 {
        let nonce = self.turn.roll_nonce;
        self.turn.roll_nonce = self.turn.roll_nonce.wrapping_add(1);
        nonce
    }
}

fn validate_placement(
    side: Side,
    spec: &UnitSpec,
    config: &BattleConfig,
    placed: &[CombatUnit],
    context: &ErrorContext,
) -> Result<(), SetupError> {
    let pos = spec.position;
    let board = &config.board;
    if !board.contains(pos.row, pos.col) {
        return Err(SetupError::OutOfBounds {
            position: pos,
            rows: board.rows,
            cols: board.cols,
            context: context.clone(),
        });
    }

    let on_own_half = match side {
        Side::Ally => pos.col < board.half(),
        Side::Enemy => pos.col >= board.half(),
    };
    if !on_own_half {
        return Err(SetupError::WrongHalf {
            side,
            position: pos,
            context: context.clone(),
        });
    }

    if let Some(occupant) = placed.iter().find(|u| u.pos == pos) {
        return Err(SetupError::PositionOccupied {
            position: pos,
            occupant: occupant.id,
            context: context.clone(),
        });
    }
    Ok(())
}
