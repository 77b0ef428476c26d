//! Turn order and presentation speed scaling.

use std::collections::VecDeque;

use crate::combat::{DamageFlags, DamageOptions, DamageType};
use crate::config::{BoardDimensions, SpeedScaling};
use crate::event::{BattleEvent, SkipReason};
use crate::state::{BattleState, CombatUnit, StatusKind, UnitId};
use crate::traits::Side;

use super::BattleEngine;

/// Distance of a unit from its own side's front column.
fn depth(unit: &CombatUnit, board: &BoardDimensions) -> i32 {
    match unit.side {
        Side::Ally => board.half() - 1 - unit.pos.col,
        Side::Enemy => unit.pos.col - board.half(),
    }
}

/// Builds one round's action queue from the living units.
///
/// Faster units act first. Equal speeds keep their position order: each side
/// is ordered by row then front column to back, and the two sides are
/// interleaved starting with the ally side.
pub fn build_turn_order(state: &BattleState, board: &BoardDimensions) -> VecDeque<UnitId> {
    let ordered_side = |side: Side| {
        let mut units: Vec<&CombatUnit> = state.alive_on(side).collect();
        units.sort_by_key(|u| (u.pos.row, depth(u, board), u.id));
        units
    };
    let allies = ordered_side(Side::Ally);
    let enemies = ordered_side(Side::Enemy);

    let mut interleaved: Vec<&CombatUnit> = Vec::with_capacity(allies.len() + enemies.len());
    for i in 0..allies.len().max(enemies.len()) {
        interleaved.extend(allies.get(i));
        interleaved.extend(enemies.get(i));
    }

    // Stable: ties keep the interleaved position order.
    interleaved.sort_by(|a, b| b.speed.cmp(&a.speed));
    interleaved.into_iter().map(|u| u.id).collect()
}

/// Presentation speed multiplier for the given living-unit counts.
///
/// `min(1 + per_unit * max(allies, enemies), max)`
pub fn speed_multiplier(ally_alive: usize, enemy_alive: usize, scaling: &SpeedScaling) -> f64 {
    let n = ally_alive.max(enemy_alive) as f64;
    (1.0 + scaling.per_unit * n).min(scaling.max)
}

/// Scales an animation duration in milliseconds by the speed multiplier.
pub fn scale_duration(ms: i64, multiplier: f64) -> u64 {
    if ms <= 0 {
        return 0;
    }
    ((ms as f64) * multiplier).round().max(1.0) as u64
}

/// Start-of-turn bookkeeping for an actor.
pub(super) struct TickResult {
    pub died: bool,
    /// Control effect active before durations ticked down.
    pub control: Option<StatusKind>,
}

impl BattleEngine<'_> {
    /// Pops the next living actor, rebuilding the queue when a round ends.
    pub(super) fn next_actor(&mut self) -> Option<UnitId> {
        loop {
            if self.state.turn.queue.is_empty() {
                let queue = build_turn_order(self.state, &self.env.config.board);
                if queue.is_empty() {
                    return None;
                }
                self.state.turn.round += 1;
                tracing::trace!(round = self.state.turn.round, actors = queue.len(), "round scheduled");
                self.state.turn.queue = queue;
            }
            let next = self.state.turn.queue.pop_front()?;
            if self.state.is_alive(next) {
                return Some(next);
            }
        }
    }

    /// Resolves damage over time, captures control, then ticks durations.
    pub(super) fn tick_statuses(&mut self, actor: UnitId) -> TickResult {
        let dots: Vec<(StatusKind, u32)> = match self.state.unit(actor) {
            Some(unit) => unit.statuses.damage_over_time().collect(),
            None => Vec::new(),
        };

        for (kind, amount) in dots {
            let raw = i32::try_from(amount).unwrap_or(i32::MAX);
            let report = self.resolve_damage(
                None,
                actor,
                raw,
                DamageType::True,
                DamageOptions::new(DamageFlags::DOT),
            );
            self.emit(BattleEvent::StatusTicked {
                target: actor,
                kind,
                damage: report.dealt,
            });
            if !self.state.is_alive(actor) {
                return TickResult {
                    died: true,
                    control: None,
                };
            }
        }

        let Some(unit) = self.state.unit_mut(actor) else {
            return TickResult {
                died: true,
                control: None,
            };
        };
        let control = unit.statuses.control();
        let expired = unit.statuses.decrement();
        for kind in expired {
            self.emit(BattleEvent::StatusExpired {
                target: actor,
                kind,
            });
        }

        TickResult {
            died: false,
            control,
        }
    }

    pub(super) fn skip(&mut self, actor: UnitId, reason: SkipReason) {
        tracing::debug!(actor = %actor, %reason, "turn skipped");
        self.emit(BattleEvent::ActionSkipped { actor, reason });
    }
}
