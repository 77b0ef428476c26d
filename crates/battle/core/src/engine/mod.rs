//! Turn scheduling and action execution pipeline.
//!
//! The [`BattleEngine`] is the only writer of a [`BattleState`]. Each
//! [`step`](BattleEngine::step) resolves exactly one actor's turn and returns
//! the events it produced, so a presentation layer can animate between steps.
//! The engine's methods are split by concern across the submodules.

mod abort;
mod actions;
mod damage;
mod economy;
mod effects;
mod outcome;
mod turns;

pub use abort::AbortHandle;
pub use effects::SkillResolution;
pub use turns::{build_turn_order, scale_duration, speed_multiplier};

use crate::env::{BattleEnv, RollContext, compute_seed};
use crate::event::{BattleEvent, BattleOutcome};
use crate::state::{BattleState, UnitId};

/// Everything a finished battle produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub events: Vec<BattleEvent>,
}

/// Battle engine that drives a [`BattleState`] to completion.
///
/// The engine borrows the state exclusively for its lifetime; the caller keeps
/// ownership and can inspect it between steps through [`state`](Self::state).
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    env: BattleEnv<'a>,
    events: Vec<BattleEvent>,
    abort: Option<AbortHandle>,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, env: BattleEnv<'a>) -> Self {
        Self {
            state,
            env,
            events: Vec::new(),
            abort: None,
        }
    }

    /// Installs an abort flag checked at every turn boundary.
    #[must_use]
    pub fn with_abort(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }

    pub fn state(&self) -> &BattleState {
        &*self.state
    }

    pub fn env(&self) -> BattleEnv<'a> {
        self.env
    }

    /// Resolves one turn and returns its events.
    ///
    /// Returns an empty list once the battle has ended.
    pub fn step(&mut self) -> Vec<BattleEvent> {
        if self.state.is_finished() {
            return Vec::new();
        }

        if self.abort.as_ref().is_some_and(AbortHandle::is_aborted) {
            self.finish_aborted();
            return self.drain_events();
        }

        // A roster may start with an empty side, or already be at the cap.
        if self.check_outcome() {
            return self.drain_events();
        }

        match self.next_actor() {
            Some(actor) => self.take_turn(actor),
            None => {
                tracing::warn!("no living actor to schedule");
            }
        }

        self.state.turn.action_count += 1;
        self.update_damage_multiplier();
        self.check_outcome();
        self.drain_events()
    }

    /// Steps until the battle ends and returns every event in order.
    pub fn run(&mut self) -> BattleReport {
        let mut events = Vec::new();
        while !self.state.is_finished() {
            events.extend(self.step());
        }
        let outcome = self.state.outcome.unwrap_or(BattleOutcome {
            winner: None,
            reason: crate::event::EndReason::Aborted,
            turns: self.state.turn.action_count,
        });
        BattleReport { outcome, events }
    }

    pub(crate) fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Derives the seed for the next roll made on behalf of `unit`.
    pub(crate) fn roll_seed(&mut self, unit: UnitId, context: RollContext) -> u64 {
        let nonce = self.state.next_roll();
        let seed = compute_seed(self.state.battle_seed, nonce, unit.0, context);
        tracing::trace!(unit = %unit, ?context, nonce, "roll");
        seed
    }

    /// Rolls a `chance` success for `unit`.
    pub(crate) fn roll_chance(&mut self, unit: UnitId, context: RollContext, chance: f64) -> bool {
        let seed = self.roll_seed(unit, context);
        self.env.rng.chance(seed, chance)
    }
}

#[cfg(test)]
mod tests;
