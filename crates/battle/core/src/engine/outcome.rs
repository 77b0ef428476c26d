//! Outcome detection and death-match escalation.

use crate::config::CapResolution;
use crate::event::{BattleEvent, BattleOutcome, EndReason};
use crate::traits::Side;

use super::BattleEngine;

impl BattleEngine<'_> {
    /// Ends the battle if a side is eliminated or the action cap is reached.
    ///
    /// Returns true when the battle is (now) finished.
    pub(super) fn check_outcome(&mut self) -> bool {
        if self.state.is_finished() {
            return true;
        }

        let allies = self.state.alive_count(Side::Ally);
        let enemies = self.state.alive_count(Side::Enemy);
        let eliminated = match (allies, enemies) {
            (0, 0) => Some(None),
            (0, _) => Some(Some(Side::Enemy)),
            (_, 0) => Some(Some(Side::Ally)),
            _ => None,
        };
        if let Some(winner) = eliminated {
            self.finish(winner, EndReason::Elimination);
            return true;
        }

        if self.state.turn.action_count >= self.env.config.turn_cap {
            let winner = self.cap_winner();
            self.finish(winner, EndReason::TurnCap);
            return true;
        }
        false
    }

    fn cap_winner(&self) -> Option<Side> {
        match self.env.config.cap_resolution {
            CapResolution::Draw => None,
            CapResolution::HpTotal => {
                if self.state.total_hp(Side::Ally) >= self.state.total_hp(Side::Enemy) {
                    Some(Side::Ally)
                } else {
                    Some(Side::Enemy)
                }
            }
        }
    }

    pub(super) fn finish_aborted(&mut self) {
        self.finish(None, EndReason::Aborted);
    }

    fn finish(&mut self, winner: Option<Side>, reason: EndReason) {
        let outcome = BattleOutcome {
            winner,
            reason,
            turns: self.state.turn.action_count,
        };
        tracing::info!(
            winner = ?winner,
            %reason,
            turns = outcome.turns,
            "battle ended"
        );
        self.state.outcome = Some(outcome);
        self.emit(BattleEvent::BattleEnded(outcome));
    }

    /// Recomputes the global damage multiplier after an action.
    pub(super) fn update_damage_multiplier(&mut self) {
        let multiplier = self
            .env
            .config
            .death_match
            .multiplier_at(self.state.turn.action_count);
        if (multiplier - self.state.damage_mult).abs() > f64::EPSILON {
            tracing::debug!(multiplier, actions = self.state.turn.action_count, "death match escalation");
            self.state.damage_mult = multiplier;
            self.emit(BattleEvent::DamageMultiplierChanged { multiplier });
        }
    }
}
