//! Kill bonuses: rage refund, currency, and follow-up attacks.

use crate::event::{ActionKind, BattleEvent};
use crate::skill::{SkillParams, pick_primary};
use crate::state::UnitId;
use crate::traits::Side;

use super::BattleEngine;
use super::effects::CastContext;

/// Rage refunded for a kill: `ceil(rage_max * fraction)`.
pub fn kill_refund(rage_max: u32, fraction: f64) -> u32 {
    if fraction <= 0.0 || !fraction.is_finite() {
        return 0;
    }
    (f64::from(rage_max) * fraction).ceil() as u32
}

impl BattleEngine<'_> {
    /// Fires the skill's kill bonus after `victim` died to `caster`'s skill damage.
    pub(super) fn on_skill_kill(
        &mut self,
        caster: UnitId,
        victim: UnitId,
        params: &SkillParams,
        context: &mut CastContext,
    ) {
        if !params.has_kill_bonus() {
            return;
        }
        let Some(unit) = self.state.unit(caster) else {
            return;
        };
        let side = unit.side;
        let refund = kill_refund(unit.rage_max, params.kill_rage);
        tracing::debug!(caster = %caster, victim = %victim, refund, "kill bonus");

        self.grant_rage(caster, refund);

        if params.kill_gold > 0 && side == Side::Ally {
            self.state.ally_currency = self.state.ally_currency.saturating_add(params.kill_gold);
            self.emit(BattleEvent::CurrencyAwarded {
                side,
                amount: params.kill_gold,
            });
        }

        if params.kill_follow_up && !context.follow_up_used && self.state.is_alive(caster) {
            context.follow_up_used = true;
            // The victim is dead, so scoring picks among its surviving teammates.
            if let Some(next) = pick_primary(self.state, caster, &self.env.config.board) {
                self.strike(caster, next, ActionKind::FollowUp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_rounds_up() {
        assert_eq!(kill_refund(2, 0.5), 1);
        assert_eq!(kill_refund(3, 0.5), 2);
        assert_eq!(kill_refund(5, 1.0), 5);
        assert_eq!(kill_refund(5, 0.0), 0);
    }
}
