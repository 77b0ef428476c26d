//! Per-turn action selection: skill cast, basic attack, or skip.

use crate::combat::{DamageOptions, DamageType, HitReport};
use crate::env::RollContext;
use crate::event::{ActionKind, BattleEvent, SkipReason};
use crate::skill::{ActionPattern, handler, pick_primary, taunt_lock};
use crate::state::{StatusKind, UnitId};
use crate::traits::Side;

use super::BattleEngine;

impl BattleEngine<'_> {
    /// Runs one actor's turn: status tick, control check, then an action.
    pub(super) fn take_turn(&mut self, actor: UnitId) {
        self.emit(BattleEvent::TurnStarted {
            turn: self.state.turn.action_count + 1,
            actor,
        });

        let tick = self.tick_statuses(actor);
        if tick.died {
            self.skip(actor, SkipReason::DiedToStatus);
            return;
        }
        if let Some(control) = tick.control {
            self.skip(actor, SkipReason::from_control(control));
            return;
        }

        let Some(unit) = self.state.unit(actor) else {
            return;
        };
        let can_cast = unit.rage_full() && !unit.statuses.has(StatusKind::Silence);
        let disarmed = unit.statuses.has(StatusKind::Disarm);

        if can_cast {
            self.cast_skill(actor);
        } else if !disarmed {
            self.basic_attack(actor, ActionKind::Basic);
        } else {
            self.skip(actor, SkipReason::Disarmed);
        }
    }

    /// Chooses the primary target for `actor`.
    ///
    /// A living taunter always wins. Enemy units under an AI profile may ignore
    /// scoring and pick uniformly at random; otherwise the role score decides.
    pub fn choose_target(&mut self, actor: UnitId) -> Option<UnitId> {
        if let Some(taunter) = taunt_lock(self.state, actor) {
            return Some(taunter);
        }

        let side = self.state.unit(actor)?.side;
        if side == Side::Enemy
            && let Some(profile) = self.env.config.ai_profile()
            && self.roll_chance(actor, RollContext::Targeting, profile.random_target_chance)
        {
            let candidates: Vec<UnitId> = self.state.alive_on(side.opponent()).map(|u| u.id).collect();
            if !candidates.is_empty() {
                let seed = self.roll_seed(actor, RollContext::Targeting);
                let index = self.env.rng.index(seed, candidates.len());
                return candidates.get(index).copied();
            }
        }

        pick_primary(self.state, actor, &self.env.config.board)
    }

    /// Performs a basic attack against a freshly chosen target.
    pub fn basic_attack(&mut self, actor: UnitId, kind: ActionKind) -> Option<HitReport> {
        let Some(target) = self.choose_target(actor) else {
            tracing::warn!(actor = %actor, "no target for basic attack");
            self.skip(actor, SkipReason::NoTarget);
            return None;
        };
        Some(self.strike(actor, target, kind))
    }

    /// Physical hit for `effective_atk + variance`, able to crit.
    pub(super) fn strike(&mut self, actor: UnitId, target: UnitId, kind: ActionKind) -> HitReport {
        let Some(unit) = self.state.unit(actor) else {
            return HitReport::NONE;
        };
        let pattern = ActionPattern::for_basic(unit.role, unit.range);
        let atk = unit.effective_atk();

        let rules = self.env.config.basic_attack;
        let seed = self.roll_seed(actor, RollContext::Variance);
        let variance = self
            .env
            .rng
            .range_i32(seed, rules.variance_min, rules.variance_max);
        let raw = i32::try_from(atk).unwrap_or(i32::MAX).saturating_add(variance);

        let report = self.resolve_damage(
            Some(actor),
            target,
            raw,
            DamageType::Physical,
            DamageOptions::basic(),
        );
        self.emit(BattleEvent::ActionResolved {
            actor,
            action: kind,
            pattern,
            targets: vec![target],
            total_damage: report.dealt,
        });
        report
    }

    /// Casts the actor's skill. Rage resets to 0 before any effect applies.
    pub fn cast_skill(&mut self, actor: UnitId) {
        let catalog = self.env.catalog;
        let Some(def) = self.state.unit(actor).and_then(|u| catalog.get(&u.skill)) else {
            tracing::warn!(actor = %actor, "skill missing from catalog");
            self.skip(actor, SkipReason::NoTarget);
            return;
        };

        let needs_target = handler(def.effect)
            .phases
            .iter()
            .any(|phase| phase.selector.needs_primary());
        let primary = self.choose_target(actor);
        if needs_target && primary.is_none() {
            tracing::warn!(actor = %actor, skill = %def.id, "no target for skill");
            self.skip(actor, SkipReason::NoTarget);
            return;
        }

        if let Some(unit) = self.state.unit_mut(actor) {
            unit.rage = 0;
        }
        tracing::debug!(
            actor = %actor,
            skill = %def.id,
            effect = %def.effect,
            primary = ?primary,
            "casting skill"
        );

        let resolution = self.apply_skill_effect(actor, def, primary);
        self.emit(BattleEvent::ActionResolved {
            actor,
            action: ActionKind::Skill {
                skill: def.id.clone(),
            },
            pattern: def.pattern,
            targets: resolution.targets,
            total_damage: resolution.total_damage,
        });
    }
}
