//! Skill effect interpretation.
//!
//! Walks the handler table for a skill's [`EffectTag`](crate::skill::EffectTag):
//! each phase selects targets once, then applies its steps to every target.

use crate::combat::{DamageFlags, DamageOptions, DamageType, RowOccupant, find_destination};
use crate::env::{RollContext, compute_seed};
use crate::event::BattleEvent;
use crate::skill::{EffectStep, SkillDef, formula, handler, select_targets};
use crate::state::{StatusKind, UnitId};

use super::BattleEngine;

/// Summary of one skill's effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillResolution {
    /// Every unit touched by a phase, in first-touch order.
    pub targets: Vec<UnitId>,
    pub total_damage: u32,
    pub kills: u32,
}

/// Mutable bookkeeping for one cast.
#[derive(Debug, Default)]
pub(crate) struct CastContext {
    /// Damage dealt per target during this cast.
    dealt: Vec<(UnitId, u32)>,
    pub follow_up_used: bool,
}

impl CastContext {
    fn record(&mut self, target: UnitId, amount: u32) {
        match self.dealt.iter_mut().find(|(id, _)| *id == target) {
            Some((_, total)) => *total += amount,
            None => self.dealt.push((target, amount)),
        }
    }

    fn dealt_to(&self, target: UnitId) -> u32 {
        self.dealt
            .iter()
            .find(|(id, _)| *id == target)
            .map_or(0, |(_, amount)| *amount)
    }
}

fn to_raw(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

impl BattleEngine<'_> {
    /// Applies every phase of `def` as cast by `caster`.
    ///
    /// Does not touch the caster's rage; [`cast_skill`](Self::cast_skill)
    /// resets it before calling this.
    pub fn apply_skill_effect(
        &mut self,
        caster: UnitId,
        def: &SkillDef,
        primary: Option<UnitId>,
    ) -> SkillResolution {
        let mut resolution = SkillResolution::default();
        let mut context = CastContext::default();
        let board = self.env.config.board;

        for phase in handler(def.effect).phases {
            if !self.state.is_alive(caster) {
                break;
            }

            let nonce = self.state.next_roll();
            let rng = self.env.rng;
            let base_seed = compute_seed(self.state.battle_seed, nonce, caster.0, RollContext::Targeting);
            let mut draws: u64 = 0;
            let mut pick = |len: usize| {
                draws += 1;
                rng.index(base_seed ^ draws.wrapping_mul(0x9e37_79b9_7f4a_7c15), len)
            };

            let targets = match self.state.unit(caster) {
                Some(unit) => select_targets(
                    self.state,
                    unit,
                    primary,
                    phase.selector,
                    &def.params,
                    &board,
                    &mut pick,
                ),
                None => break,
            };

            for target in targets {
                if !resolution.targets.contains(&target) {
                    resolution.targets.push(target);
                }
                for step in phase.steps {
                    if !self.state.is_alive(target) {
                        break;
                    }
                    self.apply_step(caster, target, def, *step, &mut context, &mut resolution);
                }
            }
        }

        resolution
    }

    fn apply_step(
        &mut self,
        caster: UnitId,
        target: UnitId,
        def: &SkillDef,
        step: EffectStep,
        context: &mut CastContext,
        resolution: &mut SkillResolution,
    ) {
        let params = &def.params;
        let Some(unit) = self.state.unit(caster).filter(|u| u.is_alive()) else {
            return;
        };

        let hit = match step {
            EffectStep::Damage => Some((formula::primary_hit(params, unit), def.damage_type)),
            EffectStep::SecondHit => Some((formula::second_hit(params, unit), def.damage_type)),
            EffectStep::SplashDamage => {
                let full = f64::from(formula::skill_damage(params, unit));
                Some(((full * params.splash_rate).round() as u32, def.damage_type))
            }
            EffectStep::TrueDamage => Some((formula::skill_damage(params, unit), DamageType::True)),
            EffectStep::Echo => Some((formula::echo_amount(params, unit), def.damage_type)),
            _ => None,
        };

        if let Some((amount, damage_type)) = hit {
            let mut options = DamageOptions::skill().with_armor_pen(params.armor_pen);
            if params.skip_evasion {
                options = options.with_flags(DamageFlags::FORCE_HIT);
            }
            let report = self.resolve_damage(Some(caster), target, to_raw(amount), damage_type, options);
            context.record(target, report.dealt);
            resolution.total_damage = resolution.total_damage.saturating_add(report.dealt);
            if report.killed {
                resolution.kills += 1;
                self.on_skill_kill(caster, target, params, context);
            }
            return;
        }

        match step {
            EffectStep::Lifesteal => {
                let stolen = (f64::from(context.dealt_to(target)) * params.lifesteal).round() as u32;
                self.heal(caster, stolen);
            }
            EffectStep::Inflict(kind) => {
                let spec = params.status_spec(kind, unit.effective_atk());
                if spec.chance < 1.0 && !self.roll_chance(caster, RollContext::StatusChance, spec.chance) {
                    self.emit(BattleEvent::StatusResisted { target, kind });
                    return;
                }
                self.apply_status(Some(caster), target, kind, spec.magnitude, spec.turns);
            }
            EffectStep::Buff(kind) => {
                let spec = params.status_spec(kind, unit.effective_atk());
                self.apply_status(Some(caster), target, kind, spec.magnitude, spec.turns);
            }
            EffectStep::Taunt => {
                self.apply_status(Some(caster), target, StatusKind::Taunt, 1.0, params.turns);
            }
            EffectStep::Knockback => {
                let direction = unit.side.forward();
                self.knockback(target, direction);
            }
            EffectStep::Heal => {
                let amount = formula::heal_amount(params, unit);
                self.heal(target, amount);
            }
            EffectStep::Shield => {
                let amount = formula::shield_amount(params, unit);
                self.add_shield(target, amount);
            }
            EffectStep::Cleanse => {
                let removed = self
                    .state
                    .unit_mut(target)
                    .map(|u| u.statuses.cleanse())
                    .unwrap_or_default();
                if !removed.is_empty() {
                    self.emit(BattleEvent::Cleansed {
                        target,
                        kinds: removed,
                    });
                }
            }
            EffectStep::GrantRage => {
                self.grant_rage(target, params.rage_gain);
            }
            EffectStep::Assist => {
                let helper = self
                    .state
                    .alive_on(unit.side)
                    .find(|ally| ally.id != caster && ally.pos.row == unit.pos.row)
                    .map(|ally| (ally.id, f64::from(ally.effective_atk()) * params.assist_rate));
                let Some((helper, amount)) = helper else {
                    return;
                };
                let raw = to_raw(amount.round().max(0.0) as u32);
                let report = self.resolve_damage(
                    Some(helper),
                    target,
                    raw,
                    DamageType::Physical,
                    DamageOptions::skill(),
                );
                resolution.total_damage = resolution.total_damage.saturating_add(report.dealt);
                if report.killed {
                    resolution.kills += 1;
                }
            }
            EffectStep::Damage
            | EffectStep::SecondHit
            | EffectStep::SplashDamage
            | EffectStep::TrueDamage
            | EffectStep::Echo => {}
        }
    }

    fn add_shield(&mut self, target: UnitId, amount: u32) {
        if amount == 0 {
            return;
        }
        let Some(unit) = self.state.unit_mut(target).filter(|u| u.is_alive()) else {
            return;
        };
        unit.shield = unit.shield.saturating_add(amount);
        self.emit(BattleEvent::ShieldGained { target, amount });
    }

    /// Pushes `target` along its row in `direction`.
    pub fn knockback(&mut self, target: UnitId, direction: i32) {
        let Some(unit) = self.state.unit(target).filter(|u| u.is_alive()) else {
            return;
        };
        let from = unit.pos;
        let row_units: Vec<RowOccupant> = self
            .state
            .units
            .iter()
            .filter(|u| u.id != target && u.pos.row == from.row)
            .map(|u| RowOccupant {
                col: u.pos.col,
                role: u.role,
                alive: u.is_alive(),
            })
            .collect();

        let to_col = find_destination(from.col, direction, &row_units, self.env.config.board.cols);
        tracing::debug!(target = %target, from_col = from.col, to_col, "knockback");
        if to_col == from.col {
            return;
        }
        if let Some(unit) = self.state.unit_mut(target) {
            unit.pos.col = to_col;
        }
        self.emit(BattleEvent::Knockback {
            target,
            from_col: from.col,
            to_col,
        });
    }
}
