//! The damage pipeline.
//!
//! Order of operations for one hit:
//!
//! 1. dead attacker or defender → no-op
//! 2. `raw = max(1, raw)`, elemental modifier, crit (physical, `CAN_CRIT` only)
//! 3. evasion roll unless the hit is forced
//! 4. mitigation, global damage multiplier, round with a floor of 1
//! 5. shield absorption, then HP
//! 6. rage accrual, on-hit statuses, reflect, lifesteal
//! 7. death

use crate::combat::{
    DamageFlags, DamageOptions, DamageType, HitReport, absorb, apply_elemental, check_hit,
    finalize_damage, mitigate,
};
use crate::config::BattleConfig;
use crate::env::RollContext;
use crate::event::BattleEvent;
use crate::state::{ApplyOutcome, StatusKind, UnitId};
use crate::traits::Side;

use super::BattleEngine;

impl BattleEngine<'_> {
    /// Resolves one instance of damage from `attacker` (or the environment)
    /// against `defender`.
    pub fn resolve_damage(
        &mut self,
        attacker: Option<UnitId>,
        defender: UnitId,
        raw: i32,
        damage_type: DamageType,
        options: DamageOptions,
    ) -> HitReport {
        let config = self.env.config;
        if !self.state.is_alive(defender) {
            return HitReport::NONE;
        }
        if attacker.is_some_and(|source| !self.state.is_alive(source)) {
            return HitReport::NONE;
        }

        let mut amount = f64::from(raw.max(1));

        // ===== pre-mitigation modifiers =====
        let mut crit = false;
        if let Some(source) = attacker {
            if let (Some(a), Some(d)) = (self.state.unit(source), self.state.unit(defender)) {
                amount = apply_elemental(&config.elemental, a, d, amount);
            }

            if options.flags.contains(DamageFlags::CAN_CRIT) && damage_type == DamageType::Physical
            {
                let chance = self
                    .state
                    .unit(source)
                    .and_then(|a| a.mods.crit_chance)
                    .unwrap_or(config.crit.default_chance);
                if self.roll_chance(source, RollContext::Crit, chance) {
                    crit = true;
                    amount *= config.crit.multiplier;
                }
            }
        }

        // ===== evasion =====
        if options.flags.evadable() {
            let accuracy = attacker
                .and_then(|id| self.state.unit(id))
                .map_or(BattleConfig::DEFAULT_ACCURACY, |a| a.mods.accuracy);
            let evasion = self
                .state
                .unit(defender)
                .map_or(0.0, |d| d.effective_evasion());
            let seed = self.roll_seed(defender, RollContext::Evasion);
            let roll = self.env.rng.unit_interval(seed);
            if !check_hit(accuracy, evasion, roll) {
                return self.register_miss(attacker, defender);
            }
        }

        // ===== mitigation =====
        let defense = match (damage_type, self.state.unit(defender)) {
            (DamageType::Physical, Some(d)) => d.effective_def(),
            (DamageType::Magic, Some(d)) => d.effective_mdef(),
            _ => 0.0,
        };
        let mitigated = mitigate(amount, damage_type, defense, options.armor_pen);
        let damage = finalize_damage(mitigated * self.state.damage_mult);

        // ===== shield, then HP =====
        let Some(target) = self.state.unit_mut(defender) else {
            return HitReport::NONE;
        };
        let (shield, hp, absorbed, hp_lost) = absorb(target.shield, target.hp, damage);
        target.shield = shield;
        target.hp = hp;
        let dealt = absorbed + hp_lost;
        let lethal = hp == 0;

        self.emit(BattleEvent::Damage {
            source: attacker,
            target: defender,
            amount: dealt,
            absorbed,
            damage_type,
            crit,
        });

        // ===== rage =====
        if dealt > 0 && !options.flags.contains(DamageFlags::NO_RAGE) {
            if let Some(source) = attacker {
                let gain = self.attacker_rage_gain(source);
                self.grant_rage(source, gain);
            }
            if !lethal {
                self.grant_rage(defender, config.rage.defender_gain_per_hit);
            }
        }

        // ===== on-hit effects =====
        if let Some(source) = attacker.filter(|_| dealt > 0) {
            if !options.flags.contains(DamageFlags::NO_PROCS) && !lethal {
                self.apply_on_hit_statuses(source, defender);
            }
            if !options.flags.contains(DamageFlags::NO_REFLECT) {
                self.reflect(defender, source, dealt);
            }
            if !options.flags.contains(DamageFlags::NO_PROCS) {
                self.lifesteal(source, dealt);
            }
        }

        if lethal {
            self.kill_unit(defender, attacker);
        }

        HitReport {
            dealt,
            absorbed,
            evaded: false,
            crit,
            killed: lethal,
        }
    }

    fn register_miss(&mut self, attacker: Option<UnitId>, defender: UnitId) -> HitReport {
        tracing::trace!(defender = %defender, "attack evaded");
        self.emit(BattleEvent::Evaded {
            source: attacker,
            target: defender,
        });
        // Misses feed the defender even for no-rage actions.
        let gain = self.env.config.rage.defender_gain_on_miss;
        self.grant_rage(defender, gain);
        HitReport::evaded()
    }

    /// Per-hit rage for an attacker, honoring the AI profile on the enemy side.
    fn attacker_rage_gain(&self, attacker: UnitId) -> u32 {
        let rules = &self.env.config.rage;
        match self.state.unit(attacker).map(|u| u.side) {
            Some(Side::Ally) => rules.ally_gain_per_hit,
            Some(Side::Enemy) => self
                .env
                .config
                .ai_profile()
                .map_or(rules.enemy_gain_per_hit, |profile| profile.rage_gain),
            None => 0,
        }
    }

    pub(super) fn grant_rage(&mut self, unit: UnitId, amount: u32) {
        if amount == 0 {
            return;
        }
        let Some(target) = self.state.unit_mut(unit).filter(|u| u.is_alive()) else {
            return;
        };
        let gained = target.gain_rage(amount);
        if gained > 0 {
            self.emit(BattleEvent::RageGained {
                target: unit,
                amount: gained,
            });
        }
    }

    fn apply_on_hit_statuses(&mut self, attacker: UnitId, defender: UnitId) {
        let Some(mods) = self.state.unit(attacker).map(|u| u.mods) else {
            return;
        };
        if mods.burn_on_hit > 0 {
            self.apply_status(
                Some(attacker),
                defender,
                StatusKind::Burn,
                f64::from(mods.burn_on_hit),
                mods.on_hit_turns,
            );
        }
        if mods.poison_on_hit > 0 {
            self.apply_status(
                Some(attacker),
                defender,
                StatusKind::Poison,
                f64::from(mods.poison_on_hit),
                mods.on_hit_turns,
            );
        }
    }

    /// Returns a share of `dealt` to the attacker as unreflectable true damage.
    fn reflect(&mut self, defender: UnitId, attacker: UnitId, dealt: u32) {
        let pct = self
            .state
            .unit(defender)
            .map_or(0.0, |d| d.statuses.magnitude(StatusKind::Reflect));
        if pct <= 0.0 {
            return;
        }
        let amount = (f64::from(dealt) * pct).round().max(1.0);
        let raw = if amount >= f64::from(i32::MAX) {
            i32::MAX
        } else {
            amount as i32
        };
        self.resolve_damage(
            Some(defender),
            attacker,
            raw,
            DamageType::True,
            DamageOptions::new(DamageFlags::REFLECTED),
        );
    }

    fn lifesteal(&mut self, attacker: UnitId, dealt: u32) {
        let fraction = self.state.unit(attacker).map_or(0.0, |a| a.mods.lifesteal);
        if fraction <= 0.0 {
            return;
        }
        let amount = (f64::from(dealt) * fraction).round() as u32;
        self.heal(attacker, amount);
    }

    pub(super) fn heal(&mut self, unit: UnitId, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let healed = self.state.unit_mut(unit).map_or(0, |u| u.heal(amount));
        if healed > 0 {
            self.emit(BattleEvent::Healed {
                target: unit,
                amount: healed,
            });
        }
        healed
    }

    /// Applies a status through the ledger and reports the result.
    ///
    /// `Taunt` locks the target onto `source`.
    pub fn apply_status(
        &mut self,
        source: Option<UnitId>,
        target: UnitId,
        kind: StatusKind,
        magnitude: f64,
        turns: u32,
    ) -> ApplyOutcome {
        let Some(unit) = self.state.unit_mut(target).filter(|u| u.is_alive()) else {
            return ApplyOutcome::Ignored;
        };
        let outcome = match (kind, source) {
            (StatusKind::Taunt, Some(taunter)) => unit.statuses.apply_taunt(taunter, turns),
            (StatusKind::Taunt, None) => ApplyOutcome::Ignored,
            _ => unit.statuses.apply(kind, magnitude, turns),
        };
        match outcome {
            ApplyOutcome::Added | ApplyOutcome::Merged => self.emit(BattleEvent::StatusApplied {
                source,
                target,
                kind,
                magnitude,
                turns,
            }),
            ApplyOutcome::Resisted => self.emit(BattleEvent::StatusResisted { target, kind }),
            ApplyOutcome::Ignored => {}
        }
        outcome
    }

    /// Marks a unit dead and refreshes the presentation speed multiplier.
    fn kill_unit(&mut self, unit: UnitId, killer: Option<UnitId>) {
        let Some(target) = self.state.unit_mut(unit) else {
            return;
        };
        target.kill();
        tracing::debug!(unit = %unit, killer = ?killer, "unit died");
        self.emit(BattleEvent::UnitDied { unit, killer });

        let multiplier = self.state.current_speed_multiplier(self.env.config);
        if (multiplier - self.state.speed_multiplier).abs() > f64::EPSILON {
            self.state.speed_multiplier = multiplier;
            self.emit(BattleEvent::SpeedMultiplierChanged { multiplier });
        }
    }
}
