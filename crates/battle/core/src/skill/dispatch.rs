//! Declarative handler table.
//!
//! Each [`EffectTag`] maps to an ordered list of phases; a phase selects its
//! targets once and applies its steps to each of them in order. The engine
//! interprets the table, so adding a behavior is a data change here plus, at
//! most, a new [`EffectStep`].

use crate::skill::{EffectTag, TargetSelector};
use crate::state::StatusKind;

/// One effect applied to every target of a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectStep {
    /// First hit of the skill formula, with the skill's damage type.
    Damage,
    /// Second hit component of a two-hit skill.
    SecondHit,
    /// Full formula scaled by `splash_rate`.
    SplashDamage,
    /// Full formula as true damage.
    TrueDamage,
    /// Extra hit from `echo_base` / `echo_scale`.
    Echo,
    /// Heals the caster by `lifesteal` of the damage this target took.
    Lifesteal,
    /// Hostile status, rolled against its chance.
    Inflict(StatusKind),
    /// Friendly status, always applied.
    Buff(StatusKind),
    /// Locks the target onto the caster.
    Taunt,
    Knockback,
    Heal,
    Shield,
    Cleanse,
    GrantRage,
    /// Physical hit from the first other living ally in the caster's row,
    /// `assist_rate` of that ally's attack.
    Assist,
}

/// Target selection followed by the steps applied to each target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Phase {
    pub selector: TargetSelector,
    pub steps: &'static [EffectStep],
}

/// Phases of one effect tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillHandler {
    pub phases: &'static [Phase],
}

impl SkillHandler {
    /// True when any phase deals damage.
    pub fn deals_damage(&self) -> bool {
        self.phases.iter().flat_map(|p| p.steps).any(|step| {
            matches!(
                step,
                EffectStep::Damage
                    | EffectStep::SecondHit
                    | EffectStep::SplashDamage
                    | EffectStep::TrueDamage
                    | EffectStep::Echo
                    | EffectStep::Assist
            )
        })
    }
}

use EffectStep as S;
use StatusKind as K;
use TargetSelector as T;

/// Returns the handler for `tag`.
pub const fn handler(tag: EffectTag) -> SkillHandler {
    let phases: &'static [Phase] = match tag {
        EffectTag::SingleBurst | EffectTag::SingleBurstArmorPen | EffectTag::SniperCrit => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage],
        }],
        EffectTag::DoubleHit | EffectTag::DoubleHitGoldReward => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::SecondHit],
        }],
        EffectTag::SingleBurstLifesteal => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Lifesteal],
        }],
        EffectTag::SingleDelayedEcho => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Echo],
        }],
        EffectTag::SingleSleep => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::Sleep)],
        }],
        EffectTag::SingleArmorBreak => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::ArmorBreak)],
        }],
        EffectTag::SingleSilenceLock => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::Silence)],
        }],
        EffectTag::SinglePoisonStack => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::Poison)],
        }],
        EffectTag::SingleBleed => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::Bleed)],
        }],
        EffectTag::SingleBurn => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::Burn)],
        }],
        EffectTag::TrueSingle => &[Phase {
            selector: T::Primary,
            steps: &[S::TrueDamage],
        }],
        EffectTag::DamageStun => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Inflict(K::Stun)],
        }],
        EffectTag::KnockbackCharge => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Knockback],
        }],
        EffectTag::LifestealDisease => &[Phase {
            selector: T::Primary,
            steps: &[S::Damage, S::Lifesteal, S::Inflict(K::Disease)],
        }],
        EffectTag::AssassinExecuteRageRefund => &[Phase {
            selector: T::Backline,
            steps: &[S::Damage],
        }],
        EffectTag::AssassinBackstab => &[Phase {
            selector: T::Backline,
            steps: &[S::Damage, S::Inflict(K::Bleed)],
        }],
        EffectTag::BeakDisarm => &[Phase {
            selector: T::TopAttack,
            steps: &[S::Damage, S::Inflict(K::Disarm)],
        }],
        EffectTag::DamageShieldTaunt => &[
            Phase {
                selector: T::Primary,
                steps: &[S::Damage],
            },
            Phase {
                selector: T::Caster,
                steps: &[S::Shield],
            },
            Phase {
                selector: T::AllEnemies,
                steps: &[S::Taunt],
            },
        ],
        EffectTag::DamageShieldReflect => &[
            Phase {
                selector: T::Primary,
                steps: &[S::Damage],
            },
            Phase {
                selector: T::Caster,
                steps: &[S::Shield, S::Buff(K::Reflect)],
            },
        ],
        EffectTag::SelfShieldImmune => &[Phase {
            selector: T::Caster,
            steps: &[S::Shield, S::Buff(K::Immune)],
        }],
        EffectTag::PangolinReflect => &[Phase {
            selector: T::Caster,
            steps: &[S::Buff(K::Reflect), S::Buff(K::DefBuff)],
        }],
        EffectTag::SelfAtkAndAssist => &[
            Phase {
                selector: T::Caster,
                steps: &[S::Buff(K::AtkBuff)],
            },
            Phase {
                selector: T::Primary,
                steps: &[S::Damage, S::Assist],
            },
        ],
        EffectTag::AllyRowDefBuff => &[Phase {
            selector: T::CasterRow,
            steps: &[S::Buff(K::DefBuff), S::Buff(K::MdefBuff)],
        }],
        EffectTag::TeamDefBuff => &[Phase {
            selector: T::AllAllies,
            steps: &[S::Buff(K::DefBuff)],
        }],
        EffectTag::TeamEvadeBuff => &[Phase {
            selector: T::AllAllies,
            steps: &[S::Buff(K::EvadeBuff)],
        }],
        EffectTag::TeamAtkBuff => &[Phase {
            selector: T::AllAllies,
            steps: &[S::Buff(K::AtkBuff)],
        }],
        EffectTag::TeamShield => &[Phase {
            selector: T::AllAllies,
            steps: &[S::Shield],
        }],
        EffectTag::TeamRage => &[Phase {
            selector: T::NearestAllies,
            steps: &[S::GrantRage],
        }],
        EffectTag::ColumnBless => &[Phase {
            selector: T::CasterColumn,
            steps: &[S::Buff(K::AtkBuff), S::Buff(K::EvadeBuff)],
        }],
        EffectTag::DualHeal => &[Phase {
            selector: T::LowestHpAllies,
            steps: &[S::Heal],
        }],
        EffectTag::ShieldCleanse => &[Phase {
            selector: T::LowestHpAllies,
            steps: &[S::Shield, S::Cleanse],
        }],
        EffectTag::CrossFive => &[Phase {
            selector: T::Cross,
            steps: &[S::Damage],
        }],
        EffectTag::RowMulti => &[Phase {
            selector: T::Row,
            steps: &[S::Damage],
        }],
        EffectTag::RowCleave => &[Phase {
            selector: T::Row,
            steps: &[S::Damage, S::Inflict(K::ArmorBreak)],
        }],
        EffectTag::ColumnFreeze => &[Phase {
            selector: T::Column,
            steps: &[S::Damage, S::Inflict(K::Freeze)],
        }],
        EffectTag::ColumnBleed => &[Phase {
            selector: T::Column,
            steps: &[S::Damage, S::Inflict(K::Bleed)],
        }],
        EffectTag::ColumnPlusSplash => &[
            Phase {
                selector: T::Column,
                steps: &[S::Damage],
            },
            Phase {
                selector: T::AdjacentColumns,
                steps: &[S::SplashDamage],
            },
        ],
        EffectTag::AoeCircle => &[Phase {
            selector: T::Square,
            steps: &[S::Damage],
        }],
        EffectTag::AoePoison => &[Phase {
            selector: T::Square,
            steps: &[S::Damage, S::Inflict(K::Poison)],
        }],
        EffectTag::ConeSmash => &[Phase {
            selector: T::Square,
            steps: &[S::Damage],
        }],
        EffectTag::ConeShot => &[Phase {
            selector: T::Cone,
            steps: &[S::Damage],
        }],
        EffectTag::FireBreathCone => &[Phase {
            selector: T::Cone,
            steps: &[S::Damage, S::Inflict(K::Burn)],
        }],
        EffectTag::RandomMulti | EffectTag::ArrowRain => &[Phase {
            selector: T::RandomEnemies,
            steps: &[S::Damage],
        }],
        EffectTag::ChainShock => &[Phase {
            selector: T::RandomEnemies,
            steps: &[S::Damage, S::Inflict(K::Stun)],
        }],
        EffectTag::GlobalStun => &[Phase {
            selector: T::AllEnemies,
            steps: &[S::Damage, S::Inflict(K::Stun)],
        }],
        EffectTag::GlobalPoisonTeam => &[Phase {
            selector: T::AllEnemies,
            steps: &[S::Inflict(K::Poison)],
        }],
        EffectTag::GlobalKnockback => &[Phase {
            selector: T::AllEnemies,
            steps: &[S::Damage, S::Knockback],
        }],
        EffectTag::GlobalDebuffAtk => &[Phase {
            selector: T::AllEnemies,
            steps: &[S::Inflict(K::AtkDebuff)],
        }],
        EffectTag::GlobalEvadeDebuff => &[Phase {
            selector: T::AllEnemies,
            steps: &[S::Inflict(K::EvadeDebuff)],
        }],
    };
    SkillHandler { phases }
}
