//! Skill definitions and the validated skill catalog.
//!
//! A skill is pure data: an [`EffectTag`] naming its behavior plus the numeric
//! parameters that behavior reads. The catalog is built once at load time; any
//! unknown tag or unusable parameter is rejected there, so dispatch during a
//! battle can never fail.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::combat::DamageType;
use crate::error::{BattleError, ErrorSeverity};
use crate::skill::dispatch::{EffectStep, handler};
use crate::state::{CombatUnit, StatusKind};
use crate::traits::Role;

/// Closed set of skill behaviors.
///
/// Several tags share a handler and differ only in their data (e.g. `cone_shot`
/// and `cone_smash`); they are kept distinct so content stays self-describing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectTag {
    // Single target
    SingleBurst,
    DoubleHit,
    SingleBurstLifesteal,
    SingleBurstArmorPen,
    SingleDelayedEcho,
    SingleSleep,
    SingleArmorBreak,
    SingleSilenceLock,
    SinglePoisonStack,
    SingleBleed,
    SingleBurn,
    TrueSingle,
    DamageStun,
    SniperCrit,
    KnockbackCharge,
    LifestealDisease,
    DoubleHitGoldReward,

    // Backline
    AssassinExecuteRageRefund,
    AssassinBackstab,

    // Ranked
    BeakDisarm,

    // Self and allies
    DamageShieldTaunt,
    DamageShieldReflect,
    SelfShieldImmune,
    PangolinReflect,
    SelfAtkAndAssist,
    AllyRowDefBuff,
    TeamDefBuff,
    TeamEvadeBuff,
    TeamAtkBuff,
    TeamShield,
    TeamRage,
    ColumnBless,
    DualHeal,
    ShieldCleanse,

    // Area
    #[strum(serialize = "cross_5")]
    #[cfg_attr(feature = "serde", serde(rename = "cross_5"))]
    CrossFive,
    RowMulti,
    RowCleave,
    ColumnFreeze,
    ColumnBleed,
    ColumnPlusSplash,
    AoeCircle,
    AoePoison,
    ConeSmash,
    ConeShot,
    FireBreathCone,

    // Random
    RandomMulti,
    ArrowRain,
    ChainShock,

    // Global
    GlobalStun,
    GlobalPoisonTeam,
    GlobalKnockback,
    GlobalDebuffAtk,
    GlobalEvadeDebuff,
}

/// Movement pattern the presentation layer uses when animating an action.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionPattern {
    /// Cast in place on self or allies.
    #[cfg_attr(feature = "serde", serde(alias = "SELF"))]
    SelfCast,
    /// Dash to the cell in front of the target.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "MELEE_FRONT"))]
    MeleeFront,
    /// Fire from the home cell.
    #[cfg_attr(feature = "serde", serde(alias = "RANGED_STATIC"))]
    RangedStatic,
    /// Dash behind the target.
    #[cfg_attr(feature = "serde", serde(alias = "ASSASSIN_BACK"))]
    AssassinBack,
}

impl ActionPattern {
    /// Pattern for a basic attack by a unit with the given role and range.
    pub const fn for_basic(role: Role, range: u32) -> Self {
        if range >= 2 {
            Self::RangedStatic
        } else if matches!(role, Role::Assassin) {
            Self::AssassinBack
        } else {
            Self::MeleeFront
        }
    }
}

/// Stat a skill formula scales from.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScaleStat {
    #[default]
    Atk,
    Matk,
    Def,
}

impl ScaleStat {
    /// Reads the scaling stat from a unit's effective stats.
    pub fn read(self, unit: &CombatUnit) -> u32 {
        match self {
            Self::Atk => unit.effective_atk(),
            Self::Matk => unit.effective_matk(),
            Self::Def => unit.effective_def().round() as u32,
        }
    }
}

/// One independently scaled hit of a formula.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitComponent {
    pub base: f64,
    pub scale: f64,
}

/// Numeric parameters read by effect handlers. Unused fields stay at defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillParams {
    // ----- damage formula -----
    pub base: f64,
    pub scale: f64,
    pub scale_stat: ScaleStat,
    /// Second hit for two-hit skills.
    pub hit2: Option<HitComponent>,
    pub armor_pen: f64,
    pub echo_base: f64,
    pub echo_scale: f64,
    pub splash_rate: f64,
    pub lifesteal: f64,
    /// Damaging steps cannot be evaded.
    pub skip_evasion: bool,
    /// Fraction of a same-row ally's attack dealt as an assist hit.
    pub assist_rate: f64,

    // ----- target counts -----
    /// Hits for row/random selectors; 0 means every eligible target.
    pub max_hits: u32,
    /// Targets for ranked and ally selectors; 0 means one.
    pub max_targets: u32,
    /// Extra hits/targets per star above 1.
    pub targets_per_star: u32,
    /// Square radius and cone depth.
    pub radius: i32,
    /// Widen the square by one at star 3.
    pub star_radius_bonus: bool,

    // ----- statuses -----
    /// Generic duration for statuses without a dedicated field.
    pub turns: u32,
    pub stun_chance: f64,
    pub stun_turns: u32,
    pub freeze_chance: f64,
    pub freeze_turns: u32,
    pub sleep_chance: f64,
    pub sleep_turns: u32,
    pub poison_per_turn: f64,
    pub poison_turns: u32,
    pub burn_per_turn: f64,
    pub burn_turns: u32,
    /// Bleed per turn as a fraction of the caster's attack.
    pub bleed_pct: f64,
    pub bleed_turns: u32,
    pub disease_damage: f64,
    pub disease_turns: u32,
    pub armor_break: f64,
    pub atk_debuff: f64,
    pub evade_debuff: f64,
    pub atk_buff: f64,
    pub def_buff: f64,
    pub mdef_buff: f64,
    pub evade_buff: f64,
    pub reflect_pct: f64,
    pub reflect_turns: u32,

    // ----- support -----
    pub shield_base: f64,
    pub shield_scale: f64,
    pub shield_scale_stat: ScaleStat,
    pub heal_base: f64,
    pub heal_scale: f64,
    pub rage_gain: u32,

    // ----- kill bonus -----
    /// Fraction of rage_max refunded per kill.
    pub kill_rage: f64,
    /// Currency awarded to the ally side per kill.
    pub kill_gold: u32,
    /// One extra basic attack after the first kill of a cast.
    pub kill_follow_up: bool,
}

impl Default for SkillParams {
    fn default() -> Self {
        Self {
            base: 0.0,
            scale: 0.0,
            scale_stat: ScaleStat::Atk,
            hit2: None,
            armor_pen: 0.0,
            echo_base: 0.0,
            echo_scale: 0.0,
            splash_rate: 0.5,
            lifesteal: 0.0,
            skip_evasion: false,
            assist_rate: 0.0,
            max_hits: 0,
            max_targets: 0,
            targets_per_star: 0,
            radius: 1,
            star_radius_bonus: false,
            turns: 0,
            stun_chance: 1.0,
            stun_turns: 0,
            freeze_chance: 1.0,
            freeze_turns: 0,
            sleep_chance: 1.0,
            sleep_turns: 0,
            poison_per_turn: 0.0,
            poison_turns: 0,
            burn_per_turn: 0.0,
            burn_turns: 0,
            bleed_pct: 0.0,
            bleed_turns: 0,
            disease_damage: 0.0,
            disease_turns: 0,
            armor_break: 0.0,
            atk_debuff: 0.0,
            evade_debuff: 0.0,
            atk_buff: 0.0,
            def_buff: 0.0,
            mdef_buff: 0.0,
            evade_buff: 0.0,
            reflect_pct: 0.0,
            reflect_turns: 0,
            shield_base: 0.0,
            shield_scale: 0.0,
            shield_scale_stat: ScaleStat::Atk,
            heal_base: 0.0,
            heal_scale: 0.0,
            rage_gain: 0,
            kill_rage: 0.0,
            kill_gold: 0,
            kill_follow_up: false,
        }
    }
}

/// Magnitude, duration, and chance for one status application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusSpec {
    pub magnitude: f64,
    pub turns: u32,
    pub chance: f64,
}

impl SkillParams {
    /// Resolves the parameters for applying `kind`, reading caster stats where
    /// the magnitude depends on them.
    pub fn status_spec(&self, kind: StatusKind, caster_atk: u32) -> StatusSpec {
        use StatusKind::*;
        let (magnitude, turns, chance) = match kind {
            Stun => (1.0, self.stun_turns, self.stun_chance),
            Freeze => (1.0, self.freeze_turns, self.freeze_chance),
            Sleep => (1.0, self.sleep_turns, self.sleep_chance),
            Silence | Disarm | Immune | Taunt => (1.0, self.turns, 1.0),
            Poison => (self.poison_per_turn, self.poison_turns, 1.0),
            Burn => (self.burn_per_turn, self.burn_turns, 1.0),
            Bleed => (
                (f64::from(caster_atk) * self.bleed_pct).round(),
                self.bleed_turns,
                1.0,
            ),
            Disease => (self.disease_damage, self.disease_turns, 1.0),
            ArmorBreak => (self.armor_break, self.turns, 1.0),
            AtkDebuff => (self.atk_debuff, self.turns, 1.0),
            EvadeDebuff => (self.evade_debuff, self.turns, 1.0),
            AtkBuff => (self.atk_buff, self.turns, 1.0),
            DefBuff => (self.def_buff, self.turns, 1.0),
            MdefBuff => (self.mdef_buff, self.turns, 1.0),
            EvadeBuff => (self.evade_buff, self.turns, 1.0),
            Reflect => (self.reflect_pct, self.reflect_turns, 1.0),
        };
        StatusSpec {
            magnitude,
            turns,
            chance,
        }
    }

    pub fn has_kill_bonus(&self) -> bool {
        self.kill_rage > 0.0 || self.kill_gold > 0 || self.kill_follow_up
    }
}

/// A validated skill definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub effect: EffectTag,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern: ActionPattern,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: SkillParams,
}

/// Skill definition as authored in content files, before tag validation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRecord {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub effect: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern: ActionPattern,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: SkillParams,
}

impl TryFrom<SkillRecord> for SkillDef {
    type Error = CatalogError;

    fn try_from(record: SkillRecord) -> Result<Self, Self::Error> {
        let effect =
            EffectTag::from_str(&record.effect).map_err(|_| CatalogError::UnknownEffectTag {
                skill: record.id.clone(),
                tag: record.effect.clone(),
            })?;
        let name = if record.name.is_empty() {
            record.id.clone()
        } else {
            record.name
        };
        Ok(Self {
            id: record.id,
            name,
            effect,
            pattern: record.pattern,
            damage_type: record.damage_type,
            params: record.params,
        })
    }
}

/// Errors raised while building a [`SkillCatalog`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("skill '{skill}' uses unknown effect tag '{tag}'")]
    UnknownEffectTag { skill: String, tag: String },

    #[error("skill '{skill}' is defined more than once")]
    DuplicateSkill { skill: String },

    #[error("skill '{skill}' has invalid parameter '{param}': {reason}")]
    InvalidParameter {
        skill: String,
        param: &'static str,
        reason: &'static str,
    },
}

impl BattleError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffectTag { .. } => "CATALOG_UNKNOWN_EFFECT_TAG",
            Self::DuplicateSkill { .. } => "CATALOG_DUPLICATE_SKILL",
            Self::InvalidParameter { .. } => "CATALOG_INVALID_PARAMETER",
        }
    }
}

/// Suffix of the upgraded skill assassins use from star 2.
pub const ASSASSIN_UPGRADE_SUFFIX: &str = "_v2";

/// Validated skill lookup table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillCatalog {
    skills: BTreeMap<String, SkillDef>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, validating every definition.
    pub fn from_defs(defs: impl IntoIterator<Item = SkillDef>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(def)?;
        }
        Ok(catalog)
    }

    /// Builds a catalog from authored records, rejecting unknown tags.
    pub fn from_records(
        records: impl IntoIterator<Item = SkillRecord>,
    ) -> Result<Self, CatalogError> {
        let defs = records
            .into_iter()
            .map(SkillDef::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_defs(defs)
    }

    /// Validates and adds one definition.
    pub fn insert(&mut self, def: SkillDef) -> Result<(), CatalogError> {
        validate(&def)?;
        if self.skills.contains_key(&def.id) {
            return Err(CatalogError::DuplicateSkill { skill: def.id });
        }
        self.skills.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    /// Looks up the skill a unit actually casts.
    ///
    /// Assassins at star 2 or higher use `<id>_v2` when it exists.
    pub fn resolve_for(&self, id: &str, role: Role, star: u8) -> Option<&SkillDef> {
        if role == Role::Assassin && star >= 2 {
            let upgraded = format!("{id}{ASSASSIN_UPGRADE_SUFFIX}");
            if let Some(def) = self.skills.get(&upgraded) {
                return Some(def);
            }
        }
        self.skills.get(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDef> {
        self.skills.values()
    }
}

fn invalid(def: &SkillDef, param: &'static str, reason: &'static str) -> CatalogError {
    CatalogError::InvalidParameter {
        skill: def.id.clone(),
        param,
        reason,
    }
}

fn check_fraction(def: &SkillDef, param: &'static str, value: f64) -> Result<(), CatalogError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(def, param, "must be within [0, 1]"));
    }
    Ok(())
}

fn check_non_negative(def: &SkillDef, param: &'static str, value: f64) -> Result<(), CatalogError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(def, param, "must be a finite non-negative number"));
    }
    Ok(())
}

/// Rejects definitions whose handler could not do anything useful.
fn validate(def: &SkillDef) -> Result<(), CatalogError> {
    let p = &def.params;
    if def.id.is_empty() {
        return Err(invalid(def, "id", "must not be empty"));
    }

    check_fraction(def, "armor_pen", p.armor_pen)?;
    check_fraction(def, "stun_chance", p.stun_chance)?;
    check_fraction(def, "freeze_chance", p.freeze_chance)?;
    check_fraction(def, "sleep_chance", p.sleep_chance)?;
    check_fraction(def, "kill_rage", p.kill_rage)?;
    for (name, value) in [
        ("base", p.base),
        ("scale", p.scale),
        ("lifesteal", p.lifesteal),
        ("splash_rate", p.splash_rate),
        ("reflect_pct", p.reflect_pct),
        ("bleed_pct", p.bleed_pct),
        ("assist_rate", p.assist_rate),
    ] {
        check_non_negative(def, name, value)?;
    }
    if p.radius < 0 {
        return Err(invalid(def, "radius", "must not be negative"));
    }

    for phase in handler(def.effect).phases {
        for step in phase.steps {
            match step {
                EffectStep::Inflict(kind) | EffectStep::Buff(kind) => {
                    if p.status_spec(*kind, 0).turns == 0 {
                        return Err(invalid(def, "turns", "status effect needs a duration"));
                    }
                }
                EffectStep::Taunt if p.turns == 0 => {
                    return Err(invalid(def, "turns", "taunt needs a duration"));
                }
                EffectStep::SecondHit if p.hit2.is_none() => {
                    return Err(invalid(def, "hit2", "two-hit skill needs a second hit"));
                }
                EffectStep::Assist if p.assist_rate <= 0.0 => {
                    return Err(invalid(def, "assist_rate", "assist skill needs an assist rate"));
                }
                _ => {}
            }
        }
    }
    Ok(())
}
