//! Combat units and the roster specs they are built from.

use std::fmt;

use crate::config::{AiProfile, BattleConfig};
use crate::state::migrate::PersistedStatuses;
use crate::state::status::{StatusKind, StatusLedger};
use crate::traits::{Role, Side, Tribe};

/// Stable identifier of a unit within one battle.
///
/// Ids are dense indices into the battle roster, assigned ally side first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell on the battlefield grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub const fn manhattan(self, other: Self) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    pub fn chebyshev(self, other: Self) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Base combat stats at star 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub matk: u32,
    pub mdef: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_range"))]
    pub range: u32,
    pub rage_max: u32,
}

#[cfg(feature = "serde")]
fn default_range() -> u32 {
    1
}

impl BaseStats {
    /// Applies the star multiplier to HP and the four combat stats.
    ///
    /// Range and rage are never scaled.
    pub fn scaled(&self, star: u8) -> Self {
        let mult = BattleConfig::star_stat_multiplier(star);
        Self {
            hp: scale(self.hp, mult),
            atk: scale(self.atk, mult),
            def: scale(self.def, mult),
            matk: scale(self.matk, mult),
            mdef: scale(self.mdef, mult),
            range: self.range,
            rage_max: self.rage_max,
        }
    }
}

fn scale(value: u32, mult: f64) -> u32 {
    (f64::from(value) * mult).round().max(0.0) as u32
}

/// Per-unit modifiers supplied by the roster collaborator (synergies, items).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitMods {
    /// Base evasion as a fraction.
    pub evasion: f64,
    pub accuracy: f64,
    /// Crit chance override; `None` uses the configured default.
    pub crit_chance: Option<f64>,
    pub lifesteal: f64,
    /// Burn damage per turn applied on each connecting hit.
    pub burn_on_hit: u32,
    pub poison_on_hit: u32,
    pub on_hit_turns: u32,
    pub start_shield: u32,
}

impl Default for UnitMods {
    fn default() -> Self {
        Self {
            evasion: 0.0,
            accuracy: BattleConfig::DEFAULT_ACCURACY,
            crit_chance: None,
            lifesteal: 0.0,
            burn_on_hit: 0,
            poison_on_hit: 0,
            on_hit_turns: 2,
            start_shield: 0,
        }
    }
}

/// Roster entry describing one unit to deploy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    /// Template id, e.g. `bear_ancient`.
    pub template: String,
    pub name: String,
    pub role: Role,
    pub tribe: Tribe,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default = "default_star"))]
    pub star: u8,
    pub skill: String,
    pub position: GridPos,
    #[cfg_attr(feature = "serde", serde(default = "default_speed"))]
    pub speed: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mods: UnitMods,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: PersistedStatuses,
}

#[cfg(feature = "serde")]
fn default_star() -> u8 {
    1
}

#[cfg(feature = "serde")]
fn default_speed() -> u32 {
    BattleConfig::DEFAULT_SPEED
}

impl UnitSpec {
    /// Minimal spec used by tests and tools; stats default to a sturdy fighter.
    pub fn new(template: impl Into<String>, role: Role, tribe: Tribe, position: GridPos) -> Self {
        let template = template.into();
        Self {
            name: template.clone(),
            template,
            role,
            tribe,
            stats: BaseStats {
                hp: 200,
                atk: 40,
                def: 20,
                matk: 20,
                mdef: 20,
                range: 1,
                rage_max: 3,
            },
            star: 1,
            skill: String::new(),
            position,
            speed: BattleConfig::DEFAULT_SPEED,
            mods: UnitMods::default(),
            statuses: PersistedStatuses::default(),
        }
    }

    pub fn with_stats(mut self, stats: BaseStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = skill.into();
        self
    }

    pub fn with_star(mut self, star: u8) -> Self {
        self.star = star;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_mods(mut self, mods: UnitMods) -> Self {
        self.mods = mods;
        self
    }
}

/// One deployed creature instance for the lifetime of a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatUnit {
    pub id: UnitId,
    pub template: String,
    pub name: String,
    pub side: Side,
    pub role: Role,
    pub tribe: Tribe,
    pub star: u8,
    /// Skill id after star variants are resolved.
    pub skill: String,
    pub pos: GridPos,

    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub matk: u32,
    pub mdef: u32,
    pub range: u32,
    pub rage: u32,
    pub rage_max: u32,
    pub shield: u32,
    pub speed: u32,
    pub mods: UnitMods,

    pub statuses: StatusLedger,
    pub alive: bool,
}

impl CombatUnit {
    /// Builds a unit from its spec, applying star scaling and the AI profile.
    pub fn from_spec(
        id: UnitId,
        side: Side,
        spec: &UnitSpec,
        skill: String,
        ai: Option<&AiProfile>,
    ) -> Self {
        let stats = spec.stats.scaled(spec.star);
        let (hp, atk, matk) = match ai {
            Some(profile) => (
                scale(stats.hp, profile.hp_mult).max(1),
                scale(stats.atk, profile.atk_mult),
                scale(stats.matk, profile.matk_mult),
            ),
            None => (stats.hp.max(1), stats.atk, stats.matk),
        };

        Self {
            id,
            template: spec.template.clone(),
            name: spec.name.clone(),
            side,
            role: spec.role,
            tribe: spec.tribe,
            star: spec.star,
            skill,
            pos: spec.position,
            hp,
            max_hp: hp,
            atk,
            def: stats.def,
            matk,
            mdef: stats.mdef,
            range: stats.range,
            rage: 0,
            rage_max: stats.rage_max,
            shield: spec.mods.start_shield,
            speed: spec.speed,
            mods: spec.mods,
            statuses: spec.statuses.to_ledger(),
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive && self.hp > 0
    }

    /// `max(1, atk + atk_buff - atk_debuff)`
    pub fn effective_atk(&self) -> u32 {
        let value = f64::from(self.atk) + self.statuses.magnitude(StatusKind::AtkBuff)
            - self.statuses.magnitude(StatusKind::AtkDebuff);
        value.round().max(1.0) as u32
    }

    /// Magic attack is never debuffed; floored at 1.
    pub fn effective_matk(&self) -> u32 {
        self.matk.max(1)
    }

    /// `max(0, def + def_buff - armor_break)`
    pub fn effective_def(&self) -> f64 {
        (f64::from(self.def) + self.statuses.magnitude(StatusKind::DefBuff)
            - self.statuses.magnitude(StatusKind::ArmorBreak))
        .max(0.0)
    }

    /// `max(0, mdef + mdef_buff)`
    pub fn effective_mdef(&self) -> f64 {
        (f64::from(self.mdef) + self.statuses.magnitude(StatusKind::MdefBuff)).max(0.0)
    }

    /// Evasion after buffs and debuffs, clamped to `[0, MAX_EVASION]`.
    pub fn effective_evasion(&self) -> f64 {
        let raw = self.mods.evasion + self.statuses.magnitude(StatusKind::EvadeBuff)
            - self.statuses.magnitude(StatusKind::EvadeDebuff);
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, BattleConfig::MAX_EVASION)
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    /// Adds rage, clamped to `rage_max`. Returns the amount actually gained.
    pub fn gain_rage(&mut self, amount: u32) -> u32 {
        let before = self.rage;
        self.rage = self.rage.saturating_add(amount).min(self.rage_max);
        self.rage - before
    }

    /// Heals up to `max_hp`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    pub fn rage_full(&self) -> bool {
        self.rage_max > 0 && self.rage >= self.rage_max
    }

    /// Marks the unit dead, zeroing HP and shield.
    pub fn kill(&mut self) {
        self.hp = 0;
        self.shield = 0;
        self.alive = false;
    }
}
