//! Battle configuration constants and tunable parameters.
//!
//! Compile-time constants size fixed-capacity containers and fix the star
//! tables. Everything else is a runtime knob with a default, deserializable
//! from TOML by the content crate; absent fields fall back to the defaults.

use crate::traits::{Difficulty, Tribe};

/// Battle configuration consumed (never owned) by the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub board: BoardDimensions,
    /// Hard ceiling on resolved actions.
    pub turn_cap: u32,
    pub cap_resolution: CapResolution,
    pub rage: RageRules,
    pub basic_attack: BasicAttackRules,
    pub crit: CritRules,
    pub death_match: DeathMatchRules,
    pub speed: SpeedScaling,
    pub legacy: LegacyConversion,
    pub elemental: ElementalTable,
    /// AI difficulty for the enemy side. `None` disables AI scaling.
    pub difficulty: Option<Difficulty>,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of distinct status kinds tracked per unit.
    pub const MAX_STATUS_EFFECTS: usize = 20;
    /// Maximum number of hit components a skill formula can have.
    pub const MAX_SKILL_HITS: usize = 2;

    // ===== star tables (index = star - 1) =====
    pub const STAR_STAT_MULTIPLIERS: [f64; 3] = [1.0, 1.6, 2.5];
    pub const STAR_SKILL_MULTIPLIERS: [f64; 3] = [1.0, 1.2, 1.4];
    pub const MAX_STAR: u8 = 3;

    // ===== hit roll =====
    /// Evasion is clamped to `[0, MAX_EVASION]` before any hit roll.
    pub const MAX_EVASION: f64 = 0.6;
    pub const MIN_HIT_CHANCE: f64 = 0.10;
    pub const DEFAULT_ACCURACY: f64 = 0.95;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TURN_CAP: u32 = 240;
    pub const DEFAULT_SPEED: u32 = 100;

    pub fn new() -> Self {
        Self {
            board: BoardDimensions::default(),
            turn_cap: Self::DEFAULT_TURN_CAP,
            cap_resolution: CapResolution::default(),
            rage: RageRules::default(),
            basic_attack: BasicAttackRules::default(),
            crit: CritRules::default(),
            death_match: DeathMatchRules::default(),
            speed: SpeedScaling::default(),
            legacy: LegacyConversion::default(),
            elemental: ElementalTable::default(),
            difficulty: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }

    /// Returns the star stat multiplier, clamping out-of-range stars.
    pub fn star_stat_multiplier(star: u8) -> f64 {
        Self::STAR_STAT_MULTIPLIERS[Self::star_index(star)]
    }

    /// Returns the star skill multiplier, clamping out-of-range stars.
    pub fn star_skill_multiplier(star: u8) -> f64 {
        Self::STAR_SKILL_MULTIPLIERS[Self::star_index(star)]
    }

    fn star_index(star: u8) -> usize {
        usize::from(star.clamp(1, Self::MAX_STAR) - 1)
    }

    /// AI profile for the enemy side, if a difficulty is configured.
    pub fn ai_profile(&self) -> Option<AiProfile> {
        self.difficulty.map(AiProfile::for_difficulty)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid size. The ally half is the low `cols / 2` columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardDimensions {
    pub rows: i32,
    pub cols: i32,
}

impl BoardDimensions {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    /// Number of columns owned by each side.
    pub const fn half(&self) -> i32 {
        self.cols / 2
    }

    pub const fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows && col >= 0 && col < self.cols
    }
}

impl Default for BoardDimensions {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

/// How a battle that hits the turn cap is decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CapResolution {
    #[default]
    Draw,
    /// Higher total remaining HP wins; the ally side wins ties.
    HpTotal,
}

/// Rage accrual per connecting hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RageRules {
    pub ally_gain_per_hit: u32,
    /// Used when no AI difficulty is configured.
    pub enemy_gain_per_hit: u32,
    pub defender_gain_per_hit: u32,
    /// Rage the defender gains when it evades an attack.
    pub defender_gain_on_miss: u32,
}

impl Default for RageRules {
    fn default() -> Self {
        Self {
            ally_gain_per_hit: 1,
            enemy_gain_per_hit: 1,
            defender_gain_per_hit: 1,
            defender_gain_on_miss: 1,
        }
    }
}

/// Basic attack raw damage is effective attack plus a uniform integer roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BasicAttackRules {
    pub variance_min: i32,
    pub variance_max: i32,
}

impl Default for BasicAttackRules {
    fn default() -> Self {
        Self {
            variance_min: -5,
            variance_max: 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CritRules {
    /// Crit chance for units that declare none.
    pub default_chance: f64,
    pub multiplier: f64,
}

impl Default for CritRules {
    fn default() -> Self {
        Self {
            default_chance: 0.05,
            multiplier: 1.5,
        }
    }
}

/// Late-battle damage escalation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeathMatchRules {
    pub enabled: bool,
    /// Number of actions before escalation starts.
    pub start_after: u32,
    pub interval: u32,
    pub step: f64,
}

impl DeathMatchRules {
    /// Global damage multiplier after `action_count` actions.
    pub fn multiplier_at(&self, action_count: u32) -> f64 {
        if !self.enabled || self.interval == 0 || action_count <= self.start_after {
            return 1.0;
        }
        let steps = (action_count - self.start_after) / self.interval;
        1.0 + f64::from(steps) * self.step
    }
}

impl Default for DeathMatchRules {
    fn default() -> Self {
        Self {
            enabled: true,
            start_after: 100,
            interval: 5,
            step: 0.2,
        }
    }
}

/// Presentation speed multiplier parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeedScaling {
    pub per_unit: f64,
    pub max: f64,
}

impl Default for SpeedScaling {
    fn default() -> Self {
        Self {
            per_unit: 0.10,
            max: 2.5,
        }
    }
}

/// Conversion constants for legacy slow/haste statuses.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LegacyConversion {
    pub slow_evasion_debuff: f64,
    pub haste_evasion_buff: f64,
}

impl Default for LegacyConversion {
    fn default() -> Self {
        Self {
            slow_evasion_debuff: 0.15,
            haste_evasion_buff: 0.10,
        }
    }
}

/// One directed edge of the elemental counter table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counter {
    pub attacker: Tribe,
    pub defender: Tribe,
}

/// Directed elemental counter table plus the modifiers it implies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElementalTable {
    pub counters: Vec<Counter>,
    /// Applied when the advantaged hit lands on a tank.
    pub tank_defender_modifier: f64,
    /// Applied when a non-tank attacker has advantage.
    pub advantage_modifier: f64,
}

impl ElementalTable {
    /// Returns true when `attacker` counters `defender`.
    pub fn counters(&self, attacker: Tribe, defender: Tribe) -> bool {
        self.counters
            .iter()
            .any(|c| c.attacker == attacker && c.defender == defender)
    }
}

impl Default for ElementalTable {
    fn default() -> Self {
        use Tribe::*;
        let pairs = [
            (Fire, Spirit),
            (Spirit, Tide),
            (Tide, Fire),
            (Stone, Wind),
            (Wind, Night),
            (Night, Stone),
        ];
        Self {
            counters: pairs
                .into_iter()
                .map(|(attacker, defender)| Counter { attacker, defender })
                .collect(),
            tank_defender_modifier: 0.5,
            advantage_modifier: 1.5,
        }
    }
}

/// Enemy-side tuning derived from [`Difficulty`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AiProfile {
    pub hp_mult: f64,
    pub atk_mult: f64,
    pub matk_mult: f64,
    /// Chance that an AI unit ignores scoring and picks a random target.
    pub random_target_chance: f64,
    pub rage_gain: u32,
}

impl AiProfile {
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                hp_mult: 0.84,
                atk_mult: 0.82,
                matk_mult: 0.82,
                random_target_chance: 0.58,
                rage_gain: 1,
            },
            Difficulty::Medium => Self {
                hp_mult: 0.95,
                atk_mult: 0.93,
                matk_mult: 0.93,
                random_target_chance: 0.30,
                rage_gain: 1,
            },
            Difficulty::Hard => Self {
                hp_mult: 1.05,
                atk_mult: 1.04,
                matk_mult: 1.04,
                random_target_chance: 0.12,
                rage_gain: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_tables_clamp_out_of_range() {
        assert_eq!(BattleConfig::star_stat_multiplier(1), 1.0);
        assert_eq!(BattleConfig::star_stat_multiplier(3), 2.5);
        assert_eq!(BattleConfig::star_stat_multiplier(0), 1.0);
        assert_eq!(BattleConfig::star_skill_multiplier(9), 1.4);
    }

    #[test]
    fn death_match_escalates_every_interval() {
        let rules = DeathMatchRules::default();
        assert_eq!(rules.multiplier_at(100), 1.0);
        assert_eq!(rules.multiplier_at(104), 1.0);
        // (105 - 100) / 5 = 1 step → 1.2
        assert!((rules.multiplier_at(105) - 1.2).abs() < 1e-9);
        // (120 - 100) / 5 = 4 steps → 1.8
        assert!((rules.multiplier_at(120) - 1.8).abs() < 1e-9);
    }

    #[test]
    fn default_counter_table_is_directed() {
        let table = ElementalTable::default();
        assert!(table.counters(Tribe::Fire, Tribe::Spirit));
        assert!(!table.counters(Tribe::Spirit, Tribe::Fire));
        assert!(table.counters(Tribe::Spirit, Tribe::Tide));
        for tribe in [Tribe::Swarm, Tribe::Wood] {
            assert!(table.counters.iter().all(|c| c.attacker != tribe));
        }
    }

    #[test]
    fn board_halves_split_columns() {
        let board = BoardDimensions::default();
        assert_eq!(board.half(), 5);
        assert!(board.contains(4, 9));
        assert!(!board.contains(5, 0));
        assert!(!board.contains(0, -1));
    }
}
