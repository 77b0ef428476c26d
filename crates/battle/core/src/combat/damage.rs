//! Damage types, resolution options, and the mitigation formula.

/// Damage type for mitigation.
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
pub enum DamageType {
    /// Mitigated by physical defense.
    #[default]
    Physical,
    /// Mitigated by magic defense.
    Magic,
    /// Ignores all mitigation.
    True,
}

bitflags::bitflags! {
    /// Flags controlling one damage resolution.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageFlags: u8 {
        /// Skip the evasion roll.
        const FORCE_HIT = 1 << 0;
        /// Skill damage.
        const SKILL = 1 << 1;
        /// No rage accrual on a connecting hit.
        const NO_RAGE = 1 << 2;
        /// Cannot trigger the defender's reflect.
        const NO_REFLECT = 1 << 3;
        /// May roll a critical hit (physical only).
        const CAN_CRIT = 1 << 4;
        /// Does not trigger the attacker's on-hit modifiers or lifesteal.
        const NO_PROCS = 1 << 5;
    }
}

impl DamageFlags {
    /// Flags for damage-over-time ticks.
    pub const DOT: Self = Self::FORCE_HIT
        .union(Self::NO_RAGE)
        .union(Self::NO_REFLECT)
        .union(Self::NO_PROCS);

    /// Flags for reflected damage.
    pub const REFLECTED: Self = Self::FORCE_HIT
        .union(Self::NO_REFLECT)
        .union(Self::NO_PROCS);

    /// Flags for a basic attack.
    pub const BASIC: Self = Self::CAN_CRIT;

    /// Flags for a damaging skill step; physical skill hits may crit.
    pub const SKILL_HIT: Self = Self::SKILL.union(Self::CAN_CRIT);

    pub fn evadable(self) -> bool {
        !self.contains(Self::FORCE_HIT)
    }
}

/// Options for one damage resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageOptions {
    pub flags: DamageFlags,
    /// Fraction of effective defense ignored, in `[0, 1]`.
    pub armor_pen: f64,
}

impl DamageOptions {
    pub const fn new(flags: DamageFlags) -> Self {
        Self {
            flags,
            armor_pen: 0.0,
        }
    }

    pub const fn basic() -> Self {
        Self::new(DamageFlags::BASIC)
    }

    pub const fn skill() -> Self {
        Self::new(DamageFlags::SKILL_HIT)
    }

    #[must_use]
    pub fn with_armor_pen(mut self, armor_pen: f64) -> Self {
        self.armor_pen = if armor_pen.is_nan() {
            0.0
        } else {
            armor_pen.clamp(0.0, 1.0)
        };
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DamageFlags) -> Self {
        self.flags |= flags;
        self
    }
}

/// Outcome of one damage resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitReport {
    /// HP plus shield removed from the defender.
    pub dealt: u32,
    /// Portion of `dealt` absorbed by shield.
    pub absorbed: u32,
    pub evaded: bool,
    pub crit: bool,
    /// The defender transitioned from alive to dead on this hit.
    pub killed: bool,
}

impl HitReport {
    pub const NONE: Self = Self {
        dealt: 0,
        absorbed: 0,
        evaded: false,
        crit: false,
        killed: false,
    };

    pub const fn evaded() -> Self {
        Self {
            evaded: true,
            ..Self::NONE
        }
    }
}

/// Reduces raw damage by a defense value.
///
/// # Formula
///
/// ```text
/// defense   = effective_defense × (1 - armor_pen)
/// mitigated = raw × 100 / (100 + defense)
/// ```
///
/// True damage is returned unchanged.
pub fn mitigate(raw: f64, damage_type: DamageType, effective_defense: f64, armor_pen: f64) -> f64 {
    if damage_type == DamageType::True {
        return raw;
    }
    let pen = if armor_pen.is_nan() { 0.0 } else { armor_pen.clamp(0.0, 1.0) };
    let defense = (effective_defense.max(0.0)) * (1.0 - pen);
    raw * 100.0 / (100.0 + defense)
}

/// Rounds mitigated damage to the nearest integer with a floor of 1.
pub fn finalize_damage(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    value.round().max(1.0) as u32
}

/// Splits damage between shield and HP.
///
/// Returns `(shield_after, hp_after, absorbed, hp_lost)`.
pub fn absorb(shield: u32, hp: u32, damage: u32) -> (u32, u32, u32, u32) {
    let absorbed = shield.min(damage);
    let rest = damage - absorbed;
    let hp_lost = hp.min(rest);
    (shield - absorbed, hp - hp_lost, absorbed, hp_lost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_mitigation_round_trip() {
        // 100 × 100 / (100 + 0) = 100
        assert_eq!(finalize_damage(mitigate(100.0, DamageType::Physical, 0.0, 0.0)), 100);
        // 100 × 100 / (100 + 100) = 50
        assert_eq!(finalize_damage(mitigate(100.0, DamageType::Physical, 100.0, 0.0)), 50);
    }

    #[test]
    fn armor_pen_scales_defense() {
        // defense 100 × (1 - 0.5) = 50 → 100 × 100 / 150 = 66.67 → 67
        assert_eq!(finalize_damage(mitigate(100.0, DamageType::Magic, 100.0, 0.5)), 67);
    }

    #[test]
    fn true_damage_is_unmitigated() {
        assert_eq!(mitigate(80.0, DamageType::True, 500.0, 0.0), 80.0);
    }

    #[test]
    fn damage_floor_is_one() {
        assert_eq!(finalize_damage(mitigate(1.0, DamageType::Physical, 900.0, 0.0)), 1);
        assert_eq!(finalize_damage(0.2), 1);
    }

    #[test]
    fn shield_absorbs_first() {
        assert_eq!(absorb(30, 100, 50), (0, 80, 30, 20));
        assert_eq!(absorb(60, 100, 50), (10, 100, 50, 0));
        assert_eq!(absorb(0, 10, 50), (0, 0, 0, 10));
    }

    #[test]
    fn only_forced_hits_skip_evasion() {
        assert!(DamageFlags::BASIC.evadable());
        assert!(DamageFlags::SKILL_HIT.evadable());
        assert!(!DamageFlags::SKILL_HIT.union(DamageFlags::FORCE_HIT).evadable());
        assert!(!DamageFlags::DOT.evadable());
        assert!(!DamageFlags::REFLECTED.evadable());
    }

    #[test]
    fn skill_hits_may_crit() {
        assert!(DamageOptions::skill().flags.contains(DamageFlags::CAN_CRIT));
        assert!(!DamageFlags::DOT.contains(DamageFlags::CAN_CRIT));
    }
}
