//! Identity tags for combat units.
//!
//! These enums are immutable for the lifetime of a battle and drive targeting
//! defaults, the elemental counter rule, and AI tuning. String forms are
//! snake_case and parsed case-insensitively so roster files can write either
//! `TANKER` or `tanker`.

/// Which half of the board a unit fights for.
///
/// The ally side is player-controlled and occupies the low columns; the enemy
/// side is AI-controlled and occupies the high columns.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    /// Returns the opposing side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
        }
    }

    /// Returns true for the player-controlled side.
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Ally)
    }

    /// Column step pointing from this side toward the opponent.
    pub const fn forward(self) -> i32 {
        match self {
            Self::Ally => 1,
            Self::Enemy => -1,
        }
    }
}

/// Class role of a unit.
///
/// Role affects default targeting, basic-attack movement pattern, and the
/// elemental asymmetry for tanks.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    /// Frontline damage sponge; blocks knockback gracefully.
    #[strum(to_string = "tanker", serialize = "tank")]
    #[cfg_attr(feature = "serde", serde(alias = "tank", alias = "TANKER"))]
    Tanker,
    #[cfg_attr(feature = "serde", serde(alias = "FIGHTER"))]
    Fighter,
    /// Dives the enemy backline.
    #[cfg_attr(feature = "serde", serde(alias = "ASSASSIN"))]
    Assassin,
    #[cfg_attr(feature = "serde", serde(alias = "ARCHER"))]
    Archer,
    #[cfg_attr(feature = "serde", serde(alias = "MAGE"))]
    Mage,
    #[cfg_attr(feature = "serde", serde(alias = "SUPPORT"))]
    Support,
}

impl Role {
    pub const fn is_tank(self) -> bool {
        matches!(self, Self::Tanker)
    }
}

/// Elemental affiliation, used only by the counter-advantage rule.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tribe {
    #[cfg_attr(feature = "serde", serde(alias = "FIRE"))]
    Fire,
    #[cfg_attr(feature = "serde", serde(alias = "TIDE"))]
    Tide,
    #[cfg_attr(feature = "serde", serde(alias = "WIND"))]
    Wind,
    #[cfg_attr(feature = "serde", serde(alias = "STONE"))]
    Stone,
    #[cfg_attr(feature = "serde", serde(alias = "NIGHT"))]
    Night,
    #[cfg_attr(feature = "serde", serde(alias = "SWARM"))]
    Swarm,
    #[cfg_attr(feature = "serde", serde(alias = "SPIRIT"))]
    Spirit,
    #[cfg_attr(feature = "serde", serde(alias = "WOOD"))]
    Wood,
}

/// AI difficulty tier for the enemy side.
///
/// Difficulty scales enemy stats at setup and controls how often the AI
/// ignores its scoring and picks a random target.
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
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_roles_case_insensitively() {
        assert_eq!(Role::from_str("TANKER").unwrap(), Role::Tanker);
        assert_eq!(Role::from_str("tank").unwrap(), Role::Tanker);
        assert_eq!(Role::from_str("Assassin").unwrap(), Role::Assassin);
        assert!(Role::from_str("healer").is_err());
    }

    #[test]
    fn rejects_unknown_tribe() {
        assert_eq!(Tribe::from_str("spirit").unwrap(), Tribe::Spirit);
        assert!(Tribe::from_str("lava").is_err());
    }

    #[test]
    fn sides_face_each_other() {
        assert_eq!(Side::Ally.opponent(), Side::Enemy);
        assert_eq!(Side::Ally.forward(), -Side::Enemy.forward());
        assert!(Side::Ally.is_player());
        assert!(!Side::Enemy.is_player());
    }
}
