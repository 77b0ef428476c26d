//! Status effect ledger for combat units.
//!
//! Effects are keyed by [`StatusKind`] and carry a magnitude plus a count of
//! remaining turns. Durations are measured in the bearer's own turns: they only
//! tick down at the start of that unit's turn.
//!
//! # Application policy
//!
//! Re-applying a kind never stacks. Magnitude becomes the larger of current and
//! incoming, and the duration extends to the larger remaining count. This holds
//! for damage-over-time kinds too, which track the highest damage per turn.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::UnitId;

/// Kinds of timed effects a unit can carry.
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
pub enum StatusKind {
    // ========================================================================
    // Control (skip the next action)
    // ========================================================================
    Stun,
    Freeze,
    Sleep,

    // ========================================================================
    // Restrictions
    // ========================================================================
    /// Blocks skill casts.
    Silence,
    /// Blocks basic attacks.
    Disarm,

    // ========================================================================
    // Damage over time (true damage at the start of the bearer's turn)
    // ========================================================================
    Burn,
    Poison,
    /// Magnitude is fixed at infliction from the inflicter's attack.
    Bleed,
    Disease,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Flat reduction to physical defense.
    ArmorBreak,
    AtkDebuff,
    /// Fractional reduction to evasion.
    EvadeDebuff,

    // ========================================================================
    // Buffs
    // ========================================================================
    AtkBuff,
    DefBuff,
    MdefBuff,
    /// Fractional increase to evasion.
    EvadeBuff,
    /// Returns a fraction of incoming damage to the attacker.
    Reflect,
    /// Blocks new negative statuses.
    Immune,

    // ========================================================================
    // Special
    // ========================================================================
    /// Forces the bearer to target the taunter.
    Taunt,
}

impl StatusKind {
    /// Returns true for kinds that `Immune` blocks and cleanses remove.
    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            Self::Stun
                | Self::Freeze
                | Self::Sleep
                | Self::Silence
                | Self::Disarm
                | Self::Burn
                | Self::Poison
                | Self::Bleed
                | Self::Disease
                | Self::ArmorBreak
                | Self::AtkDebuff
                | Self::EvadeDebuff
                | Self::Taunt
        )
    }

    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Burn | Self::Poison | Self::Bleed | Self::Disease)
    }

    /// Control kinds in precedence order.
    pub const CONTROL: [StatusKind; 3] = [Self::Freeze, Self::Stun, Self::Sleep];
}

/// A single active effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEntry {
    pub kind: StatusKind,
    pub magnitude: f64,
    pub remaining: u32,
}

impl StatusEntry {
    pub const fn new(kind: StatusKind, magnitude: f64, remaining: u32) -> Self {
        Self {
            kind,
            magnitude,
            remaining,
        }
    }
}

/// Result of [`StatusLedger::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The kind was not present and is now active.
    Added,
    /// The kind was present; magnitude and duration took the larger values.
    Merged,
    /// Blocked by `Immune`.
    Resisted,
    /// Zero-duration application; nothing changed.
    Ignored,
}

impl ApplyOutcome {
    pub const fn took_effect(self) -> bool {
        matches!(self, Self::Added | Self::Merged)
    }
}

/// Per-unit map of active timed effects.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    effects: ArrayVec<StatusEntry, { BattleConfig::MAX_STATUS_EFFECTS }>,
    /// Unit the bearer is forced to attack while `Taunt` is active.
    taunt_target: Option<UnitId>,
}

impl StatusLedger {
    /// Creates an empty ledger.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEntry> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Magnitude of `kind`, or zero when inactive.
    pub fn magnitude(&self, kind: StatusKind) -> f64 {
        self.get(kind).map_or(0.0, |e| e.magnitude)
    }

    /// Remaining turns of `kind`, or zero when inactive.
    pub fn remaining(&self, kind: StatusKind) -> u32 {
        self.get(kind).map_or(0, |e| e.remaining)
    }

    pub fn taunt_target(&self) -> Option<UnitId> {
        self.taunt_target
    }

    /// Applies an effect using the max-magnitude / max-duration policy.
    ///
    /// Negative kinds are rejected while `Immune` is active.
    pub fn apply(&mut self, kind: StatusKind, magnitude: f64, turns: u32) -> ApplyOutcome {
        if turns == 0 {
            return ApplyOutcome::Ignored;
        }
        if kind.is_negative() && self.has(StatusKind::Immune) {
            return ApplyOutcome::Resisted;
        }
        let magnitude = if magnitude.is_finite() { magnitude.max(0.0) } else { 0.0 };

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.magnitude = existing.magnitude.max(magnitude);
            existing.remaining = existing.remaining.max(turns);
            return ApplyOutcome::Merged;
        }

        // Capacity covers every kind, so a push only fails on a config mismatch.
        if self
            .effects
            .try_push(StatusEntry::new(kind, magnitude, turns))
            .is_err()
        {
            return ApplyOutcome::Ignored;
        }
        ApplyOutcome::Added
    }

    /// Applies `Taunt` and locks the bearer onto `taunter`.
    pub fn apply_taunt(&mut self, taunter: UnitId, turns: u32) -> ApplyOutcome {
        let outcome = self.apply(StatusKind::Taunt, 1.0, turns);
        if outcome.took_effect() {
            self.taunt_target = Some(taunter);
        }
        outcome
    }

    /// Removes an effect immediately.
    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
        if kind == StatusKind::Taunt {
            self.taunt_target = None;
        }
    }

    /// Removes every negative effect, returning the kinds removed.
    pub fn cleanse(&mut self) -> Vec<StatusKind> {
        let removed: Vec<StatusKind> = self
            .effects
            .iter()
            .filter(|e| e.kind.is_negative())
            .map(|e| e.kind)
            .collect();
        for kind in &removed {
            self.remove(*kind);
        }
        removed
    }

    /// Damage-over-time entries as `(kind, damage)` pairs.
    pub fn damage_over_time(&self) -> impl Iterator<Item = (StatusKind, u32)> + '_ {
        self.effects
            .iter()
            .filter(|e| e.kind.is_damage_over_time())
            .map(|e| (e.kind, e.magnitude.round().max(0.0) as u32))
            .filter(|(_, dmg)| *dmg > 0)
    }

    /// Highest-precedence control effect currently active.
    pub fn control(&self) -> Option<StatusKind> {
        StatusKind::CONTROL.into_iter().find(|k| self.has(*k))
    }

    /// Decrements every duration by one and drops effects that reach zero.
    ///
    /// Returns the kinds that expired. Expiring `Taunt` releases the lock.
    pub fn decrement(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        if expired.contains(&StatusKind::Taunt) {
            self.taunt_target = None;
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn capacity_covers_every_kind() {
        assert!(StatusKind::COUNT <= BattleConfig::MAX_STATUS_EFFECTS);
    }

    #[test]
    fn reapply_takes_max_magnitude_and_duration() {
        let mut ledger = StatusLedger::empty();
        assert_eq!(ledger.apply(StatusKind::Poison, 12.0, 2), ApplyOutcome::Added);
        assert_eq!(ledger.apply(StatusKind::Poison, 8.0, 5), ApplyOutcome::Merged);

        let poison = ledger.get(StatusKind::Poison).unwrap();
        assert_eq!(poison.magnitude, 12.0);
        assert_eq!(poison.remaining, 5); // max(2, 5), never 7
    }

    #[test]
    fn immune_blocks_negative_but_not_buffs() {
        let mut ledger = StatusLedger::empty();
        ledger.apply(StatusKind::Immune, 1.0, 2);

        assert_eq!(ledger.apply(StatusKind::Stun, 1.0, 1), ApplyOutcome::Resisted);
        assert_eq!(ledger.apply(StatusKind::AtkBuff, 10.0, 2), ApplyOutcome::Added);
        assert!(!ledger.has(StatusKind::Stun));
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut ledger = StatusLedger::empty();
        assert_eq!(ledger.apply(StatusKind::Burn, 5.0, 0), ApplyOutcome::Ignored);
        assert!(ledger.is_empty());
    }

    #[test]
    fn decrement_expires_and_clears_taunt_lock() {
        let mut ledger = StatusLedger::empty();
        ledger.apply_taunt(UnitId(7), 1);
        ledger.apply(StatusKind::DefBuff, 20.0, 2);
        assert_eq!(ledger.taunt_target(), Some(UnitId(7)));

        let expired = ledger.decrement();
        assert_eq!(expired, vec![StatusKind::Taunt]);
        assert_eq!(ledger.taunt_target(), None);
        assert_eq!(ledger.remaining(StatusKind::DefBuff), 1);

        let expired = ledger.decrement();
        assert_eq!(expired, vec![StatusKind::DefBuff]);
        assert_eq!(ledger.magnitude(StatusKind::DefBuff), 0.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn control_precedence_is_freeze_stun_sleep() {
        let mut ledger = StatusLedger::empty();
        ledger.apply(StatusKind::Sleep, 1.0, 1);
        assert_eq!(ledger.control(), Some(StatusKind::Sleep));
        ledger.apply(StatusKind::Stun, 1.0, 1);
        assert_eq!(ledger.control(), Some(StatusKind::Stun));
        ledger.apply(StatusKind::Freeze, 1.0, 1);
        assert_eq!(ledger.control(), Some(StatusKind::Freeze));
    }

    #[test]
    fn cleanse_keeps_buffs() {
        let mut ledger = StatusLedger::empty();
        ledger.apply(StatusKind::Poison, 4.0, 3);
        ledger.apply_taunt(UnitId(1), 2);
        ledger.apply(StatusKind::EvadeBuff, 0.1, 2);

        let mut removed = ledger.cleanse();
        removed.sort();
        assert_eq!(removed, vec![StatusKind::Poison, StatusKind::Taunt]);
        assert!(ledger.has(StatusKind::EvadeBuff));
        assert_eq!(ledger.taunt_target(), None);
    }

    #[test]
    fn damage_over_time_rounds_magnitudes() {
        let mut ledger = StatusLedger::empty();
        ledger.apply(StatusKind::Bleed, 10.6, 2);
        ledger.apply(StatusKind::AtkBuff, 30.0, 2);
        let dots: Vec<_> = ledger.damage_over_time().collect();
        assert_eq!(dots, vec![(StatusKind::Bleed, 11)]);
    }
}
