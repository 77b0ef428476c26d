//! Versioned migration for persisted status records.
//!
//! Version 1 records stored turn-speed effects as `slow_turns` / `haste_turns`.
//! Version 2 replaces them with evasion debuffs and buffs. Migration is a pure
//! function run once when roster data is loaded; running it again on migrated
//! data changes nothing.

use crate::config::LegacyConversion;
use crate::state::status::{StatusEntry, StatusKind, StatusLedger};

/// Current persisted status format.
pub const STATUS_FORMAT_VERSION: u32 = 2;

/// Status data as it arrives from a roster or save collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PersistedStatuses {
    /// Missing in legacy records, which deserialize as version 1.
    #[cfg_attr(feature = "serde", serde(default = "legacy_version"))]
    pub version: u32,
    pub effects: Vec<StatusEntry>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", alias = "slowTurns")
    )]
    pub slow_turns: Option<u32>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", alias = "hasteTurns")
    )]
    pub haste_turns: Option<u32>,
}

#[cfg(feature = "serde")]
fn legacy_version() -> u32 {
    1
}

impl PersistedStatuses {
    /// Creates a current-version record from explicit entries.
    pub fn current(effects: Vec<StatusEntry>) -> Self {
        Self {
            version: STATUS_FORMAT_VERSION,
            effects,
            slow_turns: None,
            haste_turns: None,
        }
    }

    pub fn has_legacy_fields(&self) -> bool {
        self.slow_turns.is_some() || self.haste_turns.is_some()
    }

    /// Builds a ledger from the entries, merging duplicates by the usual policy.
    ///
    /// Legacy fields are ignored; call [`migrate_legacy_statuses`] first.
    pub fn to_ledger(&self) -> StatusLedger {
        let mut ledger = StatusLedger::empty();
        for entry in &self.effects {
            ledger.apply(entry.kind, entry.magnitude, entry.remaining);
        }
        ledger
    }
}

/// Converts legacy slow/haste fields into evasion effects.
///
/// - slow `d > 0` becomes `EvadeDebuff { magnitude: slow_evasion_debuff, remaining: d }`
/// - haste `d > 0` becomes `EvadeBuff { magnitude: haste_evasion_buff, remaining: d }`
/// - zero durations are dropped without producing an effect
///
/// The legacy fields are removed and the record is stamped with the current
/// version. Records already at the current version with no legacy fields are
/// returned unchanged.
pub fn migrate_legacy_statuses(
    mut record: PersistedStatuses,
    conversion: &LegacyConversion,
) -> PersistedStatuses {
    if record.version >= STATUS_FORMAT_VERSION && !record.has_legacy_fields() {
        return record;
    }

    if let Some(turns) = record.slow_turns.take().filter(|t| *t > 0) {
        merge_entry(
            &mut record.effects,
            StatusEntry::new(StatusKind::EvadeDebuff, conversion.slow_evasion_debuff, turns),
        );
    }
    if let Some(turns) = record.haste_turns.take().filter(|t| *t > 0) {
        merge_entry(
            &mut record.effects,
            StatusEntry::new(StatusKind::EvadeBuff, conversion.haste_evasion_buff, turns),
        );
    }

    record.version = STATUS_FORMAT_VERSION;
    record
}

fn merge_entry(effects: &mut Vec<StatusEntry>, incoming: StatusEntry) {
    match effects.iter_mut().find(|e| e.kind == incoming.kind) {
        Some(existing) => {
            existing.magnitude = existing.magnitude.max(incoming.magnitude);
            existing.remaining = existing.remaining.max(incoming.remaining);
        }
        None => effects.push(incoming),
    }
}
