//! Hit chance from accuracy and evasion.

use crate::config::BattleConfig;

/// Calculate hit chance from attacker accuracy and defender evasion.
///
/// # Formula
///
/// ```text
/// evasion    = clamp(evasion, 0, MAX_EVASION)
/// hit_chance = clamp(accuracy - evasion, MIN_HIT_CHANCE, 1)
/// ```
pub fn calculate_hit_chance(accuracy: f64, evasion: f64) -> f64 {
    let evasion = if evasion.is_nan() {
        0.0
    } else {
        evasion.clamp(0.0, BattleConfig::MAX_EVASION)
    };
    let accuracy = if accuracy.is_nan() { 0.0 } else { accuracy };
    (accuracy - evasion).clamp(BattleConfig::MIN_HIT_CHANCE, 1.0)
}

/// Check whether an attack connects given a uniform roll in `[0, 1)`.
pub fn check_hit(accuracy: f64, evasion: f64, roll: f64) -> bool {
    roll < calculate_hit_chance(accuracy, evasion)
}
