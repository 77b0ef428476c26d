//! Skill magnitude formulas.
//!
//! `round((base + stat * scale) * star_multiplier)`, evaluated per hit
//! component. Two-hit skills carry a second independently scaled component.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::skill::{HitComponent, ScaleStat, SkillParams};
use crate::state::CombatUnit;

/// Evaluates one scaled amount, floored at zero.
pub fn scaled_amount(base: f64, stat: u32, scale: f64, star: u8) -> u32 {
    let value = (base + f64::from(stat) * scale) * BattleConfig::star_skill_multiplier(star);
    if !value.is_finite() {
        return 0;
    }
    value.round().max(0.0) as u32
}

/// Per-hit damage of a skill cast by `caster`.
pub fn skill_hits(
    params: &SkillParams,
    caster: &CombatUnit,
) -> ArrayVec<u32, { BattleConfig::MAX_SKILL_HITS }> {
    let stat = params.scale_stat.read(caster);
    let mut hits = ArrayVec::new();
    hits.push(scaled_amount(params.base, stat, params.scale, caster.star));
    if let Some(HitComponent { base, scale }) = params.hit2 {
        hits.push(scaled_amount(base, stat, scale, caster.star));
    }
    hits
}

/// Total raw damage of a skill, summing every hit component.
pub fn skill_damage(params: &SkillParams, caster: &CombatUnit) -> u32 {
    skill_hits(params, caster).iter().sum()
}

/// Raw damage of the first hit only.
pub fn primary_hit(params: &SkillParams, caster: &CombatUnit) -> u32 {
    let stat = params.scale_stat.read(caster);
    scaled_amount(params.base, stat, params.scale, caster.star)
}

/// Raw damage of the second hit, or zero for single-hit skills.
pub fn second_hit(params: &SkillParams, caster: &CombatUnit) -> u32 {
    let stat = params.scale_stat.read(caster);
    params
        .hit2
        .map_or(0, |hit| scaled_amount(hit.base, stat, hit.scale, caster.star))
}

pub fn echo_amount(params: &SkillParams, caster: &CombatUnit) -> u32 {
    scaled_amount(params.echo_base, caster.effective_atk(), params.echo_scale, caster.star)
}

pub fn shield_amount(params: &SkillParams, caster: &CombatUnit) -> u32 {
    let stat = params.shield_scale_stat.read(caster);
    scaled_amount(params.shield_base, stat, params.shield_scale, caster.star)
}

/// Heals scale from magic attack.
pub fn heal_amount(params: &SkillParams, caster: &CombatUnit) -> u32 {
    let stat = ScaleStat::Matk.read(caster);
    scaled_amount(params.heal_base, stat, params.heal_scale, caster.star)
}
