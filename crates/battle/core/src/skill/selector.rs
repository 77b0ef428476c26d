//! Target selection.
//!
//! Primary targets are chosen by a role-dependent lexicographic score (lower
//! is better, unit id breaks ties). Skill phases then expand from the primary
//! target or the caster using one of the [`TargetSelector`] strategies.

use crate::config::BoardDimensions;
use crate::skill::SkillParams;
use crate::state::{BattleState, CombatUnit, UnitId};
use crate::traits::{Role, Side};

/// Target-selection strategy for one skill phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TargetSelector {
    /// The action's primary target.
    Primary,
    /// Best back-row target by assassin scoring.
    Backline,
    Caster,
    AllEnemies,
    AllAllies,
    /// Enemies within Chebyshev `radius` of the primary target.
    Square,
    /// Enemies in the primary target's row, nearest to the caster first.
    Row,
    /// Enemies in the primary target's column.
    Column,
    /// Enemies in the columns next to the primary target's.
    AdjacentColumns,
    /// Primary target plus its orthogonal neighbors.
    Cross,
    /// Rows within one of the target, from its column `radius` deep.
    Cone,
    /// Enemies with the highest effective attack.
    TopAttack,
    /// Distinct random enemies.
    RandomEnemies,
    /// Living allies with the lowest HP ratio, caster included.
    LowestHpAllies,
    /// Other living allies closest to the caster.
    NearestAllies,
    CasterRow,
    CasterColumn,
}

impl TargetSelector {
    /// True when the selector expands from the primary target.
    pub const fn needs_primary(self) -> bool {
        matches!(
            self,
            Self::Primary
                | Self::Square
                | Self::Row
                | Self::Column
                | Self::AdjacentColumns
                | Self::Cross
                | Self::Cone
        )
    }
}

type Score = [i64; 5];

const RATIO_SCALE: f64 = 1_000.0;

/// Column of `side`'s front line.
fn front_col(side: Side, board: &BoardDimensions) -> i32 {
    match side {
        Side::Ally => board.half() - 1,
        Side::Enemy => board.half(),
    }
}

/// Column of `side`'s back line.
fn back_col(side: Side, board: &BoardDimensions) -> i32 {
    match side {
        Side::Ally => 0,
        Side::Enemy => board.cols - 1,
    }
}

/// Lexicographic targeting score of `target` from `attacker`'s point of view.
pub fn score_target(
    attacker: &CombatUnit,
    target: &CombatUnit,
    role: Role,
    board: &BoardDimensions,
) -> Score {
    let frontline = i64::from((target.pos.col - front_col(target.side, board)).abs());
    let backline = i64::from((target.pos.col - back_col(target.side, board)).abs());
    let same_row = i64::from(target.pos.row != attacker.pos.row);
    let manhattan = i64::from(attacker.pos.manhattan(target.pos));
    let ratio = (target.hp_ratio() * RATIO_SCALE).round() as i64;
    let hp = i64::from(target.hp);

    match role {
        Role::Assassin => [backline, ratio, manhattan, frontline, hp],
        Role::Archer | Role::Mage => [same_row, manhattan, frontline, ratio, hp],
        Role::Tanker | Role::Fighter | Role::Support => {
            [frontline, manhattan, same_row, ratio, hp]
        }
    }
}

fn best_by_role(
    state: &BattleState,
    attacker: &CombatUnit,
    role: Role,
    board: &BoardDimensions,
) -> Option<UnitId> {
    state
        .alive_on(attacker.side.opponent())
        .min_by_key(|target| (score_target(attacker, target, role, board), target.id))
        .map(|target| target.id)
}

/// Scored primary target for `attacker`, ignoring taunt and AI randomness.
pub fn pick_primary(
    state: &BattleState,
    attacker: UnitId,
    board: &BoardDimensions,
) -> Option<UnitId> {
    let unit = state.unit(attacker)?;
    best_by_role(state, unit, unit.role, board)
}

/// Living taunter this unit is locked onto, if any.
pub fn taunt_lock(state: &BattleState, attacker: UnitId) -> Option<UnitId> {
    let unit = state.unit(attacker)?;
    unit.statuses
        .taunt_target()
        .filter(|taunter| state.is_alive(*taunter))
}

fn extra_per_star(params: &SkillParams, star: u8) -> usize {
    params.targets_per_star as usize * usize::from(star.saturating_sub(1))
}

/// Count for selectors where zero means "everything eligible".
fn hit_limit(params: &SkillParams, star: u8) -> Option<usize> {
    match params.max_hits {
        0 => None,
        n => Some(n as usize + extra_per_star(params, star)),
    }
}

/// Count for ranked selectors where zero means one.
fn target_count(base: u32, params: &SkillParams, star: u8) -> usize {
    base.max(1) as usize + extra_per_star(params, star)
}

fn sorted_ids<'a>(
    units: impl Iterator<Item = &'a CombatUnit>,
    mut key: impl FnMut(&CombatUnit) -> i64,
) -> Vec<UnitId> {
    let mut keyed: Vec<(i64, UnitId)> = units.map(|u| (key(u), u.id)).collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, id)| id).collect()
}

/// Expands a selector into concrete targets.
///
/// `pick` returns a uniform index below its argument and is only consulted by
/// [`TargetSelector::RandomEnemies`].
pub fn select_targets(
    state: &BattleState,
    caster: &CombatUnit,
    primary: Option<UnitId>,
    selector: TargetSelector,
    params: &SkillParams,
    board: &BoardDimensions,
    pick: &mut dyn FnMut(usize) -> usize,
) -> Vec<UnitId> {
    let enemies = caster.side.opponent();
    let allies = caster.side;
    let anchor = primary.and_then(|id| state.unit(id)).filter(|u| u.is_alive());

    match selector {
        TargetSelector::Primary => anchor.map(|u| vec![u.id]).unwrap_or_default(),
        TargetSelector::Backline => best_by_role(state, caster, Role::Assassin, board)
            .into_iter()
            .collect(),
        TargetSelector::Caster => vec![caster.id],
        TargetSelector::AllEnemies => state.alive_on(enemies).map(|u| u.id).collect(),
        TargetSelector::AllAllies => state.alive_on(allies).map(|u| u.id).collect(),
        TargetSelector::Square => {
            let Some(center) = anchor else { return Vec::new() };
            let mut radius = params.radius;
            if params.star_radius_bonus && caster.star >= 3 {
                radius += 1;
            }
            state
                .alive_on(enemies)
                .filter(|u| u.pos.chebyshev(center.pos) <= radius)
                .map(|u| u.id)
                .collect()
        }
        TargetSelector::Row => {
            let Some(center) = anchor else { return Vec::new() };
            let mut ids = sorted_ids(
                state.alive_on(enemies).filter(|u| u.pos.row == center.pos.row),
                |u| i64::from(u.pos.manhattan(caster.pos)),
            );
            if let Some(limit) = hit_limit(params, caster.star) {
                ids.truncate(limit);
            }
            ids
        }
        TargetSelector::Column => {
            let Some(center) = anchor else { return Vec::new() };
            state
                .alive_on(enemies)
                .filter(|u| u.pos.col == center.pos.col)
                .map(|u| u.id)
                .collect()
        }
        TargetSelector::AdjacentColumns => {
            let Some(center) = anchor else { return Vec::new() };
            state
                .alive_on(enemies)
                .filter(|u| (u.pos.col - center.pos.col).abs() == 1)
                .map(|u| u.id)
                .collect()
        }
        TargetSelector::Cross => {
            let Some(center) = anchor else { return Vec::new() };
            state
                .alive_on(enemies)
                .filter(|u| u.pos.manhattan(center.pos) <= 1)
                .map(|u| u.id)
                .collect()
        }
        TargetSelector::Cone => {
            let Some(center) = anchor else { return Vec::new() };
            let forward = caster.side.forward();
            state
                .alive_on(enemies)
                .filter(|u| {
                    let depth = (u.pos.col - center.pos.col) * forward;
                    (u.pos.row - center.pos.row).abs() <= 1 && (0..=params.radius).contains(&depth)
                })
                .map(|u| u.id)
                .collect()
        }
        TargetSelector::TopAttack => {
            let mut ids = sorted_ids(state.alive_on(enemies), |u| -i64::from(u.effective_atk()));
            ids.truncate(target_count(params.max_targets, params, caster.star));
            ids
        }
        TargetSelector::RandomEnemies => {
            let mut pool: Vec<UnitId> = state.alive_on(enemies).map(|u| u.id).collect();
            let count = hit_limit(params, caster.star).unwrap_or(1);
            let mut chosen = Vec::with_capacity(count.min(pool.len()));
            while chosen.len() < count && !pool.is_empty() {
                let index = pick(pool.len()).min(pool.len() - 1);
                chosen.push(pool.swap_remove(index));
            }
            chosen
        }
        TargetSelector::LowestHpAllies => {
            let mut ids = sorted_ids(state.alive_on(allies), |u| {
                (u.hp_ratio() * RATIO_SCALE).round() as i64
            });
            ids.truncate(target_count(params.max_targets, params, caster.star));
            ids
        }
        TargetSelector::NearestAllies => {
            let mut ids = sorted_ids(
                state.alive_on(allies).filter(|u| u.id != caster.id),
                |u| i64::from(u.pos.manhattan(caster.pos)),
            );
            ids.truncate(target_count(params.max_targets, params, caster.star));
            ids
        }
        TargetSelector::CasterRow => state
            .alive_on(allies)
            .filter(|u| u.pos.row == caster.pos.row)
            .map(|u| u.id)
            .collect(),
        TargetSelector::CasterColumn => state
            .alive_on(allies)
            .filter(|u| u.pos.col == caster.pos.col)
            .map(|u| u.id)
            .collect(),
    }
}
