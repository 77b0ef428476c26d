use super::*;
use crate::combat::{DamageFlags, DamageOptions, DamageType};
use crate::config::{BattleConfig, CapResolution};
use crate::env::{PcgRng, RngOracle};
use crate::event::{ActionKind, EndReason, SkipReason};
use crate::skill::{EffectTag, SkillCatalog, SkillDef, SkillParams};
use crate::state::{BaseStats, GridPos, StatusKind, UnitMods, UnitSpec};
use crate::traits::{Role, Side, Tribe};

/// Oracle returning the same value for every seed.
struct FixedRng(u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Every roll lands at 0.0: hits always connect, chances always succeed.
const ALWAYS: FixedRng = FixedRng(0);
/// Every roll lands just below 1.0: any chance below 1 fails.
const NEVER: FixedRng = FixedRng(u32::MAX);

fn skill(id: &str, effect: EffectTag, params: SkillParams) -> SkillDef {
    SkillDef {
        id: id.into(),
        name: id.into(),
        effect,
        pattern: Default::default(),
        damage_type: DamageType::Physical,
        params,
    }
}

fn catalog() -> SkillCatalog {
    SkillCatalog::from_defs([
        skill("strike", EffectTag::SingleBurst, SkillParams {
            base: 20.0,
            scale: 1.0,
            ..SkillParams::default()
        }),
        skill("execute", EffectTag::AssassinExecuteRageRefund, SkillParams {
            base: 500.0,
            kill_rage: 0.5,
            ..SkillParams::default()
        }),
        skill("bounty", EffectTag::SingleBurst, SkillParams {
            base: 500.0,
            kill_gold: 3,
            ..SkillParams::default()
        }),
        skill("shove", EffectTag::KnockbackCharge, SkillParams {
            base: 1.0,
            ..SkillParams::default()
        }),
        skill("sure_strike", EffectTag::SingleBurst, SkillParams {
            base: 20.0,
            skip_evasion: true,
            ..SkillParams::default()
        }),
        skill("frenzy", EffectTag::SelfAtkAndAssist, SkillParams {
            base: 10.0,
            atk_buff: 10.0,
            turns: 2,
            assist_rate: 0.5,
            ..SkillParams::default()
        }),
        skill("cleave", EffectTag::RowCleave, SkillParams {
            base: 10.0,
            armor_break: 5.0,
            turns: 2,
            ..SkillParams::default()
        }),
        skill("guard", EffectTag::AllyRowDefBuff, SkillParams {
            def_buff: 10.0,
            mdef_buff: 8.0,
            turns: 2,
            ..SkillParams::default()
        }),
        SkillDef {
            damage_type: DamageType::Magic,
            ..skill("zap", EffectTag::SingleBurst, SkillParams {
                base: 20.0,
                ..SkillParams::default()
            })
        },
    ])
    .unwrap()
}

fn unit(role: Role, tribe: Tribe, row: i32, col: i32) -> UnitSpec {
    UnitSpec::new("unit", role, tribe, GridPos::new(row, col)).with_skill("strike")
}

fn fighter(row: i32, col: i32) -> UnitSpec {
    unit(Role::Fighter, Tribe::Wood, row, col)
}

fn build(allies: &[UnitSpec], enemies: &[UnitSpec], config: &BattleConfig) -> BattleState {
    BattleState::new(7, allies, enemies, config, &catalog()).unwrap()
}

#[test]
fn evaded_hit_feeds_only_the_defender() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &NEVER));

    let report = engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        50,
        DamageType::Physical,
        DamageOptions::new(DamageFlags::empty()),
    );

    assert!(report.evaded);
    assert_eq!(report.dealt, 0);
    assert_eq!(engine.state().units[0].rage, 0);
    assert_eq!(engine.state().units[1].rage, 1);
    assert_eq!(engine.state().units[1].hp, 200);
}

#[test]
fn miss_grants_defender_rage_even_without_rage_flag() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &NEVER));

    engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        50,
        DamageType::Physical,
        DamageOptions::new(DamageFlags::NO_RAGE),
    );
    assert_eq!(engine.state().units[1].rage, 1);
}

#[test]
fn connecting_hit_feeds_both_sides() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    state.units[1].rage = 3; // already full
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let report = engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        50,
        DamageType::Physical,
        DamageOptions::new(DamageFlags::empty()),
    );

    assert!(!report.evaded);
    assert!(report.dealt > 0);
    assert_eq!(engine.state().units[0].rage, 1);
    assert_eq!(engine.state().units[1].rage, 3);
}

#[test]
fn tank_defender_halves_advantaged_damage() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(
        &[unit(Role::Fighter, Tribe::Fire, 2, 4)],
        &[unit(Role::Tanker, Tribe::Spirit, 2, 5)],
        &config,
    );
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let report = engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        100,
        DamageType::True,
        DamageOptions::new(DamageFlags::FORCE_HIT),
    );
    assert_eq!(report.dealt, 50);
}

#[test]
fn advantaged_attacker_deals_one_and_a_half() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(
        &[unit(Role::Mage, Tribe::Tide, 2, 4)],
        &[unit(Role::Fighter, Tribe::Fire, 2, 5)],
        &config,
    );
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let report = engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        100,
        DamageType::True,
        DamageOptions::new(DamageFlags::FORCE_HIT),
    );
    assert_eq!(report.dealt, 150);
}

#[test]
fn shield_absorbs_before_hp() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    state.units[1].shield = 30;
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let report = engine.resolve_damage(
        None,
        UnitId(1),
        50,
        DamageType::True,
        DamageOptions::new(DamageFlags::DOT),
    );
    assert_eq!(report.dealt, 50);
    assert_eq!(report.absorbed, 30);
    assert_eq!(engine.state().units[1].shield, 0);
    assert_eq!(engine.state().units[1].hp, 180);
}

#[test]
fn reflect_returns_true_damage_once() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    state.units[1].statuses.apply(StatusKind::Reflect, 0.5, 2);
    state.units[0].statuses.apply(StatusKind::Reflect, 0.5, 2);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        100,
        DamageType::True,
        DamageOptions::new(DamageFlags::FORCE_HIT),
    );

    assert_eq!(engine.state().units[1].hp, 100);
    // 50 reflected; the reflected hit is not bounced back again.
    assert_eq!(engine.state().units[0].hp, 150);
}

#[test]
fn kill_refund_tops_up_rage() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let assassin = unit(Role::Assassin, Tribe::Night, 2, 4)
        .with_skill("execute")
        .with_stats(BaseStats {
            rage_max: 2,
            ..fighter(0, 0).stats
        });
    let mut state = build(&[assassin], &[fighter(2, 9)], &config);
    state.units[0].rage = 1;
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let def = catalog.get("execute").unwrap();
    let resolution = engine.apply_skill_effect(UnitId(0), def, None);

    assert_eq!(resolution.kills, 1);
    assert!(!engine.state().is_alive(UnitId(1)));
    assert_eq!(engine.state().units[0].rage, 2);
}

#[test]
fn currency_is_awarded_to_the_ally_side_only() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let def = catalog.get("bounty").unwrap();

    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5), fighter(3, 5)], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));
    engine.apply_skill_effect(UnitId(0), def, Some(UnitId(1)));
    engine.apply_skill_effect(UnitId(2), def, Some(UnitId(0)));
    assert_eq!(state.ally_currency, 3);
}

#[test]
fn casting_resets_rage_before_effects() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    state.units[0].rage = 3;
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let events = engine.step();
    let cast = events.iter().any(|e| {
        matches!(e, BattleEvent::ActionResolved { action: ActionKind::Skill { skill }, .. } if skill == "strike")
    });
    assert!(cast);
    // reset to 0, then +1 for the connecting hit
    assert_eq!(engine.state().units[0].rage, 1);
}

#[test]
fn stunned_actor_skips_and_consumes_the_turn() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    state.units[0].statuses.apply(StatusKind::Stun, 1.0, 1);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let events = engine.step();
    assert!(events.contains(&BattleEvent::ActionSkipped {
        actor: UnitId(0),
        reason: SkipReason::Stunned,
    }));
    assert!(events.contains(&BattleEvent::StatusExpired {
        target: UnitId(0),
        kind: StatusKind::Stun,
    }));
    assert_eq!(engine.state().turn.action_count, 1);
    assert!(!engine.state().units[0].statuses.has(StatusKind::Stun));
}

#[test]
fn damage_over_time_can_kill_before_acting() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4), fighter(3, 4)], &[fighter(2, 5)], &config);
    state.units[0].hp = 5;
    state.units[0].statuses.apply(StatusKind::Poison, 10.0, 3);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let events = engine.step();
    assert!(events.contains(&BattleEvent::ActionSkipped {
        actor: UnitId(0),
        reason: SkipReason::DiedToStatus,
    }));
    assert!(!engine.state().is_alive(UnitId(0)));
    assert_eq!(engine.state().units[2].hp, 200);
}

#[test]
fn taunt_overrides_scoring() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5), fighter(0, 9)], &config);
    state.units[0].statuses.apply_taunt(UnitId(2), 2);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    assert_eq!(engine.choose_target(UnitId(0)), Some(UnitId(2)));
}

#[test]
fn knockback_stops_before_a_tank() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(
        &[fighter(2, 3)],
        &[unit(Role::Tanker, Tribe::Stone, 2, 6), fighter(2, 5)],
        &config,
    );
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    // Enemy at col 5 pushed toward col 9 is stopped by the tank at col 6.
    engine.knockback(UnitId(2), 1);
    assert_eq!(engine.state().units[2].pos.col, 5);

    // Pushing the tank itself slides it to the edge.
    engine.knockback(UnitId(1), 1);
    assert_eq!(engine.state().units[1].pos.col, 9);
}

#[test]
fn turn_order_interleaves_equal_speeds_ally_first() {
    let config = BattleConfig::default();
    let state = build(
        &[fighter(0, 4), fighter(0, 1)],
        &[fighter(0, 5), fighter(1, 5).with_speed(150)],
        &config,
    );
    let order: Vec<UnitId> = build_turn_order(&state, &config.board).into_iter().collect();
    assert_eq!(order, vec![UnitId(3), UnitId(0), UnitId(2), UnitId(1)]);
}

#[test]
fn turn_cap_ends_in_a_draw_by_default() {
    let config = BattleConfig::default().with_turn_cap(3);
    let catalog = catalog();
    let tough = BaseStats {
        hp: 100_000,
        ..fighter(0, 0).stats
    };
    let mut state = build(
        &[fighter(2, 4).with_stats(tough)],
        &[fighter(2, 5).with_stats(tough)],
        &config,
    );
    let report = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &PcgRng)).run();

    assert_eq!(report.outcome.reason, EndReason::TurnCap);
    assert!(report.outcome.is_draw());
    assert_eq!(report.outcome.turns, 3);
}

#[test]
fn hp_total_resolution_favors_allies_on_ties() {
    let mut config = BattleConfig::default().with_turn_cap(0);
    config.cap_resolution = CapResolution::HpTotal;
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    let report = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &PcgRng)).run();

    assert_eq!(report.outcome.winner, Some(Side::Ally));
    assert_eq!(report.outcome.reason, EndReason::TurnCap);
}

#[test]
fn battles_are_deterministic_and_terminate() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let allies = [fighter(1, 4), unit(Role::Archer, Tribe::Wind, 2, 1)];
    let enemies = [fighter(1, 5), unit(Role::Mage, Tribe::Night, 3, 8)];

    let mut first = build(&allies, &enemies, &config);
    let mut second = build(&allies, &enemies, &config);
    let a = BattleEngine::new(&mut first, BattleEnv::new(&config, &catalog, &PcgRng)).run();
    let b = BattleEngine::new(&mut second, BattleEnv::new(&config, &catalog, &PcgRng)).run();

    assert_eq!(a, b);
    assert!(a.outcome.turns <= config.turn_cap);
    assert!(matches!(a.events.last(), Some(BattleEvent::BattleEnded(_))));
}

#[test]
fn abort_is_honored_at_the_next_turn_boundary() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let handle = AbortHandle::new();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &PcgRng))
        .with_abort(handle.clone());

    engine.step();
    handle.abort();
    let events = engine.step();

    assert_eq!(engine.state().turn.action_count, 1);
    assert!(matches!(
        events.as_slice(),
        [BattleEvent::BattleEnded(outcome)] if outcome.reason == EndReason::Aborted
    ));
    assert!(engine.step().is_empty());
}

fn damage_sources(events: &[BattleEvent]) -> Vec<Option<UnitId>> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::Damage { source, .. } => Some(*source),
            _ => None,
        })
        .collect()
}

#[test]
fn skill_damage_can_be_evaded() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let slippery = fighter(2, 5).with_mods(UnitMods {
        evasion: 0.6,
        ..UnitMods::default()
    });
    let mut state = build(&[fighter(2, 4)], &[slippery], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &NEVER));

    let def = catalog.get("strike").unwrap();
    let resolution = engine.apply_skill_effect(UnitId(0), def, Some(UnitId(1)));

    assert_eq!(resolution.total_damage, 0);
    assert_eq!(engine.state().units[1].hp, 200);
    assert!(engine.drain_events().contains(&BattleEvent::Evaded {
        source: Some(UnitId(0)),
        target: UnitId(1),
    }));
}

#[test]
fn skip_evasion_skills_always_connect() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let slippery = fighter(2, 5).with_mods(UnitMods {
        evasion: 0.6,
        ..UnitMods::default()
    });
    let mut state = build(&[fighter(2, 4)], &[slippery], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &NEVER));

    let def = catalog.get("sure_strike").unwrap();
    let resolution = engine.apply_skill_effect(UnitId(0), def, Some(UnitId(1)));

    assert!(resolution.total_damage > 0);
    assert!(engine.state().units[1].hp < 200);
}

#[test]
fn physical_skill_hits_can_crit_but_magic_ones_cannot() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5)], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    engine.apply_skill_effect(UnitId(0), catalog.get("strike").unwrap(), Some(UnitId(1)));
    let physical = engine.drain_events();
    assert!(physical.iter().any(|e| matches!(e, BattleEvent::Damage { crit: true, .. })));

    engine.apply_skill_effect(UnitId(0), catalog.get("zap").unwrap(), Some(UnitId(1)));
    let magic = engine.drain_events();
    assert!(magic.iter().any(|e| matches!(e, BattleEvent::Damage { crit: false, .. })));
    assert!(!magic.iter().any(|e| matches!(e, BattleEvent::Damage { crit: true, .. })));
}

#[test]
fn death_refreshes_the_speed_multiplier() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(&[fighter(2, 4)], &[fighter(2, 5), fighter(3, 5)], &config);
    // two enemies alive: 1 + 0.1 × 2
    assert!((state.speed_multiplier - 1.2).abs() < 1e-9);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    engine.resolve_damage(
        Some(UnitId(0)),
        UnitId(1),
        10_000,
        DamageType::True,
        DamageOptions::new(DamageFlags::FORCE_HIT),
    );

    let events = engine.drain_events();
    let changed: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::SpeedMultiplierChanged { multiplier } => Some(*multiplier),
            _ => None,
        })
        .collect();
    assert_eq!(changed.len(), 1);
    assert!((changed[0] - 1.1).abs() < 1e-9);
    assert!((engine.state().speed_multiplier - 1.1).abs() < 1e-9);
}

#[test]
fn frenzy_calls_in_a_same_row_assist() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let monkey = fighter(2, 3).with_skill("frenzy");
    let mut state = build(
        &[monkey, fighter(2, 1), fighter(1, 3)],
        &[fighter(2, 5).with_stats(BaseStats {
            hp: 5_000,
            ..fighter(0, 0).stats
        })],
        &config,
    );
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    let def = catalog.get("frenzy").unwrap();
    let resolution = engine.apply_skill_effect(UnitId(0), def, Some(UnitId(3)));

    let sources = damage_sources(&engine.drain_events());
    assert_eq!(sources, vec![Some(UnitId(0)), Some(UnitId(1))]);
    assert!(engine.state().units[0].statuses.has(StatusKind::AtkBuff));
    assert_eq!(resolution.total_damage, 5_000 - engine.state().units[3].hp);
}

#[test]
fn frenzy_without_a_row_mate_strikes_alone() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let monkey = fighter(2, 3).with_skill("frenzy");
    let mut state = build(&[monkey, fighter(1, 3)], &[fighter(2, 5)], &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    engine.apply_skill_effect(UnitId(0), catalog.get("frenzy").unwrap(), Some(UnitId(2)));

    assert_eq!(damage_sources(&engine.drain_events()), vec![Some(UnitId(0))]);
}

#[test]
fn cleave_breaks_armor_across_the_row() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(
        &[fighter(2, 4).with_skill("cleave")],
        &[fighter(2, 5), fighter(2, 7), fighter(1, 5)],
        &config,
    );
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    engine.apply_skill_effect(UnitId(0), catalog.get("cleave").unwrap(), Some(UnitId(1)));

    let units = &engine.state().units;
    assert!(units[1].statuses.has(StatusKind::ArmorBreak));
    assert!(units[2].statuses.has(StatusKind::ArmorBreak));
    assert!(!units[3].statuses.has(StatusKind::ArmorBreak));
    assert_eq!(units[3].hp, 200);
}

#[test]
fn row_guard_raises_armor_and_magic_defense() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let mut state = build(
        &[fighter(2, 3).with_skill("guard"), fighter(2, 1), fighter(1, 3)],
        &[fighter(2, 5)],
        &config,
    );
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &ALWAYS));

    engine.apply_skill_effect(UnitId(0), catalog.get("guard").unwrap(), None);

    let units = &engine.state().units;
    for guarded in &units[..2] {
        assert!(guarded.statuses.has(StatusKind::DefBuff));
        assert!(guarded.statuses.has(StatusKind::MdefBuff));
    }
    assert!(!units[2].statuses.has(StatusKind::MdefBuff));
    assert_eq!(units[1].effective_mdef(), 28.0);
}
