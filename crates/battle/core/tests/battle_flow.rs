//! End-to-end battles driven through the public API.

use std::io;
use std::sync::{Arc, Mutex};

use battle_core::{
    BattleConfig, BattleEngine, BattleEnv, BattleEvent, BattleState, DamageFlags, DamageOptions,
    DamageType, EffectTag, EndReason, GridPos, PcgRng, Role, SkillCatalog, SkillDef, SkillParams,
    Tribe, UnitId, UnitSpec,
};

fn def(id: &str, effect: EffectTag, damage_type: DamageType, params: SkillParams) -> SkillDef {
    SkillDef {
        id: id.into(),
        name: id.into(),
        effect,
        pattern: Default::default(),
        damage_type,
        params,
    }
}

fn catalog() -> SkillCatalog {
    SkillCatalog::from_defs([
        def("slash", EffectTag::SingleBurst, DamageType::Physical, SkillParams {
            base: 30.0,
            scale: 1.2,
            ..SkillParams::default()
        }),
        def("fireball", EffectTag::AoeCircle, DamageType::Magic, SkillParams {
            base: 20.0,
            scale: 1.0,
            scale_stat: battle_core::ScaleStat::Matk,
            star_radius_bonus: true,
            ..SkillParams::default()
        }),
        def("mend", EffectTag::DualHeal, DamageType::Magic, SkillParams {
            heal_base: 40.0,
            heal_scale: 0.5,
            max_targets: 2,
            ..SkillParams::default()
        }),
        def("bash", EffectTag::DamageStun, DamageType::Physical, SkillParams {
            base: 10.0,
            scale: 0.8,
            stun_turns: 1,
            stun_chance: 0.5,
            ..SkillParams::default()
        }),
        def("execute", EffectTag::AssassinExecuteRageRefund, DamageType::Physical, SkillParams {
            base: 400.0,
            kill_rage: 0.5,
            skip_evasion: true,
            ..SkillParams::default()
        }),
    ])
    .expect("test catalog is valid")
}

fn spec(role: Role, tribe: Tribe, skill: &str, row: i32, col: i32) -> UnitSpec {
    UnitSpec::new(format!("{role}"), role, tribe, GridPos::new(row, col)).with_skill(skill)
}

fn rosters() -> (Vec<UnitSpec>, Vec<UnitSpec>) {
    let allies = vec![
        spec(Role::Tanker, Tribe::Stone, "bash", 2, 4),
        spec(Role::Mage, Tribe::Fire, "fireball", 1, 1),
        spec(Role::Support, Tribe::Wood, "mend", 3, 0).with_speed(90),
    ];
    let enemies = vec![
        spec(Role::Fighter, Tribe::Wind, "slash", 2, 5),
        spec(Role::Assassin, Tribe::Night, "execute", 0, 6).with_speed(130),
        spec(Role::Archer, Tribe::Tide, "slash", 4, 9).with_star(2),
    ];
    (allies, enemies)
}

fn run(seed: u64, config: &BattleConfig) -> battle_core::BattleReport {
    let catalog = catalog();
    let (allies, enemies) = rosters();
    let mut state = BattleState::new(seed, &allies, &enemies, config, &catalog).unwrap();
    BattleEngine::new(&mut state, BattleEnv::new(config, &catalog, &PcgRng)).run()
}

#[test]
fn mixed_battle_reaches_a_terminal_event() {
    let config = BattleConfig::default();
    let report = run(42, &config);

    assert!(report.outcome.turns <= config.turn_cap);
    let ended: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, BattleEvent::BattleEnded(_)))
        .collect();
    assert_eq!(ended.len(), 1);
    assert!(matches!(
        report.outcome.reason,
        EndReason::Elimination | EndReason::TurnCap
    ));
}

#[test]
fn same_seed_replays_identically() {
    let config = BattleConfig::default();
    assert_eq!(run(9, &config), run(9, &config));
}

#[test]
fn every_death_is_reported_once() {
    let config = BattleConfig::default();
    let report = run(1234, &config);
    let mut dead: Vec<UnitId> = report
        .events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::UnitDied { unit, .. } => Some(*unit),
            _ => None,
        })
        .collect();
    let total = dead.len();
    dead.sort();
    dead.dedup();
    assert_eq!(dead.len(), total);
}

#[test]
fn ai_difficulty_scales_enemy_stats() {
    let catalog = catalog();
    let (allies, enemies) = rosters();
    let easy = BattleConfig::default().with_difficulty(battle_core::Difficulty::Easy);
    let state = BattleState::new(1, &allies, &enemies, &easy, &catalog).unwrap();

    let fighter = &state.units[3];
    // 200 × 0.84 = 168, 40 × 0.82 = 32.8 → 33
    assert_eq!(fighter.max_hp, 168);
    assert_eq!(fighter.atk, 33);
    // allies untouched
    assert_eq!(state.units[0].max_hp, 200);
}

#[test]
fn execute_refund_restores_rage() {
    let config = BattleConfig::default();
    let catalog = catalog();
    let assassin = spec(Role::Assassin, Tribe::Night, "execute", 2, 3).with_stats(battle_core::BaseStats {
        rage_max: 2,
        ..UnitSpec::new("x", Role::Assassin, Tribe::Night, GridPos::new(0, 0)).stats
    });
    let victim = spec(Role::Archer, Tribe::Wood, "slash", 4, 9);
    let mut state = BattleState::new(5, &[assassin], &[victim], &config, &catalog).unwrap();
    state.units[0].rage = 1;

    let skill = catalog.get("execute").unwrap();
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &PcgRng));
    engine.apply_skill_effect(UnitId(0), skill, None);

    assert!(!state.is_alive(UnitId(1)));
    assert_eq!(state.units[0].rage, 2);
}

#[test]
fn death_match_raises_the_damage_multiplier() {
    let mut config = BattleConfig::default();
    config.death_match.start_after = 0;
    config.death_match.interval = 1;
    config.turn_cap = 4;
    let report = run(3, &config);

    let multipliers: Vec<f64> = report
        .events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::DamageMultiplierChanged { multiplier } => Some(*multiplier),
            _ => None,
        })
        .collect();
    assert!(!multipliers.is_empty());
    assert!(multipliers.windows(2).all(|w| w[1] > w[0]));
}

/// `io::Write` sink shared with the test body.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn elemental_advantage_is_logged_with_tribes_and_roles() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let config = BattleConfig::default();
    let catalog = catalog();
    let attacker = spec(Role::Fighter, Tribe::Fire, "slash", 2, 4);
    let defender = spec(Role::Tanker, Tribe::Spirit, "slash", 2, 5);
    let mut state = BattleState::new(1, &[attacker], &[defender], &config, &catalog).unwrap();

    let report = tracing::subscriber::with_default(subscriber, || {
        let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&config, &catalog, &PcgRng));
        engine.resolve_damage(
            Some(UnitId(0)),
            UnitId(1),
            100,
            DamageType::True,
            DamageOptions::new(DamageFlags::FORCE_HIT),
        )
    });
    assert_eq!(report.dealt, 50);

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("elemental advantage applied"), "{output}");
    assert!(output.contains("attacker_tribe=fire"), "{output}");
    assert!(output.contains("defender_tribe=spirit"), "{output}");
    assert!(output.contains("defender_role=tanker"), "{output}");
    assert!(output.contains("modifier=0.5"), "{output}");
}

#[cfg(feature = "serde")]
#[test]
fn events_root_commits_to_the_replay() {
    let config = BattleConfig::default();
    let first = battle_core::compute_events_root(&run(77, &config).events);
    let second = battle_core::compute_events_root(&run(77, &config).events);
    let other = battle_core::compute_events_root(&run(78, &config).events);

    assert_eq!(hex::encode(first), hex::encode(second));
    assert_eq!(hex::encode(first).len(), 64);
    assert_ne!(first, other);
}
