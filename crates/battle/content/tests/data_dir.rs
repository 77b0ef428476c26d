//! Loading content from a data directory on disk and running it.

use std::fs;

use battle_content::ContentFactory;
use battle_core::{BattleEngine, BattleEnv, BattleEvent, BattleState, PcgRng, StatusKind};
use tempfile::TempDir;

const SKILLS: &str = r#"(skills: [
    (id: "slash", effect: "single_burst", params: (base: 30.0, scale: 1.2)),
    (id: "guard", effect: "damage_shield_taunt",
        params: (base: 10.0, scale: 0.5, shield_base: 40.0, turns: 2)),
])"#;

const UNITS: &str = r#"(units: [
    (id: "knight", role: tanker, tribe: stone, skill: "guard",
        stats: (hp: 400, atk: 30, def: 25, matk: 0, mdef: 20, rage_max: 4)),
    (id: "raider", role: fighter, tribe: fire, skill: "slash", speed: 120,
        stats: (hp: 250, atk: 45, def: 10, matk: 0, mdef: 10, rage_max: 3)),
])"#;

const ROSTER: &str = r#"(
    allies: [
        (template: "knight", position: (row: 1, col: 2)),
        (template: "raider", position: (row: 2, col: 2), statuses: (hasteTurns: 3)),
    ],
    enemies: [
        (template: "raider", position: (row: 1, col: 3), star: 2),
    ],
)"#;

fn write_data_dir(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), config).unwrap();
    fs::write(dir.path().join("skills.ron"), SKILLS).unwrap();
    fs::write(dir.path().join("units.ron"), UNITS).unwrap();
    fs::create_dir(dir.path().join("rosters")).unwrap();
    fs::write(dir.path().join("rosters").join("skirmish.ron"), ROSTER).unwrap();
    dir
}

#[test]
fn loads_and_runs_a_battle_from_disk() {
    let dir = write_data_dir("turn_cap = 80\n[board]\nrows = 4\ncols = 6\n");
    let factory = ContentFactory::new(dir.path());

    let config = factory.load_config().unwrap();
    let skills = factory.load_skills().unwrap();
    let units = factory.load_units(&skills).unwrap();
    let (allies, enemies) = factory
        .load_roster("skirmish")
        .unwrap()
        .resolve(&units, &config)
        .unwrap();

    assert_eq!(config.turn_cap, 80);
    assert_eq!(allies[1].statuses.effects[0].kind, StatusKind::EvadeBuff);

    let rng = PcgRng;
    let mut state = BattleState::new(11, &allies, &enemies, &config, &skills).unwrap();
    let report = BattleEngine::new(&mut state, BattleEnv::new(&config, &skills, &rng)).run();

    assert!(report.outcome.turns <= 80);
    assert!(matches!(report.events.last(), Some(BattleEvent::BattleEnded(_))));
}

#[test]
fn missing_roster_names_the_path() {
    let dir = write_data_dir("");
    let err = ContentFactory::new(dir.path())
        .load_roster("nowhere")
        .unwrap_err();
    assert!(err.to_string().contains("nowhere.ron"), "{err}");
}

#[test]
fn unit_with_unknown_skill_fails_the_load() {
    let dir = write_data_dir("");
    fs::write(
        dir.path().join("units.ron"),
        r#"(units: [(id: "mime", role: support, tribe: spirit, skill: "silent_scream",
            stats: (hp: 100, atk: 1, def: 1, matk: 1, mdef: 1, rage_max: 2))])"#,
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    let skills = factory.load_skills().unwrap();
    let err = factory.load_units(&skills).unwrap_err();
    assert!(err.to_string().contains("silent_scream"), "{err}");
}

#[test]
fn unknown_effect_tag_in_file_fails_the_load() {
    let dir = write_data_dir("");
    fs::write(
        dir.path().join("skills.ron"),
        r#"(skills: [(id: "warp", effect: "teleport_strike")])"#,
    )
    .unwrap();

    let err = ContentFactory::new(dir.path()).load_skills().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("teleport_strike"), "{message}");
    assert!(message.contains("skills.ron"), "{message}");
}
