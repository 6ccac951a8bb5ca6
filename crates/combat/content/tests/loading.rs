//! Loading content from disk and fighting with the built-in roster.

use std::fs;

use combat_content::{ContentFactory, ContentLibrary};
use combat_core::{
    ActionInterpreter, Arena, EffectTemplateProvider, ParamBag, SkillTemplateProvider,
    StatOverrides, UnitTemplateProvider, Winner, run_battle,
};

const EFFECTS: &str = r#"{
    "sharpen": (
        default_params: {"duration": "infinite", "potency": 0.5, "target_attribute": "attack"},
        logic_hooks: {"PASSIVE": [{"type": "modify_attribute", "returns": {"ratio": "1 + effect.potency"}}]},
    ),
}"#;

const SKILLS: &str = r#"{
    "whetstone": (target_type: "self", effects: [{"name": "sharpen"}], cooldown: 99),
}"#;

const HEROES: &str = r#"#![enable(implicit_some)]
{
    "duelist": (
        base_stats: (hp: 200.0, attack: 30.0, speed: 12.0, crit_rate: 0.0),
        skills: [(name: "whetstone")],
    ),
    "dummy": (base_stats: (hp: 400.0, attack: 1.0, speed: 1.0, crit_rate: 0.0)),
}"#;

fn write_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "round_limit = 50\n").unwrap();
    fs::write(dir.path().join("effects.ron"), EFFECTS).unwrap();
    fs::write(dir.path().join("skills.ron"), SKILLS).unwrap();
    fs::write(dir.path().join("heroes.ron"), HEROES).unwrap();
    dir
}

#[test]
fn factory_loads_a_data_directory() {
    let dir = write_data_dir();

    let library = ContentFactory::new(dir.path()).load_library().unwrap();

    assert_eq!(library.config().round_limit, Some(50));
    assert_eq!(library.hero_names(), ["duelist", "dummy"]);
    assert!(library.effects().contains("sharpen"));
}

#[test]
fn loaded_content_fights() {
    let dir = write_data_dir();
    let library = ContentFactory::new(dir.path()).load_library().unwrap();
    let units = library.units();

    let duelist = units.create("duelist", &StatOverrides::new()).unwrap();
    let dummy = units.create("dummy", &StatOverrides::new()).unwrap();
    let outcome = run_battle(vec![duelist], vec![dummy], library.effects(), 1, true).unwrap();

    // Round 1 sharpens, then 45 per hit: 400 HP falls on the ninth hit.
    assert_eq!(outcome.winner, Winner::Side(combat_core::Side::A));
    assert_eq!(outcome.rounds, 10);
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().unwrap();

    let error = ContentFactory::new(dir.path())
        .load_effects()
        .unwrap_err()
        .to_string();

    assert!(error.contains("effects.ron"), "{error}");
}

#[test]
fn broken_expressions_reject_the_directory() {
    let dir = write_data_dir();
    fs::write(
        dir.path().join("effects.ron"),
        r#"{"bad": (logic_hooks: {"ON_TURN_END": [{"type": "heal", "target": "owner", "amount": "effect.mana"}]})}"#,
    )
    .unwrap();

    assert!(ContentFactory::new(dir.path()).load_library().is_err());
}

#[test]
fn builtin_references_resolve() {
    let library = ContentLibrary::builtin().unwrap();

    for hero in library.hero_names() {
        let template = library.units().get(&hero).unwrap();
        for (skill, overrides) in &template.skills {
            let skill = library
                .skills()
                .create(skill, library.effects(), overrides)
                .unwrap_or_else(|| panic!("{hero}: unknown skill {skill}"));
            for request in skill.effects() {
                assert!(
                    library.effects().contains(&request.name),
                    "{hero}/{}: unknown effect {}",
                    skill.name(),
                    request.name
                );
            }
        }
    }
}

#[test]
fn builtin_passive_effects_modify_attributes() {
    let library = ContentLibrary::builtin().unwrap();
    let mut arena = Arena::new(ActionInterpreter::new());
    let garrosh = arena.spawn(
        library
            .units()
            .create("garrosh", &StatOverrides::new())
            .unwrap(),
    );

    let shout = library.effects().create("attack_up", &ParamBag::new()).unwrap();
    arena.attach_effect(garrosh, shout);
    assert_eq!(arena.attack(garrosh), 62);

    let sunder = library.effects().create("armor_break", &ParamBag::new()).unwrap();
    arena.attach_effect(garrosh, sunder);
    assert_eq!(arena.armor(garrosh), 15);
}

#[test]
fn builtin_battles_are_reproducible() {
    let library = ContentLibrary::builtin().unwrap();
    let team = |names: &[&str]| {
        names
            .iter()
            .map(|name| library.units().create(name, &StatOverrides::new()).unwrap())
            .collect::<Vec<_>>()
    };

    let fight = |seed| {
        run_battle(
            team(&["garrosh", "jaina", "tyrande"]),
            team(&["arthas", "illidan", "thrall"]),
            library.effects(),
            seed,
            true,
        )
        .unwrap()
    };

    let first = fight(11);
    assert_eq!(first, fight(11));
    assert!(first.rounds > 0);
}
