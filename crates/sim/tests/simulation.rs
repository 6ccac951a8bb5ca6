use combat_content::ContentLibrary;
use combat_core::{Side, StatOverrides};
use combat_sim::{SimError, WorkerPool, evaluate_overrides, run_batch, run_matchup};

fn library() -> ContentLibrary {
    ContentLibrary::builtin().unwrap()
}

fn team(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[test]
fn batches_do_not_depend_on_worker_count() {
    let library = library();

    let serial = run_batch(&library, 24, 3, 7, &WorkerPool::with_workers(1)).unwrap();
    let parallel = run_batch(&library, 24, 3, 7, &WorkerPool::with_workers(4)).unwrap();

    assert_eq!(serial, parallel);
    assert_eq!(serial.digest().unwrap(), parallel.digest().unwrap());
    assert_eq!(
        serde_json::to_string(&serial).unwrap(),
        serde_json::to_string(&parallel).unwrap()
    );
}

#[test]
fn different_seeds_draft_differently() {
    let library = library();
    let pool = WorkerPool::default_workers();

    let first = run_batch(&library, 16, 3, 1, &pool).unwrap();
    let second = run_batch(&library, 16, 3, 2, &pool).unwrap();

    let drafts = |report: &combat_sim::BatchReport| {
        report.records.iter().map(|record| record.draft.clone()).collect::<Vec<_>>()
    };
    assert_ne!(drafts(&first), drafts(&second));
}

#[test]
fn records_are_indexed_and_tallied() {
    let library = library();

    let report = run_batch(&library, 30, 2, 11, &WorkerPool::with_workers(2)).unwrap();

    let indices: Vec<_> = report.records.iter().map(|record| record.index).collect();
    assert_eq!(indices, (0..30).collect::<Vec<u64>>());

    let summary = report.summary();
    assert_eq!(summary.battles, 30);
    assert_eq!(summary.side_a_wins + summary.side_b_wins + summary.draws, 30);
    assert!(summary.average_rounds() >= 1.0);

    let table = report.matchups();
    let hero_games: u32 = table.heroes().filter_map(|hero| table.hero(hero)).map(|r| r.games).sum();
    assert_eq!(hero_games, 30 * 4);
    let hero_wins: u32 = table.heroes().filter_map(|hero| table.hero(hero)).map(|r| r.wins).sum();
    assert_eq!(hero_wins, (summary.side_a_wins + summary.side_b_wins) * 2);
}

#[test]
fn oversized_teams_are_rejected() {
    let library = library();
    let heroes = library.units().len();

    let result = run_batch(&library, 4, heroes, 0, &WorkerPool::default_workers());

    assert!(matches!(result, Err(SimError::RosterTooSmall { .. })));
}

#[test]
fn fixed_matchups_are_reproducible() {
    let library = library();
    let side_a = team(&["garrosh", "jaina", "arthas"]);
    let side_b = team(&["illidan", "thrall", "tyrande"]);
    let pool = WorkerPool::with_workers(2);

    let first = run_matchup(&library, &side_a, &side_b, 12, 5, &pool).unwrap();
    let second = run_matchup(&library, &side_a, &side_b, 12, 5, &pool).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.summary.battles, 12);
    let rates = first.summary.win_rate(Side::A) + first.summary.win_rate(Side::B) + first.summary.draw_rate();
    assert!((rates - 100.0).abs() < 1e-9);
}

#[test]
fn unknown_heroes_fail_the_matchup() {
    let library = library();

    let result = run_matchup(
        &library,
        &team(&["garrosh"]),
        &team(&["medivh"]),
        3,
        0,
        &WorkerPool::default_workers(),
    );

    assert!(matches!(result, Err(SimError::UnknownHero(name)) if name == "medivh"));
}

#[test]
fn stat_overrides_change_the_result() {
    let library = library();
    let overrides = StatOverrides::from([
        ("hp".to_string(), 1_000_000.0),
        ("attack".to_string(), 10_000.0),
    ]);

    let trial = evaluate_overrides(
        &library,
        "garrosh",
        &overrides,
        &team(&["jaina"]),
        6,
        3,
        &WorkerPool::default_workers(),
    )
    .unwrap();

    assert_eq!(trial.summary.battles, 6);
    assert_eq!(trial.win_rate(), 100.0);
    assert!(trial.average_rounds() >= 1.0);
    assert_eq!(
        library.units().get("garrosh").unwrap().base_stats.hp,
        620.0,
        "overrides must not touch the template"
    );
}
