//! Headless simulator entry point.
use std::fs;

use anyhow::{Context, Result};
use combat_content::{ContentFactory, ContentLibrary};
use combat_core::Side;
use combat_sim::{
    BatchReport, MatchupReport, MatchupTable, SimConfig, WorkerPool, run_batch, run_matchup,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TOP_MATCHUPS: usize = 15;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let library = load_library(&config)?;
    let pool = WorkerPool::with_workers(config.workers);

    info!(
        target: "combat::sim",
        heroes = library.units().len(),
        battles = config.battles,
        team_size = config.team_size,
        seed = config.seed,
        "starting batch"
    );
    let report = run_batch(&library, config.battles, config.team_size, config.seed, &pool)?;
    print_batch(&report);

    let table = report.matchups();
    print_rankings(&table, config.ranking_min_games);
    print_matchups(&table, config.min_games);
    print_relationships(&table, config.min_games);

    let matchup = run_matchup(
        &library,
        &config.matchup_side_a,
        &config.matchup_side_b,
        config.matchup_battles,
        config.seed,
        &pool,
    )?;
    print_matchup(&matchup);

    println!("\nDigest: {}", report.digest()?);

    if let Some(path) = &config.output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(target: "combat::sim", path = %path.display(), "batch records written");
    }
    Ok(())
}

fn load_library(config: &SimConfig) -> Result<ContentLibrary> {
    match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_library(),
        None => ContentLibrary::builtin(),
    }
}

fn print_batch(report: &BatchReport) {
    let summary = report.summary();
    println!("Batch: {} battles, {}v{}", summary.battles, report.team_size, report.team_size);
    println!("  Side A wins: {} ({:.1}%)", summary.side_a_wins, summary.win_rate(Side::A));
    println!("  Side B wins: {} ({:.1}%)", summary.side_b_wins, summary.win_rate(Side::B));
    println!("  Draws:       {} ({:.1}%)", summary.draws, summary.draw_rate());
    if summary.truncated > 0 {
        println!("  Round limit: {}", summary.truncated);
    }
    println!("  Avg rounds:  {:.1}", summary.average_rounds());
}

fn print_rankings(table: &MatchupTable, min_games: u32) {
    println!("\nHero win rates (min {min_games} games):");
    for (rank, ranking) in table.rankings(min_games).iter().enumerate() {
        println!(
            "{:2}. {:12} {:5.1}% ({:3}/{:3})",
            rank + 1,
            ranking.hero,
            ranking.record.percent(),
            ranking.record.wins,
            ranking.record.games
        );
    }
}

fn print_matchups(table: &MatchupTable, min_games: u32) {
    let matchups = table.matchups(min_games);
    if matchups.is_empty() {
        println!("\nNo hero pairing reached {min_games} games.");
        return;
    }
    println!("\nHero vs hero (min {min_games} games):");
    for matchup in matchups.iter().take(TOP_MATCHUPS) {
        println!(
            "{:12} vs {:12} {:5.1}% ({:2}/{:2})",
            matchup.hero,
            matchup.opponent,
            matchup.record.percent(),
            matchup.record.wins,
            matchup.record.games
        );
    }
}

fn print_relationships(table: &MatchupTable, min_games: u32) {
    let counters = table.strongest_counters(min_games);
    if !counters.is_empty() {
        println!("\nStrong counters:");
        for counter in &counters {
            println!(
                "  {} counters {} ({:.1}%, {} games)",
                counter.hero,
                counter.opponent,
                counter.record.percent(),
                counter.record.games
            );
        }
    }

    let balanced = table.balanced_pairings(min_games);
    if !balanced.is_empty() {
        println!("\nBalanced pairings:");
        for pairing in &balanced {
            println!(
                "  {} vs {} ({:.1}% vs {:.1}%, {} games)",
                pairing.first,
                pairing.second,
                pairing.first_share,
                100.0 - pairing.first_share,
                pairing.games
            );
        }
    }
}

fn print_matchup(report: &MatchupReport) {
    let summary = &report.summary;
    println!("\nMatchup: {} vs {}", report.side_a.join(", "), report.side_b.join(", "));
    println!("  Battles:     {}", summary.battles);
    println!("  Side A wins: {} ({:.1}%)", summary.side_a_wins, summary.win_rate(Side::A));
    println!("  Side B wins: {} ({:.1}%)", summary.side_b_wins, summary.win_rate(Side::B));
    println!("  Draws:       {} ({:.1}%)", summary.draws, summary.draw_rate());
    println!("  Avg rounds:  {:.1}", summary.average_rounds());
}
