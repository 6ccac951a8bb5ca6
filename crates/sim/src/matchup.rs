//! Fixed-team matchups and stat-override trials.

use combat_content::ContentLibrary;
use combat_core::{BattleOutcome, Side, StatOverrides, compute_seed};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::batch::Roster;
use crate::error::Result;
use crate::pool::WorkerPool;
use crate::stats::BatchSummary;

const MATCHUP_STREAM: u32 = 3;
const TRIAL_STREAM: u32 = 4;

/// Repeated battles between two fixed teams.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchupReport {
    pub side_a: Vec<String>,
    pub side_b: Vec<String>,
    pub summary: BatchSummary,
}

/// Result of fighting one hero with overridden stats against a fixed team.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverrideTrial {
    pub hero: String,
    pub overrides: StatOverrides,
    pub summary: BatchSummary,
}

impl OverrideTrial {
    pub fn win_rate(&self) -> f64 {
        self.summary.win_rate(Side::A)
    }

    pub fn average_rounds(&self) -> f64 {
        self.summary.average_rounds()
    }
}

/// Fights `side_a` against `side_b` `battles` times with fresh units each
/// battle.
pub fn run_matchup(
    library: &ContentLibrary,
    side_a: &[String],
    side_b: &[String],
    battles: u32,
    seed: u64,
    pool: &WorkerPool,
) -> Result<MatchupReport> {
    let roster = Roster::new(library);
    // Surface unknown heroes once, before the parallel run.
    roster.team(side_a)?;
    roster.team(side_b)?;

    let outcomes = fight_repeatedly(pool, battles, |index| {
        roster.fight(
            roster.team(side_a)?,
            roster.team(side_b)?,
            compute_seed(seed, index, MATCHUP_STREAM, 0),
        )
    })?;

    let report = MatchupReport {
        side_a: side_a.to_vec(),
        side_b: side_b.to_vec(),
        summary: BatchSummary::from_outcomes(&outcomes),
    };
    info!(
        target: "combat::sim",
        battles,
        side_a_wins = report.summary.side_a_wins,
        side_b_wins = report.summary.side_b_wins,
        draws = report.summary.draws,
        "matchup complete"
    );
    Ok(report)
}

/// Fights `hero`, with `overrides` layered over its base stats, alone
/// against `opponent` `battles` times. The hero always fights as side A.
pub fn evaluate_overrides(
    library: &ContentLibrary,
    hero: &str,
    overrides: &StatOverrides,
    opponent: &[String],
    battles: u32,
    seed: u64,
    pool: &WorkerPool,
) -> Result<OverrideTrial> {
    let roster = Roster::new(library);
    roster.hero(hero, overrides)?;
    roster.team(opponent)?;

    let outcomes = fight_repeatedly(pool, battles, |index| {
        roster.fight(
            vec![roster.hero(hero, overrides)?],
            roster.team(opponent)?,
            compute_seed(seed, index, TRIAL_STREAM, 0),
        )
    })?;

    Ok(OverrideTrial {
        hero: hero.to_owned(),
        overrides: overrides.clone(),
        summary: BatchSummary::from_outcomes(&outcomes),
    })
}

fn fight_repeatedly<F>(pool: &WorkerPool, battles: u32, fight: F) -> Result<Vec<BattleOutcome>>
where
    F: Fn(u64) -> Result<BattleOutcome> + Sync,
{
    pool.install(|| {
        (0..u64::from(battles))
            .into_par_iter()
            .map(&fight)
            .collect::<Result<Vec<_>>>()
    })?
}
