//! Random-draft battle batches.
//!
//! Battle `i` of a batch drafts its teams from an RNG seeded with
//! `compute_seed(seed, i, DRAFT_STREAM, 0)` and fights with
//! `compute_seed(seed, i, BATTLE_STREAM, 0)`, so records do not depend on
//! which worker ran them or in what order.

use combat_content::ContentLibrary;
use combat_core::{Battle, BattleOutcome, StatOverrides, Unit, UnitTemplateProvider, compute_seed};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::digest::outcome_digest;
use crate::error::{Result, SimError};
use crate::pool::WorkerPool;
use crate::stats::{BatchSummary, MatchupTable};

const DRAFT_STREAM: u32 = 1;
const BATTLE_STREAM: u32 = 2;

/// Number of progress reports logged over one batch.
const PROGRESS_STEPS: usize = 10;

// ============================================================================
// Roster
// ============================================================================

/// Builds fresh units from a content library and fights them.
#[derive(Clone, Copy)]
pub struct Roster<'a> {
    library: &'a ContentLibrary,
}

impl<'a> Roster<'a> {
    pub fn new(library: &'a ContentLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &'a ContentLibrary {
        self.library
    }

    /// Assembles one hero with `overrides` layered over its base stats.
    pub fn hero(&self, name: &str, overrides: &StatOverrides) -> Result<Unit> {
        self.library
            .units()
            .create(name, overrides)
            .ok_or_else(|| SimError::UnknownHero(name.to_owned()))
    }

    pub fn team(&self, names: &[String]) -> Result<Vec<Unit>> {
        let overrides = StatOverrides::new();
        names.iter().map(|name| self.hero(name, &overrides)).collect()
    }

    /// Fights one silent battle under the library's combat configuration.
    pub fn fight(&self, side_a: Vec<Unit>, side_b: Vec<Unit>, seed: u64) -> Result<BattleOutcome> {
        let mut battle = Battle::new(side_a, side_b, self.library.effects())?
            .with_seed(seed)
            .with_config(self.library.config().clone())
            .narrated(false);
        Ok(battle.run())
    }
}

// ============================================================================
// Drafting
// ============================================================================

/// Hero names on each side of one drafted battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub side_a: Vec<String>,
    pub side_b: Vec<String>,
}

/// Draws two disjoint teams of `team_size` heroes.
pub fn draft_teams(heroes: &[String], team_size: usize, seed: u64) -> Result<Draft> {
    if team_size == 0 {
        return Err(SimError::EmptyTeam);
    }
    let needed = team_size * 2;
    if heroes.len() < needed {
        return Err(SimError::RosterTooSmall {
            needed,
            available: heroes.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let side_a: Vec<String> = heroes.choose_multiple(&mut rng, team_size).cloned().collect();
    let bench: Vec<&String> = heroes.iter().filter(|hero| !side_a.contains(hero)).collect();
    let side_b = bench
        .choose_multiple(&mut rng, team_size)
        .map(|hero| (*hero).clone())
        .collect();

    Ok(Draft { side_a, side_b })
}

// ============================================================================
// Batches
// ============================================================================

/// One battle of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BattleRecord {
    pub index: u64,
    pub seed: u64,
    pub draft: Draft,
    pub outcome: BattleOutcome,
}

/// Records of a batch, in battle index order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub seed: u64,
    pub team_size: usize,
    pub records: Vec<BattleRecord>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_outcomes(self.records.iter().map(|record| &record.outcome))
    }

    pub fn matchups(&self) -> MatchupTable {
        MatchupTable::from_records(&self.records)
    }

    /// Hex digest of every outcome in index order.
    pub fn digest(&self) -> Result<String> {
        outcome_digest(self.records.iter().map(|record| &record.outcome))
    }
}

/// Runs `battles` random-draft battles of `team_size` heroes per side.
pub fn run_batch(
    library: &ContentLibrary,
    battles: u32,
    team_size: usize,
    seed: u64,
    pool: &WorkerPool,
) -> Result<BatchReport> {
    let heroes = library.hero_names();
    // Fail before spawning any work if the roster cannot be drafted.
    draft_teams(&heroes, team_size, seed)?;

    let roster = Roster::new(library);
    let total = battles as usize;
    let mut records = Vec::with_capacity(total);

    for (start, end) in batch_ranges(total, PROGRESS_STEPS) {
        let chunk = pool.install(|| {
            (start as u64..end as u64)
                .into_par_iter()
                .map(|index| fight_drafted(&roster, &heroes, team_size, seed, index))
                .collect::<Result<Vec<_>>>()
        })??;
        records.extend(chunk);
        info!(
            target: "combat::sim",
            done = end,
            total,
            "batch progress {:.0}%",
            end as f64 / total as f64 * 100.0
        );
    }

    Ok(BatchReport {
        seed,
        team_size,
        records,
    })
}

fn fight_drafted(
    roster: &Roster<'_>,
    heroes: &[String],
    team_size: usize,
    seed: u64,
    index: u64,
) -> Result<BattleRecord> {
    let draft = draft_teams(heroes, team_size, compute_seed(seed, index, DRAFT_STREAM, 0))?;
    let battle_seed = compute_seed(seed, index, BATTLE_STREAM, 0);
    let outcome = roster.fight(
        roster.team(&draft.side_a)?,
        roster.team(&draft.side_b)?,
        battle_seed,
    )?;
    debug!(
        target: "combat::sim",
        index,
        winner = %outcome.winner,
        rounds = outcome.rounds,
        "battle finished"
    );
    Ok(BattleRecord {
        index,
        seed: battle_seed,
        draft,
        outcome,
    })
}

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; earlier batches take the
/// remainder.
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let end = start + base + usize::from(i < remainder);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn batch_ranges_split_evenly() {
        assert_eq!(batch_ranges(100, 4), vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
        assert_eq!(batch_ranges(10, 3), vec![(0, 4), (4, 7), (7, 10)]);
    }

    #[test]
    fn batch_ranges_never_exceed_items() {
        assert_eq!(batch_ranges(3, 10), vec![(0, 1), (1, 2), (2, 3)]);
        assert!(batch_ranges(0, 5).is_empty());
        assert!(batch_ranges(10, 0).is_empty());
    }

    #[test]
    fn drafted_teams_are_disjoint() {
        let heroes = roster(&["a", "b", "c", "d", "e", "f", "g"]);

        for seed in 0..32 {
            let draft = draft_teams(&heroes, 3, seed).unwrap();
            assert_eq!(draft.side_a.len(), 3);
            assert_eq!(draft.side_b.len(), 3);
            assert!(draft.side_a.iter().all(|hero| !draft.side_b.contains(hero)));
        }
    }

    #[test]
    fn drafts_repeat_for_a_seed() {
        let heroes = roster(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(draft_teams(&heroes, 2, 9).unwrap(), draft_teams(&heroes, 2, 9).unwrap());
    }

    #[test]
    fn undersized_rosters_are_rejected() {
        let heroes = roster(&["a", "b", "c"]);

        assert!(matches!(
            draft_teams(&heroes, 2, 0),
            Err(SimError::RosterTooSmall { needed: 4, available: 3 })
        ));
        assert!(matches!(draft_teams(&heroes, 0, 0), Err(SimError::EmptyTeam)));
    }
}
