//! Batch statistics.
//!
//! Every drafted battle counts one game for each participating hero and
//! one game in both directions for every cross-team hero pair. The winning
//! side's heroes (and their side of each pair) also score a win. Draws
//! count games only.

use std::collections::BTreeMap;

use combat_core::{BattleOutcome, Side, Winner};
use serde::Serialize;

use crate::batch::{BattleRecord, Draft};

/// Share of battles at or above which a pairing is a hard counter.
pub const COUNTER_THRESHOLD: f64 = 75.0;
/// Win-share band for a balanced pairing.
pub const BALANCED_BAND: (f64, f64) = (45.0, 55.0);

/// Wins out of games played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WinRate {
    pub wins: u32,
    pub games: u32,
}

impl WinRate {
    pub fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Win percentage, 0 with no games played.
    pub fn percent(&self) -> f64 {
        percent(self.wins, self.games)
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

// ============================================================================
// Side totals
// ============================================================================

/// Side wins, draws and round totals over a set of outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub battles: u32,
    pub side_a_wins: u32,
    pub side_b_wins: u32,
    pub draws: u32,
    /// Battles ended by the round limit. Also counted as draws.
    pub truncated: u32,
    pub total_rounds: u64,
}

impl BatchSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a BattleOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.add(outcome);
        }
        summary
    }

    pub fn add(&mut self, outcome: &BattleOutcome) {
        self.battles += 1;
        match outcome.winner {
            Winner::Side(Side::A) => self.side_a_wins += 1,
            Winner::Side(Side::B) => self.side_b_wins += 1,
            Winner::Draw => self.draws += 1,
        }
        if outcome.truncated {
            self.truncated += 1;
        }
        self.total_rounds += u64::from(outcome.rounds);
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::A => self.side_a_wins,
            Side::B => self.side_b_wins,
        }
    }

    pub fn win_rate(&self, side: Side) -> f64 {
        percent(self.wins(side), self.battles)
    }

    pub fn draw_rate(&self) -> f64 {
        percent(self.draws, self.battles)
    }

    pub fn average_rounds(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            self.total_rounds as f64 / f64::from(self.battles)
        }
    }
}

// ============================================================================
// Hero tables
// ============================================================================

/// One hero's overall record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeroRanking {
    pub hero: String,
    pub record: WinRate,
}

/// Record of `hero` against `opponent`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Matchup {
    pub hero: String,
    pub opponent: String,
    pub record: WinRate,
}

/// Two heroes whose head-to-head wins split close to evenly.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalancedPairing {
    pub first: String,
    pub second: String,
    /// `first`'s share of the wins either hero scored against the other.
    pub first_share: f64,
    pub games: u32,
}

/// Per-hero and hero-vs-hero records accumulated over drafted battles.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchupTable {
    heroes: BTreeMap<String, WinRate>,
    versus: BTreeMap<String, BTreeMap<String, WinRate>>,
}

impl MatchupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[BattleRecord]) -> Self {
        let mut table = Self::new();
        for record in records {
            table.record(&record.draft, record.outcome.winner);
        }
        table
    }

    pub fn record(&mut self, draft: &Draft, winner: Winner) {
        let a_won = winner == Winner::Side(Side::A);
        let b_won = winner == Winner::Side(Side::B);

        for hero in &draft.side_a {
            self.heroes.entry(hero.clone()).or_default().record(a_won);
        }
        for hero in &draft.side_b {
            self.heroes.entry(hero.clone()).or_default().record(b_won);
        }
        for hero_a in &draft.side_a {
            for hero_b in &draft.side_b {
                self.pair_mut(hero_a, hero_b).record(a_won);
                self.pair_mut(hero_b, hero_a).record(b_won);
            }
        }
    }

    fn pair_mut(&mut self, hero: &str, opponent: &str) -> &mut WinRate {
        self.versus
            .entry(hero.to_owned())
            .or_default()
            .entry(opponent.to_owned())
            .or_default()
    }

    pub fn hero(&self, hero: &str) -> Option<WinRate> {
        self.heroes.get(hero).copied()
    }

    pub fn versus(&self, hero: &str, opponent: &str) -> Option<WinRate> {
        self.versus.get(hero)?.get(opponent).copied()
    }

    /// Heroes seen in any battle, sorted.
    pub fn heroes(&self) -> impl Iterator<Item = &str> {
        self.heroes.keys().map(String::as_str)
    }

    /// Heroes with at least `min_games`, best win rate first.
    pub fn rankings(&self, min_games: u32) -> Vec<HeroRanking> {
        let mut rankings: Vec<_> = self
            .heroes
            .iter()
            .filter(|(_, record)| record.games >= min_games)
            .map(|(hero, record)| HeroRanking {
                hero: hero.clone(),
                record: *record,
            })
            .collect();
        rankings.sort_by(|a, b| b.record.percent().total_cmp(&a.record.percent()));
        rankings
    }

    /// Directed pairings with at least `min_games`, best win rate first.
    pub fn matchups(&self, min_games: u32) -> Vec<Matchup> {
        let mut matchups: Vec<_> = self
            .versus
            .iter()
            .flat_map(|(hero, opponents)| {
                opponents.iter().map(move |(opponent, record)| Matchup {
                    hero: hero.clone(),
                    opponent: opponent.clone(),
                    record: *record,
                })
            })
            .filter(|matchup| matchup.record.games >= min_games)
            .collect();
        matchups.sort_by(|a, b| b.record.percent().total_cmp(&a.record.percent()));
        matchups
    }

    /// Pairings won at least [`COUNTER_THRESHOLD`] percent of the time.
    pub fn strongest_counters(&self, min_games: u32) -> Vec<Matchup> {
        self.matchups(min_games)
            .into_iter()
            .filter(|matchup| matchup.record.percent() >= COUNTER_THRESHOLD)
            .collect()
    }

    /// Unordered hero pairs whose head-to-head wins fall inside
    /// [`BALANCED_BAND`]. Both directions together must reach
    /// `2 * min_games` games.
    pub fn balanced_pairings(&self, min_games: u32) -> Vec<BalancedPairing> {
        let (low, high) = BALANCED_BAND;
        let mut pairings = Vec::new();

        for first in self.heroes.keys() {
            for second in self.heroes.keys().filter(|second| first < *second) {
                let forward = self.versus(first, second).unwrap_or_default();
                let backward = self.versus(second, first).unwrap_or_default();
                let games = forward.games + backward.games;
                let wins = forward.wins + backward.wins;
                if games < min_games * 2 || wins == 0 {
                    continue;
                }

                let first_share = percent(forward.wins, wins);
                if (low..=high).contains(&first_share) {
                    pairings.push(BalancedPairing {
                        first: first.clone(),
                        second: second.clone(),
                        first_share,
                        games,
                    });
                }
            }
        }
        pairings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(side_a: &[&str], side_b: &[&str]) -> Draft {
        Draft {
            side_a: side_a.iter().map(|hero| (*hero).to_owned()).collect(),
            side_b: side_b.iter().map(|hero| (*hero).to_owned()).collect(),
        }
    }

    #[test]
    fn wins_count_for_the_winning_side_only() {
        let mut table = MatchupTable::new();

        table.record(&draft(&["uther", "jaina"], &["arthas"]), Winner::Side(Side::A));

        assert_eq!(table.hero("uther"), Some(WinRate { wins: 1, games: 1 }));
        assert_eq!(table.hero("arthas"), Some(WinRate { wins: 0, games: 1 }));
        assert_eq!(table.versus("jaina", "arthas"), Some(WinRate { wins: 1, games: 1 }));
        assert_eq!(table.versus("arthas", "uther"), Some(WinRate { wins: 0, games: 1 }));
        assert_eq!(table.versus("uther", "jaina"), None, "teammates are never paired");
    }

    #[test]
    fn draws_count_games_without_wins() {
        let mut table = MatchupTable::new();

        table.record(&draft(&["thrall"], &["illidan"]), Winner::Draw);

        assert_eq!(table.hero("thrall"), Some(WinRate { wins: 0, games: 1 }));
        assert_eq!(table.versus("illidan", "thrall"), Some(WinRate { wins: 0, games: 1 }));
    }

    #[test]
    fn rankings_filter_and_sort() {
        let mut table = MatchupTable::new();
        for _ in 0..3 {
            table.record(&draft(&["a"], &["b"]), Winner::Side(Side::A));
        }
        table.record(&draft(&["b"], &["c"]), Winner::Side(Side::A));

        let rankings = table.rankings(2);

        let heroes: Vec<_> = rankings.iter().map(|ranking| ranking.hero.as_str()).collect();
        assert_eq!(heroes, ["a", "b"]);
        assert_eq!(rankings[1].record, WinRate { wins: 1, games: 4 });
    }

    #[test]
    fn counters_and_balanced_pairings() {
        let mut table = MatchupTable::new();
        for _ in 0..4 {
            table.record(&draft(&["a"], &["b"]), Winner::Side(Side::A));
        }
        for winner in [Side::A, Side::B, Side::A, Side::B] {
            table.record(&draft(&["c"], &["d"]), Winner::Side(winner));
        }

        let counters = table.strongest_counters(3);
        assert_eq!(counters.len(), 1);
        assert_eq!((counters[0].hero.as_str(), counters[0].opponent.as_str()), ("a", "b"));

        let balanced = table.balanced_pairings(3);
        assert_eq!(balanced.len(), 1);
        assert_eq!((balanced[0].first.as_str(), balanced[0].second.as_str()), ("c", "d"));
        assert_eq!(balanced[0].first_share, 50.0);
        assert_eq!(balanced[0].games, 8);
    }

    #[test]
    fn summary_totals() {
        let outcome = |winner, rounds| BattleOutcome {
            winner,
            survivors: Vec::new(),
            rounds,
            truncated: false,
            units: Vec::new(),
        };
        let outcomes = [
            outcome(Winner::Side(Side::A), 4),
            outcome(Winner::Side(Side::B), 6),
            outcome(Winner::Draw, 2),
            outcome(Winner::Side(Side::A), 8),
        ];

        let summary = BatchSummary::from_outcomes(&outcomes);

        assert_eq!(summary.battles, 4);
        assert_eq!(summary.wins(Side::A), 2);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.win_rate(Side::A), 50.0);
        assert_eq!(summary.average_rounds(), 5.0);
        assert_eq!(BatchSummary::default().average_rounds(), 0.0);
    }
}
