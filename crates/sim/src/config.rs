//! Simulator configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one simulator run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub battles: u32,
    pub team_size: usize,
    pub seed: u64,
    pub workers: usize,
    pub data_dir: Option<PathBuf>,
    /// Minimum shared games before a hero pairing is reported.
    pub min_games: u32,
    /// Minimum games before a hero appears in the rankings.
    pub ranking_min_games: u32,
    pub matchup_battles: u32,
    pub matchup_side_a: Vec<String>,
    pub matchup_side_b: Vec<String>,
    pub output: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            battles: 200,
            team_size: 3,
            seed: 0x5EED,
            workers: 0,
            data_dir: None,
            min_games: 5,
            ranking_min_games: 10,
            matchup_battles: 20,
            matchup_side_a: team(&["garrosh", "jaina", "arthas"]),
            matchup_side_b: team(&["illidan", "thrall", "tyrande"]),
            output: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_BATTLES` - Random-draft battles in the batch (default: 200)
    /// - `SIM_TEAM_SIZE` - Heroes per side (default: 3)
    /// - `SIM_SEED` - Batch seed (default: 0x5EED)
    /// - `SIM_WORKERS` - Worker threads, 0 for all cores (default: 0)
    /// - `SIM_DATA_DIR` - Content directory (default: builtin roster)
    /// - `SIM_MIN_GAMES` - Minimum games for counters and pairings (default: 5)
    /// - `SIM_RANKING_MIN_GAMES` - Minimum games for hero rankings (default: 10)
    /// - `SIM_MATCHUP_BATTLES` - Battles of the fixed matchup (default: 20)
    /// - `SIM_MATCHUP_A` / `SIM_MATCHUP_B` - Comma-separated fixed teams
    /// - `SIM_OUTPUT` - Write the batch records as JSON to this path
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(battles) = read_env::<u32>("SIM_BATTLES") {
            config.battles = battles;
        }
        if let Some(team_size) = read_env::<usize>("SIM_TEAM_SIZE") {
            config.team_size = team_size.max(1);
        }
        if let Some(seed) = read_env::<u64>("SIM_SEED") {
            config.seed = seed;
        }
        if let Some(workers) = read_env::<usize>("SIM_WORKERS") {
            config.workers = workers;
        }
        if let Some(min_games) = read_env::<u32>("SIM_MIN_GAMES") {
            config.min_games = min_games;
        }
        if let Some(min_games) = read_env::<u32>("SIM_RANKING_MIN_GAMES") {
            config.ranking_min_games = min_games;
        }
        if let Some(battles) = read_env::<u32>("SIM_MATCHUP_BATTLES") {
            config.matchup_battles = battles;
        }
        if let Ok(names) = env::var("SIM_MATCHUP_A") {
            config.matchup_side_a = parse_team(&names);
        }
        if let Ok(names) = env::var("SIM_MATCHUP_B") {
            config.matchup_side_b = parse_team(&names);
        }

        config.data_dir = env::var("SIM_DATA_DIR").ok().map(PathBuf::from);
        config.output = env::var("SIM_OUTPUT").ok().map(PathBuf::from);

        config
    }
}

fn team(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

fn parse_team(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_lists_ignore_blanks() {
        assert_eq!(parse_team(" uther, ,sylvanas,"), ["uther", "sylvanas"]);
        assert!(parse_team("").is_empty());
    }

    #[test]
    fn defaults_match_the_builtin_roster() {
        let config = SimConfig::default();
        assert_eq!(config.team_size, 3);
        assert_eq!(config.matchup_side_a.len(), 3);
        assert_eq!(config.matchup_side_b.len(), 3);
        assert!(config.data_dir.is_none());
    }
}
