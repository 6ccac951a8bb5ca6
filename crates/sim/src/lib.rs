//! Headless battle simulation.
//!
//! Drives [`combat_core`] battles in bulk over a [`ContentLibrary`]: random
//! team drafts fought in parallel, per-hero and hero-vs-hero statistics,
//! fixed matchups, and stat-override trials for balancing loops.
//!
//! Every battle in a batch is seeded from the batch seed and its index, so a
//! batch produces the same records regardless of the worker count.
//!
//! [`ContentLibrary`]: combat_content::ContentLibrary
pub mod batch;
pub mod config;
pub mod digest;
pub mod error;
pub mod matchup;
pub mod pool;
pub mod stats;

pub use batch::{BatchReport, BattleRecord, Draft, Roster, batch_ranges, draft_teams, run_batch};
pub use config::SimConfig;
pub use digest::outcome_digest;
pub use error::{Result, SimError};
pub use matchup::{MatchupReport, OverrideTrial, evaluate_overrides, run_matchup};
pub use pool::WorkerPool;
pub use stats::{BalancedPairing, BatchSummary, HeroRanking, Matchup, MatchupTable, WinRate};
