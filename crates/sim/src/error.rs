use combat_core::BattleError;

/// Errors raised by the simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("hero '{0}' is not registered")]
    UnknownHero(String),

    #[error("drafting needs {needed} heroes but the roster has {available}")]
    RosterTooSmall { needed: usize, available: usize },

    #[error("team size must be at least 1")]
    EmptyTeam,

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("failed to encode outcomes: {0}")]
    Encode(#[from] bincode::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SimError>;
