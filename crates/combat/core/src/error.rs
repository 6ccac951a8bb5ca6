//! Battle-level errors.
//!
//! Expression failures live next to the grammar in [`crate::action::formula`].
//! Runtime misconfiguration inside a running battle (unresolved targets,
//! unknown steps, missing templates) is logged and skipped rather than
//! surfaced, so the only hard failures are the ones caught before round one.

use crate::engine::Side;

/// Errors raised while assembling a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("side {0} has no units")]
    EmptySide(Side),
}
