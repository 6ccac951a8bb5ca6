//! Determinism digests over battle outcomes.

use combat_core::BattleOutcome;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// SHA-256 over the bincode encoding of each outcome, hex encoded.
///
/// Two runs that produce the same outcomes in the same order share a
/// digest.
pub fn outcome_digest<'a>(outcomes: impl IntoIterator<Item = &'a BattleOutcome>) -> Result<String> {
    let mut hasher = Sha256::new();
    for outcome in outcomes {
        hasher.update(bincode::serialize(outcome)?);
    }
    Ok(hex::encode(hasher.finalize()))
}
