//! Combat resolution: damage math and the per-turn action of a unit.

mod attack;
pub mod damage;

pub use damage::{mitigated_damage, mitigation};
