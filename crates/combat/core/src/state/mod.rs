//! Battle state: units and the arena that owns them.
//!
//! Units reference each other by [`UnitId`] rather than by pointer, so an
//! effect's source is a plain index into the arena that stays valid for the
//! whole battle. Defeated units stay in the arena with `current_hp <= 0`.

pub mod arena;
pub mod unit;

pub use arena::{Arena, TurnAction};
pub use unit::{DamageReport, Unit};

use std::fmt;

/// Index of a unit inside its [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
