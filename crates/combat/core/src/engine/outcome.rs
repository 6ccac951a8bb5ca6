use std::fmt;

/// One of the two sides of a battle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Result of a battle.
///
/// `Draw` covers both sides falling to the same resolving action, and
/// battles cut short by a round limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Winner {
    Side(Side),
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Side(side) => write!(f, "side {side} wins"),
            Self::Draw => f.write_str("draw"),
        }
    }
}

/// Final vitals of one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitVitals {
    pub name: String,
    pub side: Side,
    pub current_hp: i64,
    pub max_hp: i64,
}

impl UnitVitals {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

/// Outcome record of one battle.
///
/// Contains no floating-point data, so equal outcomes serialize to equal
/// bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub winner: Winner,
    /// Names of the winning side's living units. Empty on a draw.
    pub survivors: Vec<String>,
    pub rounds: u32,
    /// Set when the round limit ended the battle.
    pub truncated: bool,
    /// Side A units in input order, then side B.
    pub units: Vec<UnitVitals>,
}

impl BattleOutcome {
    pub fn winning_side(&self) -> Option<Side> {
        match self.winner {
            Winner::Side(side) => Some(side),
            Winner::Draw => None,
        }
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &UnitVitals> {
        self.units.iter().filter(move |unit| unit.side == side)
    }
}
