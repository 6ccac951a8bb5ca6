use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::{Attribute, NumericKind};

/// Attributes every unit carries.
///
/// Units may define further attributes by name; these five are the ones the
/// combat rules read directly.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CoreAttribute {
    Hp,
    Attack,
    Armor,
    Speed,
    CritRate,
}

impl CoreAttribute {
    pub fn kind(self) -> NumericKind {
        match self {
            Self::CritRate => NumericKind::Real,
            _ => NumericKind::Integer,
        }
    }
}

/// Base stat block used to assemble a unit.
///
/// Every stat defaults to zero, including fields omitted from content files.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub hp: f64,
    pub attack: f64,
    pub armor: f64,
    pub speed: f64,
    pub crit_rate: f64,
    /// Additional named attributes, stored as real values.
    pub extra: BTreeMap<String, f64>,
}

impl BaseStats {
    pub const DEFAULT_HP: f64 = 0.0;
    pub const DEFAULT_ATTACK: f64 = 0.0;
    pub const DEFAULT_ARMOR: f64 = 0.0;
    pub const DEFAULT_SPEED: f64 = 0.0;
    pub const DEFAULT_CRIT_RATE: f64 = 0.0;

    pub fn new(hp: f64, attack: f64, armor: f64, speed: f64) -> Self {
        Self {
            hp,
            attack,
            armor,
            speed,
            crit_rate: Self::DEFAULT_CRIT_RATE,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_crit_rate(mut self, crit_rate: f64) -> Self {
        self.crit_rate = crit_rate;
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        match name.parse::<CoreAttribute>() {
            Ok(core) => Some(self.core(core)),
            Err(_) => self.extra.get(name).copied(),
        }
    }

    pub fn core(&self, attribute: CoreAttribute) -> f64 {
        match attribute {
            CoreAttribute::Hp => self.hp,
            CoreAttribute::Attack => self.attack,
            CoreAttribute::Armor => self.armor,
            CoreAttribute::Speed => self.speed,
            CoreAttribute::CritRate => self.crit_rate,
        }
    }

    /// Sets a stat by name. Unknown names become extra attributes.
    pub fn set(&mut self, name: &str, value: f64) {
        match name.parse::<CoreAttribute>() {
            Ok(CoreAttribute::Hp) => self.hp = value,
            Ok(CoreAttribute::Attack) => self.attack = value,
            Ok(CoreAttribute::Armor) => self.armor = value,
            Ok(CoreAttribute::Speed) => self.speed = value,
            Ok(CoreAttribute::CritRate) => self.crit_rate = value,
            Err(_) => {
                self.extra.insert(name.to_owned(), value);
            }
        }
    }

    /// Applies every override in order, returning the updated block.
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        for (name, value) in overrides {
            self.set(name, value);
        }
        self
    }

    /// Expands the block into the attribute table a unit owns.
    pub fn to_attributes(&self) -> BTreeMap<String, Attribute> {
        let mut attributes: BTreeMap<String, Attribute> = CoreAttribute::iter()
            .map(|core| {
                (
                    core.as_ref().to_owned(),
                    Attribute::new(self.core(core), core.kind()),
                )
            })
            .collect();
        for (name, value) in &self.extra {
            attributes.insert(name.clone(), Attribute::real(*value));
        }
        attributes
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_HP,
            Self::DEFAULT_ATTACK,
            Self::DEFAULT_ARMOR,
            Self::DEFAULT_SPEED,
        )
    }
}
