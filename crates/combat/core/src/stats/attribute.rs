use super::PassiveModifier;

/// Declared numeric kind of an attribute.
///
/// Integer attributes truncate toward zero after modifiers are applied.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NumericKind {
    #[default]
    Integer,
    Real,
}

impl NumericKind {
    pub fn cast(self, value: f64) -> f64 {
        match self {
            Self::Integer => value.trunc(),
            Self::Real => value,
        }
    }
}

/// A single named attribute owned by a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub base: f64,
    pub ratio: f64,
    pub kind: NumericKind,
}

impl Attribute {
    pub fn new(base: f64, kind: NumericKind) -> Self {
        Self {
            base,
            ratio: 1.0,
            kind,
        }
    }

    pub fn integer(base: f64) -> Self {
        Self::new(base, NumericKind::Integer)
    }

    pub fn real(base: f64) -> Self {
        Self::new(base, NumericKind::Real)
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Value before any effect contributes: `base * ratio`.
    pub fn raw(&self) -> f64 {
        self.base * self.ratio
    }

    /// Applies an aggregated passive modifier and casts to the declared kind.
    pub fn resolve(&self, modifier: PassiveModifier) -> f64 {
        self.kind.cast(modifier.apply(self.raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_kind_truncates_after_modifiers() {
        let attack = Attribute::integer(15.0);
        let modifier = PassiveModifier::new(1.5, 0.0);

        // 15 * 1.5 = 22.5 -> 22
        assert_eq!(attack.resolve(modifier), 22.0);
    }

    #[test]
    fn real_kind_keeps_fraction() {
        let crit = Attribute::real(0.1).with_ratio(2.0);
        let modifier = PassiveModifier::new(1.0, 0.05);

        let value = crit.resolve(modifier);
        assert!((value - 0.25).abs() < 1e-9);
    }

    #[test]
    fn identity_modifier_returns_raw() {
        let armor = Attribute::integer(40.0).with_ratio(0.5);
        assert_eq!(armor.resolve(PassiveModifier::IDENTITY), 20.0);
    }
}
