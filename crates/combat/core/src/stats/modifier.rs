/// Contribution of one passive hook to an attribute read.
///
/// Combination multiplies ratios and sums flats, so the order in which
/// effects contribute does not change the aggregate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveModifier {
    pub ratio: f64,
    pub flat: f64,
}

impl PassiveModifier {
    pub const IDENTITY: Self = Self {
        ratio: 1.0,
        flat: 0.0,
    };

    pub fn new(ratio: f64, flat: f64) -> Self {
        Self { ratio, flat }
    }

    pub fn ratio(ratio: f64) -> Self {
        Self { ratio, flat: 0.0 }
    }

    pub fn flat(flat: f64) -> Self {
        Self { ratio: 1.0, flat }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            ratio: self.ratio * other.ratio,
            flat: self.flat + other.flat,
        }
    }

    /// `(raw + flat) * ratio`
    pub fn apply(self, raw: f64) -> f64 {
        (raw + self.flat) * self.ratio
    }
}

impl Default for PassiveModifier {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromIterator<PassiveModifier> for PassiveModifier {
    fn from_iter<I: IntoIterator<Item = PassiveModifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::IDENTITY, Self::combine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_multiplies_ratio_and_sums_flat() {
        let total: PassiveModifier = [
            PassiveModifier::new(1.5, 10.0),
            PassiveModifier::new(0.5, -4.0),
            PassiveModifier::flat(2.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(total, PassiveModifier::new(0.75, 8.0));
    }

    #[test]
    fn flat_is_added_before_ratio() {
        // (100 + 20) * 1.5 = 180
        let modifier = PassiveModifier::new(1.5, 20.0);
        assert_eq!(modifier.apply(100.0), 180.0);
    }

    #[test]
    fn empty_aggregate_is_identity() {
        let total: PassiveModifier = std::iter::empty().collect();
        assert_eq!(total, PassiveModifier::IDENTITY);
    }
}
