/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Upper bound on the number of rounds a battle may run.
    /// `None` keeps fighting until one side is wiped out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub round_limit: Option<u32>,
}

impl CombatConfig {
    // ===== rule constants =====
    /// Armor value at which incoming damage is halved.
    pub const ARMOR_SCALE: f64 = 100.0;
    /// Damage multiplier applied after mitigation on a critical hit.
    pub const CRIT_MULTIPLIER: i64 = 2;
    /// Nested attribute reads allowed while evaluating passive modifiers.
    /// Reads past this depth return the unmodified value.
    pub const MAX_ATTRIBUTE_DEPTH: u8 = 4;
    /// Maximum nesting of parentheses and unary operators in an expression.
    pub const MAX_EXPR_DEPTH: usize = 32;

    pub fn new() -> Self {
        Self { round_limit: None }
    }

    pub fn with_round_limit(round_limit: u32) -> Self {
        Self {
            round_limit: Some(round_limit),
        }
    }
}
