//! Damage calculation.

use crate::config::CombatConfig;

/// Fraction of incoming damage absorbed by `armor`.
///
/// # Formula
///
/// ```text
/// mitigation = armor / (armor + ARMOR_SCALE)
/// ```
///
/// Strictly increasing in `armor` and always below 1. Negative armor is
/// treated as zero.
pub fn mitigation(armor: f64) -> f64 {
    let armor = armor.max(0.0);
    armor / (armor + CombatConfig::ARMOR_SCALE)
}

/// Final damage after armor and critical multiplier.
///
/// ```text
/// dealt = floor(amount * (1 - mitigation))
/// if critical: dealt *= CRIT_MULTIPLIER
/// ```
///
/// The critical multiplier applies after mitigation.
pub fn mitigated_damage(amount: i64, armor: f64, is_crit: bool) -> i64 {
    let dealt = (amount as f64 * (1.0 - mitigation(armor))).floor() as i64;
    if is_crit {
        dealt.saturating_mul(CombatConfig::CRIT_MULTIPLIER)
    } else {
        dealt
    }
}
