use strum::EnumCount;

use crate::action::ActionStep;

/// Lifecycle point at which an attached effect may run its steps.
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
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TriggerPhase {
    /// Fired once when the effect is attached to its holder.
    OnApply,
    /// Fired once when the effect leaves its holder (expiry or clear).
    OnRemove,
    /// Queried on every attribute read of the holder.
    Passive,
    OnTurnStart,
    OnTurnEnd,
    /// Holder landed a direct hit (skill or basic attack).
    OnDealDamage,
    /// Holder received a direct hit.
    OnTakeDamage,
    /// Holder is about to choose its action for the turn.
    OnAction,
}

impl TriggerPhase {
    const fn index(self) -> usize {
        self as usize
    }
}

/// Phase-keyed step lists of one effect template.
///
/// Backed by a fixed array indexed by phase, so lookup never hashes.
/// Templates are shared between instances behind an `Arc`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HookTable {
    phases: [Vec<ActionStep>; TriggerPhase::COUNT],
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, phase: TriggerPhase, steps: Vec<ActionStep>) -> Self {
        self.set(phase, steps);
        self
    }

    pub fn set(&mut self, phase: TriggerPhase, steps: Vec<ActionStep>) {
        self.phases[phase.index()] = steps;
    }

    pub fn get(&self, phase: TriggerPhase) -> &[ActionStep] {
        &self.phases[phase.index()]
    }

    pub fn has(&self, phase: TriggerPhase) -> bool {
        !self.get(phase).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::TargetRef;

    #[test]
    fn phase_names_round_trip() {
        assert_eq!(TriggerPhase::OnTurnStart.as_ref(), "ON_TURN_START");
        assert_eq!("on_take_damage".parse::<TriggerPhase>(), Ok(TriggerPhase::OnTakeDamage));
        assert!("ON_LEVEL_UP".parse::<TriggerPhase>().is_err());
    }

    #[test]
    fn table_lookup_is_per_phase() {
        let table = HookTable::new().with(
            TriggerPhase::OnRemove,
            vec![ActionStep::ClearEffects {
                target: TargetRef::Owner,
            }],
        );

        assert!(table.has(TriggerPhase::OnRemove));
        assert!(table.get(TriggerPhase::OnApply).is_empty());
        assert!(!table.is_empty());
        assert!(HookTable::new().is_empty());
    }
}
