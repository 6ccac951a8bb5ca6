//! Declarative effect steps and their interpreter.
//!
//! Effect templates describe their behaviour as phase-keyed lists of
//! [`ActionStep`]s. Steps are immutable template data; the
//! [`ActionInterpreter`] resolves their targets and values against a
//! [`HookContext`] and applies them to the arena.
//!
//! Failure isolation: an unknown step, an unresolved target or a failed
//! expression only affects the single step. Siblings still run and the
//! battle never aborts.

pub mod context;
pub mod formula;
pub mod interpreter;

use std::fmt;

pub use context::{HookContext, HookPayload};
pub use formula::{BinaryOp, Bindings, EvalError, Expr, ExprError, Variable};
pub use interpreter::ActionInterpreter;

use crate::effect::ParamValue;

// ============================================================================
// Action Steps
// ============================================================================

/// One declarative step of an effect hook.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionStep {
    /// Non-critical damage, mitigated by the target's armor.
    DealDamage { target: TargetRef, amount: ValueSource },
    /// Healing clamped to the target's missing HP.
    Heal { target: TargetRef, amount: ValueSource },
    /// Detaches every effect on the target, firing each remove hook.
    ClearEffects { target: TargetRef },
    /// Writes a named flag. `stunned` and `is_stunned` drive the stun state.
    SetFlag {
        target: TargetRef,
        flag: String,
        value: ParamValue,
    },
    /// Passive-only contribution to the effect's `target_attribute`.
    ModifyAttribute { ratio: ValueSource, flat: ValueSource },
    /// A step whose type tag has no handler. Logged and skipped.
    Unknown { tag: String },
}

impl ActionStep {
    pub const DEAL_DAMAGE: &'static str = "deal_damage";
    pub const HEAL: &'static str = "heal";
    pub const CLEAR_EFFECTS: &'static str = "clear_effects";
    pub const SET_FLAG: &'static str = "set_flag";
    pub const MODIFY_ATTRIBUTE: &'static str = "modify_attribute";

    /// The type tag this step was declared with.
    pub fn tag(&self) -> &str {
        match self {
            Self::DealDamage { .. } => Self::DEAL_DAMAGE,
            Self::Heal { .. } => Self::HEAL,
            Self::ClearEffects { .. } => Self::CLEAR_EFFECTS,
            Self::SetFlag { .. } => Self::SET_FLAG,
            Self::ModifyAttribute { .. } => Self::MODIFY_ATTRIBUTE,
            Self::Unknown { tag } => tag,
        }
    }
}

// ============================================================================
// Target References
// ============================================================================

/// Declarative reference to a unit, resolved per execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetRef {
    /// The effect's holder.
    Owner,
    /// The unit that caused the effect.
    Source,
    /// Any other name. Resolves to nothing, making the step a no-op.
    Unresolved(String),
}

impl TargetRef {
    pub fn parse(name: &str) -> Self {
        match name {
            "owner" => Self::Owner,
            "source" => Self::Source,
            other => Self::Unresolved(other.to_owned()),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Source => f.write_str("source"),
            Self::Unresolved(name) => write!(f, "{name}?"),
        }
    }
}

// ============================================================================
// Value References
// ============================================================================

/// Declarative numeric value, resolved per execution.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueSource {
    Literal(f64),
    /// `floor(source.attack * multiplier)`, or 0 without a source.
    SourceAttack { multiplier: Multiplier },
    /// Named field of a context object (`effect.potency`, `owner.max_hp`, ...).
    Field { object: ContextKey, field: String },
    /// Arithmetic over the owning effect's whitelisted fields.
    Expr(Expr),
}

/// Multiplier of a [`ValueSource::SourceAttack`] reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Multiplier {
    Literal(f64),
    /// Name looked up in the owning effect's parameter bag (default 1.0).
    Param(String),
}

/// Context object addressed by a [`ValueSource::Field`] reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextKey {
    Effect,
    Owner,
    Source,
    /// Payload of damage-phase hooks (`amount`, `is_crit`).
    Damage,
    Unknown(String),
}

impl ContextKey {
    pub fn parse(name: &str) -> Self {
        match name {
            "effect" => Self::Effect,
            "owner" | "target" => Self::Owner,
            "source" | "user" => Self::Source,
            "damage" | "damage_info" => Self::Damage,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_outside_the_vocabulary_stay_unresolved() {
        assert_eq!(TargetRef::parse("owner"), TargetRef::Owner);
        assert_eq!(TargetRef::parse("source"), TargetRef::Source);
        assert_eq!(
            TargetRef::parse("all_enemies"),
            TargetRef::Unresolved("all_enemies".into())
        );
    }

    #[test]
    fn context_keys_accept_aliases() {
        assert_eq!(ContextKey::parse("user"), ContextKey::Source);
        assert_eq!(ContextKey::parse("target"), ContextKey::Owner);
        assert_eq!(ContextKey::parse("damage_info"), ContextKey::Damage);
        assert_eq!(ContextKey::parse("weather"), ContextKey::Unknown("weather".into()));
    }

    #[test]
    fn unknown_steps_keep_their_tag() {
        let step = ActionStep::Unknown {
            tag: "summon_totem".into(),
        };
        assert_eq!(step.tag(), "summon_totem");
        assert_eq!(
            ActionStep::ClearEffects {
                target: TargetRef::Owner
            }
            .tag(),
            "clear_effects"
        );
    }
}
