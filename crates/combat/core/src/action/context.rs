use crate::effect::{EffectInstance, TriggerPhase};
use crate::state::UnitId;

/// Event data carried into a hook.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HookPayload<'a> {
    None,
    /// Direct damage landed or received. `counterpart` is the other unit.
    Damage {
        amount: i64,
        is_crit: bool,
        counterpart: Option<UnitId>,
    },
    /// Passive query for the named attribute.
    Attribute(&'a str),
}

impl HookPayload<'_> {
    /// Numeric field of the payload, as read by `damage.<field>` references.
    pub fn field(&self, name: &str) -> Option<f64> {
        match (self, name) {
            (Self::Damage { amount, .. }, "amount") => Some(*amount as f64),
            (Self::Damage { is_crit, .. }, "is_crit") => Some(if *is_crit { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// Context handed to the interpreter for one hook invocation.
///
/// `owner` is the effect's holder and `source` the unit that caused it.
/// `depth` counts nested attribute reads, so passive hooks that read other
/// attributes cannot recurse without bound.
#[derive(Clone, Copy, Debug)]
pub struct HookContext<'a> {
    pub phase: TriggerPhase,
    pub owner: UnitId,
    pub source: Option<UnitId>,
    pub effect: &'a EffectInstance,
    pub payload: HookPayload<'a>,
    pub depth: u8,
}

impl<'a> HookContext<'a> {
    pub fn new(phase: TriggerPhase, owner: UnitId, effect: &'a EffectInstance) -> Self {
        Self {
            phase,
            owner,
            source: effect.source(),
            effect,
            payload: HookPayload::None,
            depth: 0,
        }
    }

    pub fn with_payload(mut self, payload: HookPayload<'a>) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Attribute being queried, for passive hooks.
    pub fn attribute(&self) -> Option<&'a str> {
        match self.payload {
            HookPayload::Attribute(name) => Some(name),
            _ => None,
        }
    }
}
