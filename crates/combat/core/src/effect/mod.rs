//! Timed effects bound to a holder unit.
//!
//! An [`EffectInstance`] is created by an [`crate::env::EffectTemplateProvider`]
//! from a named template, attached to exactly one unit, and driven through
//! its lifecycle by the arena:
//!
//! ```text
//! Attached --attach/OnApply--> Active --tick expiry | clear/OnRemove--> Removed
//! ```
//!
//! Apply fires once, at attach. Remove fires once, whichever path removes
//! the instance first.

mod lifecycle;
pub mod params;
pub mod phase;

use std::fmt;
use std::sync::Arc;

pub use params::{ParamBag, ParamValue};
pub use phase::{HookTable, TriggerPhase};

use crate::action::{Bindings, Variable};
use crate::state::UnitId;

// ============================================================================
// Identity & Duration
// ============================================================================

/// Arena-unique identifier of an attached effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u64);

impl EffectId {
    /// Placeholder carried by instances that were never attached.
    pub const DETACHED: Self = Self(0);
}

/// Remaining lifetime of an effect in holder turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    Turns(i32),
    Infinite,
}

impl EffectDuration {
    /// Reads a duration parameter. Non-finite numbers and the strings
    /// `"infinite"`/`"inf"` produce [`EffectDuration::Infinite`].
    pub fn from_param(value: Option<&ParamValue>) -> Self {
        match value {
            None => Self::Turns(EffectInstance::DEFAULT_DURATION),
            Some(ParamValue::Number(turns)) if turns.is_finite() => Self::Turns(*turns as i32),
            Some(ParamValue::Number(_)) => Self::Infinite,
            Some(ParamValue::Text(text))
                if text.eq_ignore_ascii_case("infinite") || text.eq_ignore_ascii_case("inf") =>
            {
                Self::Infinite
            }
            Some(_) => Self::Turns(EffectInstance::DEFAULT_DURATION),
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Turns(turns) => f64::from(turns),
            Self::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for EffectDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turns(turns) => write!(f, "{turns} turns"),
            Self::Infinite => f.write_str("permanent"),
        }
    }
}

/// Lifecycle state of an effect instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EffectState {
    #[default]
    Attached,
    Active,
    Removed,
}

// ============================================================================
// Effect Instance
// ============================================================================

/// Stateful modifier or status owned by one holder unit.
///
/// Hook tables and parameters are shared with the template behind `Arc`, so
/// cloning an instance is cheap. Every instance keeps its own duration,
/// elapsed counter, source and lifecycle state.
#[derive(Clone, Debug)]
pub struct EffectInstance {
    id: EffectId,
    name: String,
    duration: EffectDuration,
    elapsed: u32,
    potency: f64,
    target_count: u32,
    is_control: bool,
    source: Option<UnitId>,
    params: Arc<ParamBag>,
    hooks: Arc<HookTable>,
    state: EffectState,
}

impl EffectInstance {
    pub const DEFAULT_DURATION: i32 = 1;
    pub const DEFAULT_POTENCY: f64 = 1.0;
    pub const DEFAULT_TARGET_COUNT: u32 = 1;

    /// Builds an instance from merged template parameters.
    ///
    /// Recognised keys: `duration`, `potency`, `target_count`,
    /// `is_control_effect`. Every key stays readable through [`Self::params`].
    pub fn new(name: impl Into<String>, hooks: Arc<HookTable>, params: ParamBag) -> Self {
        let duration = EffectDuration::from_param(params.get("duration"));
        let potency = params.number("potency").unwrap_or(Self::DEFAULT_POTENCY);
        let target_count = params
            .number("target_count")
            .map(|count| count.max(0.0) as u32)
            .unwrap_or(Self::DEFAULT_TARGET_COUNT);
        let is_control = params.flag("is_control_effect");

        Self {
            id: EffectId::DETACHED,
            name: name.into(),
            duration,
            elapsed: 0,
            potency,
            target_count,
            is_control,
            source: None,
            params: Arc::new(params),
            hooks,
            state: EffectState::Attached,
        }
    }

    pub fn with_source(mut self, source: UnitId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> EffectDuration {
        self.duration
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn potency(&self) -> f64 {
        self.potency
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    pub fn is_control(&self) -> bool {
        self.is_control
    }

    pub fn source(&self) -> Option<UnitId> {
        self.source
    }

    pub fn state(&self) -> EffectState {
        self.state
    }

    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    /// Name of the attribute this effect's passive hook modifies, if any.
    pub fn target_attribute(&self) -> Option<&str> {
        self.params.text("target_attribute")
    }

    /// Numeric field lookup used by context-field value references.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "duration" => Some(self.duration.as_f64()),
            "elapsed" => Some(f64::from(self.elapsed)),
            "potency" => Some(self.potency),
            "target_count" => Some(f64::from(self.target_count)),
            "is_control_effect" => Some(if self.is_control { 1.0 } else { 0.0 }),
            other => self.params.number(other),
        }
    }

    /// Advances the effect by one holder turn.
    ///
    /// Returns `true` when this tick brought a finite duration to zero or
    /// below. Infinite effects only count elapsed turns.
    pub fn tick(&mut self) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        match &mut self.duration {
            EffectDuration::Turns(turns) => {
                *turns -= 1;
                *turns <= 0
            }
            EffectDuration::Infinite => false,
        }
    }

    pub(crate) fn assign_id(&mut self, id: EffectId) {
        self.id = id;
    }

    pub(crate) fn activate(&mut self) {
        self.state = EffectState::Active;
    }

    /// Transitions to [`EffectState::Removed`]. Returns `false` if the
    /// instance had already been removed.
    pub(crate) fn retire(&mut self) -> bool {
        if self.state == EffectState::Removed {
            return false;
        }
        self.state = EffectState::Removed;
        true
    }
}

impl Bindings for EffectInstance {
    fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Potency => self.potency,
            Variable::Duration => self.duration.as_f64(),
            Variable::Elapsed => f64::from(self.elapsed),
            Variable::TargetCount => f64::from(self.target_count),
        }
    }
}
