//! Deterministic, data-driven turn-based combat rules.
//!
//! `combat-core` owns the canonical battle model: layered attributes, timed
//! effects that react to trigger phases, the step interpreter that executes
//! effect logic, skills, units, and the scheduler that drives duels and team
//! battles. Content is supplied through the provider traits in [`env`], so
//! the crate never touches the filesystem.
//!
//! All mutation flows through [`state::Arena`], and a [`engine::Battle`]
//! seeded with the same value always produces the same [`engine::BattleOutcome`].
pub mod action;
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod skill;
pub mod state;
pub mod stats;

pub use action::{
    ActionInterpreter, ActionStep, Bindings, ContextKey, EvalError, Expr, ExprError, HookContext,
    HookPayload, Multiplier, TargetRef, ValueSource, Variable,
};
pub use config::CombatConfig;
pub use effect::{
    EffectDuration, EffectId, EffectInstance, EffectState, HookTable, ParamBag, ParamValue,
    TriggerPhase,
};
pub use engine::{
    Battle, BattleMode, BattleOutcome, DuelOrder, Side, SpeedOrder, TurnOrder, UnitVitals, Winner,
    build_unit, run_battle,
};
pub use env::{
    COMBAT_STREAM, CombatRng, EffectTemplateProvider, NoEffects, PcgRng, RngOracle,
    SkillTemplateProvider, StatOverrides, UnitTemplateProvider, compute_seed,
};
pub use error::BattleError;
pub use event::{CombatEvent, Journal};
pub use skill::{EffectRequest, Skill, SkillOverrides, TargetType};
pub use state::{Arena, DamageReport, TurnAction, Unit, UnitId};
pub use stats::{Attribute, BaseStats, CoreAttribute, NumericKind, PassiveModifier};
