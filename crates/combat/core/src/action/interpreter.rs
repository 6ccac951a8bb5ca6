//! Step interpreter.
//!
//! The interpreter carries no state of its own. It is injected into the
//! arena at construction and copied out whenever a hook runs, so hooks can
//! mutate the arena while the interpreter itself stays untouched.

use tracing::{debug, warn};

use super::{ActionStep, ContextKey, HookContext, Multiplier, TargetRef, ValueSource};
use crate::effect::ParamValue;
use crate::state::{Arena, UnitId};
use crate::stats::PassiveModifier;

/// Stateless evaluator of effect step lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionInterpreter;

impl ActionInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Executes a step list for a mutating phase.
    ///
    /// Returns the merged result of any `modify_attribute` steps, which is
    /// only ever `Some` when the context carries an attribute query.
    pub fn execute(
        &self,
        steps: &[ActionStep],
        ctx: &HookContext<'_>,
        arena: &mut Arena,
    ) -> Option<PassiveModifier> {
        let mut merged = None;

        for step in steps {
            match step {
                ActionStep::DealDamage { target, amount } => {
                    self.deal_damage(target, amount, ctx, arena);
                }
                ActionStep::Heal { target, amount } => {
                    self.heal(target, amount, ctx, arena);
                }
                ActionStep::ClearEffects { target } => {
                    match self.resolve_target(target, ctx) {
                        Some(unit) => {
                            arena.clear_effects(unit);
                        }
                        None => self.unresolved(ActionStep::CLEAR_EFFECTS, target, ctx),
                    }
                }
                ActionStep::SetFlag {
                    target,
                    flag,
                    value,
                } => self.set_flag(target, flag, value, ctx, arena),
                ActionStep::ModifyAttribute { ratio, flat } => {
                    if let Some(modifier) = self.modify_attribute(ratio, flat, ctx, arena) {
                        merged = Some(modifier);
                    }
                }
                ActionStep::Unknown { tag } => {
                    warn!(
                        target: "combat::action",
                        effect = ctx.effect.name(),
                        phase = %ctx.phase,
                        "unknown action type '{tag}', skipping"
                    );
                }
            }
        }

        merged
    }

    /// Evaluates a passive step list without mutating the arena.
    ///
    /// Only `modify_attribute` steps contribute; later contributions
    /// overwrite earlier ones within the same list.
    pub fn evaluate_passive(
        &self,
        steps: &[ActionStep],
        ctx: &HookContext<'_>,
        arena: &Arena,
    ) -> Option<PassiveModifier> {
        let mut merged = None;

        for step in steps {
            match step {
                ActionStep::ModifyAttribute { ratio, flat } => {
                    if let Some(modifier) = self.modify_attribute(ratio, flat, ctx, arena) {
                        merged = Some(modifier);
                    }
                }
                other => {
                    debug!(
                        target: "combat::action",
                        effect = ctx.effect.name(),
                        "'{}' has no passive form, skipping",
                        other.tag()
                    );
                }
            }
        }

        merged
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolves a target reference against the hook context.
    pub fn resolve_target(&self, target: &TargetRef, ctx: &HookContext<'_>) -> Option<UnitId> {
        match target {
            TargetRef::Owner => Some(ctx.owner),
            TargetRef::Source => ctx.source,
            TargetRef::Unresolved(_) => None,
        }
    }

    /// Resolves a value reference. Never fails: every miss yields 0.
    pub fn resolve_value(&self, value: &ValueSource, ctx: &HookContext<'_>, arena: &Arena) -> f64 {
        match value {
            ValueSource::Literal(literal) => *literal,
            ValueSource::SourceAttack { multiplier } => {
                let Some(source) = ctx.source else {
                    return 0.0;
                };
                let multiplier = match multiplier {
                    Multiplier::Literal(literal) => *literal,
                    Multiplier::Param(name) => ctx.effect.params().number(name).unwrap_or(1.0),
                };
                let attack = arena.attack_at(source, ctx.depth.saturating_add(1));
                (attack as f64 * multiplier).floor()
            }
            ValueSource::Field { object, field } => {
                let found = match object {
                    ContextKey::Effect => ctx.effect.field(field),
                    ContextKey::Owner => arena.unit_field(ctx.owner, field, ctx.depth),
                    ContextKey::Source => ctx
                        .source
                        .and_then(|source| arena.unit_field(source, field, ctx.depth)),
                    ContextKey::Damage => ctx.payload.field(field),
                    ContextKey::Unknown(_) => None,
                };
                found.unwrap_or_else(|| {
                    debug!(
                        target: "combat::action",
                        effect = ctx.effect.name(),
                        "context field {object:?}.{field} not available, using 0"
                    );
                    0.0
                })
            }
            ValueSource::Expr(expr) => match expr.evaluate(ctx.effect) {
                Ok(result) => result,
                Err(err) => {
                    warn!(
                        target: "combat::action",
                        effect = ctx.effect.name(),
                        expression = %expr,
                        "expression evaluation failed: {err}"
                    );
                    0.0
                }
            },
        }
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    fn deal_damage(
        &self,
        target: &TargetRef,
        amount: &ValueSource,
        ctx: &HookContext<'_>,
        arena: &mut Arena,
    ) {
        let Some(unit) = self.resolve_target(target, ctx) else {
            return self.unresolved(ActionStep::DEAL_DAMAGE, target, ctx);
        };
        let amount = self.resolve_value(amount, ctx, arena);
        if amount > 0.0 {
            arena.take_damage(unit, amount.floor() as i64, false);
        }
    }

    fn heal(
        &self,
        target: &TargetRef,
        amount: &ValueSource,
        ctx: &HookContext<'_>,
        arena: &mut Arena,
    ) {
        let Some(unit) = self.resolve_target(target, ctx) else {
            return self.unresolved(ActionStep::HEAL, target, ctx);
        };
        let amount = self.resolve_value(amount, ctx, arena);
        arena.heal(unit, amount);
    }

    fn set_flag(
        &self,
        target: &TargetRef,
        flag: &str,
        value: &ParamValue,
        ctx: &HookContext<'_>,
        arena: &mut Arena,
    ) {
        let Some(unit) = self.resolve_target(target, ctx) else {
            return self.unresolved(ActionStep::SET_FLAG, target, ctx);
        };
        arena.set_flag(unit, flag, value.clone());
    }

    fn modify_attribute(
        &self,
        ratio: &ValueSource,
        flat: &ValueSource,
        ctx: &HookContext<'_>,
        arena: &Arena,
    ) -> Option<PassiveModifier> {
        let queried = ctx.attribute()?;
        if ctx.effect.target_attribute() != Some(queried) {
            return None;
        }
        Some(PassiveModifier::new(
            self.resolve_value(ratio, ctx, arena),
            self.resolve_value(flat, ctx, arena),
        ))
    }

    fn unresolved(&self, tag: &str, target: &TargetRef, ctx: &HookContext<'_>) {
        debug!(
            target: "combat::action",
            effect = ctx.effect.name(),
            phase = %ctx.phase,
            "target '{target}' unresolved, '{tag}' skipped"
        );
    }
}
