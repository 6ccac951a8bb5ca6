//! Per-turn action selection and direct hits.

use tracing::trace;

use crate::action::HookPayload;
use crate::effect::TriggerPhase;
use crate::env::{CombatRng, EffectTemplateProvider};
use crate::event::CombatEvent;
use crate::skill::Skill;
use crate::state::{Arena, DamageReport, TurnAction, UnitId};

impl Arena {
    /// Takes `actor`'s action for the turn.
    ///
    /// Stunned units forfeit. Otherwise the first ready skill in
    /// registration order is used, falling back to a basic attack on a
    /// random living opponent.
    pub fn act(
        &mut self,
        actor: UnitId,
        opponents: &[UnitId],
        rng: &mut CombatRng,
        effects: &dyn EffectTemplateProvider,
    ) -> TurnAction {
        let Some(unit) = self.unit(actor) else {
            return TurnAction::Idle;
        };
        if unit.is_stunned() {
            self.narrate(|arena| CombatEvent::Stunned {
                unit: arena.unit_name(actor),
            });
            return TurnAction::Stunned;
        }

        self.fire_phase(actor, TriggerPhase::OnAction, HookPayload::None);

        let ready = self
            .unit(actor)
            .and_then(|unit| unit.skills().iter().position(Skill::is_ready));
        if let Some(index) = ready {
            let name = self
                .unit(actor)
                .and_then(|unit| unit.skills().get(index))
                .map(|skill| skill.name().to_owned())
                .unwrap_or_default();
            if self.use_skill(actor, index, opponents, rng, effects) {
                return TurnAction::Skill { name };
            }
        }

        self.basic_attack(actor, opponents, rng)
    }

    /// Hits one random living opponent for the actor's attack.
    pub fn basic_attack(
        &mut self,
        actor: UnitId,
        opponents: &[UnitId],
        rng: &mut CombatRng,
    ) -> TurnAction {
        let pool: Vec<UnitId> = opponents
            .iter()
            .copied()
            .filter(|&id| self.is_alive(id))
            .collect();
        if pool.is_empty() {
            trace!(target: "combat::attack", unit = %actor, "no opponent standing");
            return TurnAction::Idle;
        }

        let target = pool[rng.below(pool.len())];
        let damage = self.attack(actor);
        let is_crit = rng.roll(self.crit_rate(actor));

        self.narrate(|arena| CombatEvent::BasicAttack {
            unit: arena.unit_name(actor),
            target: arena.unit_name(target),
        });
        self.strike(actor, target, damage, is_crit);
        TurnAction::BasicAttack { target }
    }

    /// Applies a direct hit and fires the damage hooks of both parties.
    ///
    /// Damage dealt by effect steps goes through [`Arena::take_damage`]
    /// instead and never reaches these hooks.
    pub fn strike(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        amount: i64,
        is_crit: bool,
    ) -> Option<DamageReport> {
        let report = self.take_damage(target, amount, is_crit)?;

        self.fire_phase(
            target,
            TriggerPhase::OnTakeDamage,
            HookPayload::Damage {
                amount: report.dealt,
                is_crit,
                counterpart: Some(attacker),
            },
        );
        self.fire_phase(
            attacker,
            TriggerPhase::OnDealDamage,
            HookPayload::Damage {
                amount: report.dealt,
                is_crit,
                counterpart: Some(target),
            },
        );
        Some(report)
    }
}
