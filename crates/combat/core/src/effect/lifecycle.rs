//! Effect lifecycle on the arena: attach, phase dispatch, expiry, clear.
//!
//! Phase dispatch iterates a snapshot of effect ids taken when the phase
//! starts. Hooks may attach, clear or expire effects on any unit while the
//! phase runs; ids that disappeared in the meantime are skipped, and
//! removals are committed after the tick pass.

use tracing::debug;

use super::{EffectId, EffectInstance, TriggerPhase};
use crate::action::{HookContext, HookPayload};
use crate::event::CombatEvent;
use crate::state::{Arena, UnitId};

impl Arena {
    /// Attaches an effect to `holder` and fires its apply hook once.
    ///
    /// Returns `None` if `holder` is not part of the arena.
    pub fn attach_effect(&mut self, holder: UnitId, mut effect: EffectInstance) -> Option<EffectId> {
        self.unit(holder)?;

        let id = self.allocate_effect_id();
        effect.assign_id(id);
        effect.activate();

        self.narrate(|arena| CombatEvent::EffectApplied {
            unit: arena.unit_name(holder),
            effect: effect.name().to_owned(),
            duration: effect.duration(),
            potency: effect.potency(),
        });

        let snapshot = effect.clone();
        self.unit_mut(holder)?.push_effect(effect);
        self.run_hook(holder, &snapshot, TriggerPhase::OnApply, HookPayload::None);
        Some(id)
    }

    /// Detaches every effect on `holder` in attach order, firing each
    /// remove hook. Returns the number of effects removed.
    ///
    /// A remove hook that clears the same holder again is ignored: the
    /// outer clear already owns every effect that was attached.
    pub fn clear_effects(&mut self, holder: UnitId) -> usize {
        let Some(unit) = self.unit_mut(holder) else {
            return 0;
        };
        let Some(detached) = unit.begin_clear() else {
            debug!(
                target: "combat::effect",
                unit = %holder,
                "clear_effects re-entered from a remove hook, ignoring"
            );
            return 0;
        };

        let count = detached.len();
        for effect in detached {
            self.retire(holder, effect);
        }
        if let Some(unit) = self.unit_mut(holder) {
            unit.end_clear();
        }

        self.narrate(|arena| CombatEvent::EffectsCleared {
            unit: arena.unit_name(holder),
            count,
        });
        count
    }

    /// Runs turn-start hooks on a snapshot of the holder's effects.
    pub fn process_turn_start(&mut self, holder: UnitId) {
        self.fire_phase(holder, TriggerPhase::OnTurnStart, HookPayload::None);
    }

    /// Runs turn-end hooks, ticks every effect once, removes the expired
    /// ones, then cools down every skill by one.
    pub fn process_turn_end(&mut self, holder: UnitId) {
        self.fire_phase(holder, TriggerPhase::OnTurnEnd, HookPayload::None);

        let expired: Vec<EffectId> = match self.unit_mut(holder) {
            Some(unit) => unit
                .effects_mut()
                .iter_mut()
                .filter_map(|effect| effect.tick().then(|| effect.id()))
                .collect(),
            None => return,
        };

        for id in expired {
            // An earlier remove hook may have cleared this one already.
            let Some(effect) = self.unit_mut(holder).and_then(|unit| unit.take_effect(id)) else {
                continue;
            };
            self.retire(holder, effect);
        }

        if let Some(unit) = self.unit_mut(holder) {
            unit.tick_skill_cooldowns();
        }
    }

    /// Fires `phase` for every effect on `holder` that exists when the phase
    /// starts and is still attached when its turn comes.
    pub(crate) fn fire_phase(&mut self, holder: UnitId, phase: TriggerPhase, payload: HookPayload<'_>) {
        let snapshot: Vec<EffectId> = match self.unit(holder) {
            Some(unit) => unit
                .effects()
                .iter()
                .filter(|effect| effect.hooks().has(phase))
                .map(EffectInstance::id)
                .collect(),
            None => return,
        };

        for id in snapshot {
            let Some(effect) = self.unit(holder).and_then(|unit| unit.effect(id)).cloned() else {
                continue;
            };
            self.run_hook(holder, &effect, phase, payload);
        }
    }

    /// Marks a detached effect removed and fires its remove hook.
    fn retire(&mut self, holder: UnitId, mut effect: EffectInstance) {
        if !effect.retire() {
            return;
        }
        self.narrate(|arena| CombatEvent::EffectRemoved {
            unit: arena.unit_name(holder),
            effect: effect.name().to_owned(),
        });
        self.run_hook(holder, &effect, TriggerPhase::OnRemove, HookPayload::None);
    }

    fn run_hook(
        &mut self,
        holder: UnitId,
        effect: &EffectInstance,
        phase: TriggerPhase,
        payload: HookPayload<'_>,
    ) {
        let steps = effect.hooks().get(phase);
        if steps.is_empty() {
            return;
        }
        let ctx = HookContext::new(phase, holder, effect).with_payload(payload);
        let interpreter = self.interpreter();
        interpreter.execute(steps, &ctx, self);
    }
}
