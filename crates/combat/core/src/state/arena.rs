//! Battle arena: unit storage and the attribute model.

use tracing::debug;

use super::{DamageReport, Unit, UnitId};
use crate::action::{ActionInterpreter, HookContext, HookPayload};
use crate::config::CombatConfig;
use crate::effect::{EffectId, ParamValue, TriggerPhase};
use crate::event::{CombatEvent, Journal};
use crate::stats::{CoreAttribute, PassiveModifier};

/// What a unit did with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnAction {
    /// Stunned units forfeit the turn.
    Stunned,
    Skill { name: String },
    BasicAttack { target: UnitId },
    /// No skill was ready and no opponent was standing.
    Idle,
}

/// Owns every unit of one battle.
///
/// The arena is single-writer: effects, skills and the scheduler all mutate
/// it through `&mut self`, and attribute reads take `&self` so they can never
/// change state.
#[derive(Clone, Debug)]
pub struct Arena {
    units: Vec<Unit>,
    interpreter: ActionInterpreter,
    journal: Journal,
    next_effect_id: u64,
}

impl Arena {
    pub fn new(interpreter: ActionInterpreter) -> Self {
        Self {
            units: Vec::new(),
            interpreter,
            journal: Journal::disabled(),
            next_effect_id: 1,
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn spawn(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(unit);
        id
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(index, unit)| (UnitId(index as u32), unit))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(Unit::is_alive)
    }

    pub fn interpreter(&self) -> ActionInterpreter {
        self.interpreter
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    /// Records a narration event if the journal is enabled.
    pub(crate) fn narrate(&mut self, event: impl FnOnce(&Self) -> CombatEvent) {
        if self.journal.is_enabled() {
            let event = event(self);
            self.journal.record(event);
        }
    }

    pub(crate) fn unit_name(&self, id: UnitId) -> String {
        self.unit(id)
            .map(|unit| unit.name().to_owned())
            .unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn allocate_effect_id(&mut self) -> EffectId {
        let id = EffectId(self.next_effect_id);
        self.next_effect_id += 1;
        id
    }

    // ========================================================================
    // Attribute Model
    // ========================================================================

    /// Reads an attribute with every passive modifier applied.
    ///
    /// Unknown units and undefined attributes read as 0.
    pub fn attribute(&self, id: UnitId, name: &str) -> f64 {
        self.attribute_at(id, name, 0)
    }

    pub fn hp(&self, id: UnitId) -> i64 {
        self.core_at(id, CoreAttribute::Hp, 0) as i64
    }

    pub fn attack(&self, id: UnitId) -> i64 {
        self.attack_at(id, 0)
    }

    pub fn armor(&self, id: UnitId) -> i64 {
        self.core_at(id, CoreAttribute::Armor, 0) as i64
    }

    pub fn speed(&self, id: UnitId) -> i64 {
        self.core_at(id, CoreAttribute::Speed, 0) as i64
    }

    pub fn crit_rate(&self, id: UnitId) -> f64 {
        self.core_at(id, CoreAttribute::CritRate, 0)
    }

    pub(crate) fn attack_at(&self, id: UnitId, depth: u8) -> i64 {
        self.core_at(id, CoreAttribute::Attack, depth) as i64
    }

    fn core_at(&self, id: UnitId, attribute: CoreAttribute, depth: u8) -> f64 {
        self.attribute_at(id, attribute.as_ref(), depth)
    }

    /// Aggregates passive modifiers in attach order and resolves the value.
    ///
    /// Past [`CombatConfig::MAX_ATTRIBUTE_DEPTH`] nested reads the raw value is
    /// returned, which breaks cycles between passives that read each other.
    pub(crate) fn attribute_at(&self, id: UnitId, name: &str, depth: u8) -> f64 {
        let Some(unit) = self.unit(id) else {
            return 0.0;
        };
        let Some(attribute) = unit.attribute(name) else {
            debug!(target: "combat::stats", unit = unit.name(), "attribute '{name}' is not defined");
            return 0.0;
        };
        if depth >= CombatConfig::MAX_ATTRIBUTE_DEPTH {
            debug!(
                target: "combat::stats",
                unit = unit.name(),
                "attribute '{name}' read at depth {depth}, skipping passives"
            );
            return attribute.kind.cast(attribute.raw());
        }

        let modifier: PassiveModifier = unit
            .effects()
            .iter()
            .filter(|effect| effect.hooks().has(TriggerPhase::Passive))
            .filter_map(|effect| {
                let ctx = HookContext::new(TriggerPhase::Passive, id, effect)
                    .with_payload(HookPayload::Attribute(name))
                    .with_depth(depth);
                self.interpreter.evaluate_passive(
                    effect.hooks().get(TriggerPhase::Passive),
                    &ctx,
                    self,
                )
            })
            .collect();

        attribute.resolve(modifier)
    }

    /// Field lookup for `owner.<field>` and `source.<field>` references.
    pub(crate) fn unit_field(&self, id: UnitId, field: &str, depth: u8) -> Option<f64> {
        let unit = self.unit(id)?;
        match field {
            "current_hp" => Some(unit.current_hp() as f64),
            "max_hp" => Some(unit.max_hp() as f64),
            "missing_hp" => Some(unit.max_hp().saturating_sub(unit.current_hp()).max(0) as f64),
            name => unit
                .attribute(name)
                .map(|_| self.attribute_at(id, name, depth.saturating_add(1))),
        }
    }

    // ========================================================================
    // Vitals
    // ========================================================================

    /// Applies damage mitigated by the unit's current armor.
    ///
    /// Does not fire damage hooks; see [`Arena::strike`] for direct hits.
    pub fn take_damage(&mut self, id: UnitId, amount: i64, is_crit: bool) -> Option<DamageReport> {
        let armor = self.core_at(id, CoreAttribute::Armor, 0);
        let report = self.unit_mut(id)?.absorb_damage(amount, is_crit, armor);
        self.narrate(|arena| CombatEvent::Damaged {
            unit: arena.unit_name(id),
            amount: report.dealt,
            is_crit,
            remaining_hp: report.remaining_hp,
        });
        Some(report)
    }

    /// Heals up to the unit's missing HP. Returns the amount restored.
    pub fn heal(&mut self, id: UnitId, amount: f64) -> i64 {
        let Some(unit) = self.unit_mut(id) else {
            return 0;
        };
        let gained = unit.restore_hp(amount);
        let current_hp = unit.current_hp();
        self.narrate(|arena| CombatEvent::Healed {
            unit: arena.unit_name(id),
            amount: gained,
            current_hp,
        });
        gained
    }

    pub fn set_flag(&mut self, id: UnitId, flag: &str, value: ParamValue) {
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        unit.set_flag(flag, value.clone());
        self.narrate(|arena| CombatEvent::FlagSet {
            unit: arena.unit_name(id),
            flag: flag.to_owned(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::action::{ActionStep, ValueSource};
    use crate::effect::{EffectInstance, HookTable, ParamBag};
    use crate::stats::BaseStats;

    fn buff(attribute: &str, ratio: f64, flat: f64) -> EffectInstance {
        let hooks = HookTable::new().with(
            TriggerPhase::Passive,
            vec![ActionStep::ModifyAttribute {
                ratio: ValueSource::Literal(ratio),
                flat: ValueSource::Literal(flat),
            }],
        );
        let params = ParamBag::new()
            .with("target_attribute", attribute)
            .with("duration", "infinite");
        EffectInstance::new(format!("{attribute}_buff"), Arc::new(hooks), params)
    }

    fn arena_with(stats: BaseStats) -> (Arena, UnitId) {
        let mut arena = Arena::new(ActionInterpreter::new());
        let id = arena.spawn(Unit::new("subject", &stats));
        (arena, id)
    }

    #[test]
    fn passive_modifiers_aggregate_in_formula_order() {
        let (mut arena, id) = arena_with(BaseStats::new(100.0, 20.0, 0.0, 10.0));

        arena.attach_effect(id, buff("attack", 1.5, 0.0));
        arena.attach_effect(id, buff("attack", 1.0, 10.0));
        arena.attach_effect(id, buff("armor", 2.0, 5.0));

        // (20 + 10) * 1.5 = 45
        assert_eq!(arena.attack(id), 45);
        // (0 + 5) * 2 = 10
        assert_eq!(arena.armor(id), 10);
        assert_eq!(arena.speed(id), 10);
    }

    #[test]
    fn reads_are_recomputed_after_effects_leave() {
        let (mut arena, id) = arena_with(BaseStats::new(100.0, 20.0, 0.0, 10.0));

        arena.attach_effect(id, buff("attack", 2.0, 0.0));
        assert_eq!(arena.attack(id), 40);

        arena.clear_effects(id);
        assert_eq!(arena.attack(id), 20);
    }

    #[test]
    fn integer_attributes_truncate() {
        let (mut arena, id) = arena_with(BaseStats::new(100.0, 15.0, 0.0, 7.0));

        arena.attach_effect(id, buff("speed", 1.5, 0.0));
        // 7 * 1.5 = 10.5 -> 10
        assert_eq!(arena.speed(id), 10);
    }

    #[test]
    fn undefined_attribute_reads_zero() {
        let (arena, id) = arena_with(BaseStats::default());

        assert_eq!(arena.attribute(id, "luck"), 0.0);
        assert_eq!(arena.attribute(UnitId(42), "attack"), 0.0);
    }

    #[test]
    fn self_referential_passive_terminates() {
        let (mut arena, id) = arena_with(BaseStats::new(100.0, 20.0, 0.0, 10.0));

        // attack += owner.attack, which reads attack again
        let hooks = HookTable::new().with(
            TriggerPhase::Passive,
            vec![ActionStep::ModifyAttribute {
                ratio: ValueSource::Literal(1.0),
                flat: ValueSource::Field {
                    object: crate::action::ContextKey::Owner,
                    field: "attack".into(),
                },
            }],
        );
        let params = ParamBag::new().with("target_attribute", "attack");
        arena.attach_effect(id, EffectInstance::new("echo", Arc::new(hooks), params));

        // The innermost read returns raw 20; each of the four levels above adds 20.
        assert_eq!(arena.attack(id), 100);
    }

    #[test]
    fn armor_mitigates_damage() {
        let (mut arena, id) = arena_with(BaseStats::new(100.0, 10.0, 100.0, 10.0));

        let report = arena.take_damage(id, 40, false).unwrap();

        assert_eq!(report.dealt, 20);
        assert_eq!(arena.unit(id).unwrap().current_hp(), 80);
    }

    #[test]
    fn heal_clamps_to_max_hp() {
        let (mut arena, id) = arena_with(BaseStats::new(100.0, 10.0, 0.0, 10.0));

        arena.take_damage(id, 30, false);
        assert_eq!(arena.heal(id, 1e9), 30);
        assert_eq!(arena.unit(id).unwrap().current_hp(), 100);
    }
}
