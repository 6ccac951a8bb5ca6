use std::collections::BTreeMap;

use crate::combat::damage;
use crate::effect::{EffectId, EffectInstance, ParamValue};
use crate::skill::Skill;
use crate::stats::{Attribute, BaseStats, CoreAttribute};

/// Flag names that drive the stun state.
const STUN_FLAGS: [&str; 2] = ["stunned", "is_stunned"];

/// Result of one damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    /// Amount before mitigation.
    pub incoming: i64,
    /// HP actually removed.
    pub dealt: i64,
    pub is_crit: bool,
    pub remaining_hp: i64,
}

/// A combatant: attributes, attached effects, skills and vitals.
///
/// Maximum HP is fixed when the unit is built. Passive effects on `hp`
/// change what the attribute reads, not how much damage the unit can take.
#[derive(Clone, Debug)]
pub struct Unit {
    name: String,
    attributes: BTreeMap<String, Attribute>,
    effects: Vec<EffectInstance>,
    skills: Vec<Skill>,
    max_hp: i64,
    current_hp: i64,
    stunned: bool,
    flags: BTreeMap<String, ParamValue>,
    clearing: bool,
}

impl Unit {
    pub fn new(name: impl Into<String>, stats: &BaseStats) -> Self {
        let max_hp = stats.hp.trunc() as i64;
        Self {
            name: name.into(),
            attributes: stats.to_attributes(),
            effects: Vec::new(),
            skills: Vec::new(),
            max_hp,
            current_hp: max_hp,
            stunned: false,
            flags: BTreeMap::new(),
            clearing: false,
        }
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = Skill>) -> Self {
        for skill in skills {
            self.add_skill(skill);
        }
        self
    }

    /// Registers a skill. A skill with the same name is replaced in place,
    /// keeping its original position in the selection order.
    pub fn add_skill(&mut self, skill: Skill) {
        match self.skills.iter_mut().find(|existing| existing.name() == skill.name()) {
            Some(existing) => *existing = skill,
            None => self.skills.push(skill),
        }
    }

    /// Defines or replaces a named attribute.
    pub fn define_attribute(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.attributes.insert(name.into(), attribute);
    }

    // ===== accessors =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (name.as_str(), attr))
    }

    pub fn effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    pub fn effect(&self, id: EffectId) -> Option<&EffectInstance> {
        self.effects.iter().find(|effect| effect.id() == id)
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|effect| effect.name() == name)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.name() == name)
    }

    pub fn max_hp(&self) -> i64 {
        self.max_hp
    }

    pub fn current_hp(&self) -> i64 {
        self.current_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn flag(&self, name: &str) -> Option<&ParamValue> {
        self.flags.get(name)
    }

    // ===== vitals =====

    /// Writes a named flag. Stun flags also update the stun state.
    pub fn set_flag(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        if STUN_FLAGS.contains(&name.as_str()) {
            self.stunned = value.is_truthy();
        }
        self.flags.insert(name, value);
    }

    /// Applies mitigated damage. HP may drop below zero and saturates at
    /// `i64::MIN`.
    pub fn absorb_damage(&mut self, amount: i64, is_crit: bool, armor: f64) -> DamageReport {
        let dealt = damage::mitigated_damage(amount, armor, is_crit);
        self.current_hp = self.current_hp.saturating_sub(dealt);
        DamageReport {
            incoming: amount,
            dealt,
            is_crit,
            remaining_hp: self.current_hp,
        }
    }

    /// Restores HP up to the maximum, returning the amount gained.
    pub fn restore_hp(&mut self, amount: f64) -> i64 {
        let room = self.max_hp.saturating_sub(self.current_hp).max(0);
        let gained = (amount.floor() as i64).clamp(0, room);
        self.current_hp = self.current_hp.saturating_add(gained);
        gained
    }

    pub fn tick_skill_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.tick_cooldown();
        }
    }

    /// Typed base value of a core attribute, ignoring effects.
    pub fn base(&self, attribute: CoreAttribute) -> f64 {
        self.attributes
            .get(attribute.as_ref())
            .map(Attribute::raw)
            .unwrap_or_default()
    }

    // ===== arena-internal =====

    pub(crate) fn skills_mut(&mut self) -> &mut [Skill] {
        &mut self.skills
    }

    pub(crate) fn effects_mut(&mut self) -> &mut [EffectInstance] {
        &mut self.effects
    }

    pub(crate) fn push_effect(&mut self, effect: EffectInstance) {
        self.effects.push(effect);
    }

    pub(crate) fn take_effect(&mut self, id: EffectId) -> Option<EffectInstance> {
        let index = self.effects.iter().position(|effect| effect.id() == id)?;
        Some(self.effects.remove(index))
    }

    pub(crate) fn begin_clear(&mut self) -> Option<Vec<EffectInstance>> {
        if self.clearing {
            return None;
        }
        self.clearing = true;
        Some(std::mem::take(&mut self.effects))
    }

    pub(crate) fn end_clear(&mut self) {
        self.clearing = false;
    }
}
