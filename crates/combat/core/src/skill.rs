//! Cooldown-gated abilities.
//!
//! A skill deals `floor(attack * damage_multiplier)` to each selected target
//! (one critical roll per use) and then attaches one fresh effect instance
//! per `(effect request, target)` pair, with the user as source.
//!
//! Cooldown accounting: using a skill sets `current_cooldown` to
//! `cooldown_max + 1`. The user's own turn-end decrements it once, so the
//! skill stays unavailable for exactly `cooldown_max` further turns.

use tracing::{debug, warn};

use crate::effect::ParamBag;
use crate::env::{CombatRng, EffectTemplateProvider};
use crate::event::CombatEvent;
use crate::state::{Arena, UnitId};

/// Who a skill targets.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetType {
    /// The user only.
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfCast,
    /// `target_count` distinct living opponents.
    #[default]
    Enemy,
}

/// Named effect template plus per-skill parameter overrides.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRequest {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: ParamBag,
}

impl EffectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overrides: ParamBag::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: ParamBag) -> Self {
        self.overrides = overrides;
        self
    }
}

// ============================================================================
// Skill
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    name: String,
    damage_multiplier: f64,
    effects: Vec<EffectRequest>,
    cooldown_max: u32,
    current_cooldown: u32,
    target_type: TargetType,
    target_count: u32,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            damage_multiplier: 0.0,
            effects: Vec::new(),
            cooldown_max: 0,
            current_cooldown: 0,
            target_type: TargetType::Enemy,
            target_count: 1,
        }
    }

    pub fn with_damage_multiplier(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }

    pub fn with_effect(mut self, request: EffectRequest) -> Self {
        self.effects.push(request);
        self
    }

    pub fn with_effects(mut self, requests: Vec<EffectRequest>) -> Self {
        self.effects = requests;
        self
    }

    pub fn with_cooldown(mut self, cooldown_max: u32) -> Self {
        self.cooldown_max = cooldown_max;
        self
    }

    pub fn with_target(mut self, target_type: TargetType, target_count: u32) -> Self {
        self.target_type = target_type;
        self.target_count = target_count;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn damage_multiplier(&self) -> f64 {
        self.damage_multiplier
    }

    pub fn effects(&self) -> &[EffectRequest] {
        &self.effects
    }

    pub fn cooldown_max(&self) -> u32 {
        self.cooldown_max
    }

    pub fn current_cooldown(&self) -> u32 {
        self.current_cooldown
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    pub fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    pub fn tick_cooldown(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }

    pub fn start_cooldown(&mut self) {
        self.current_cooldown = self.cooldown_max.saturating_add(1);
    }

    /// Picks targets: the user for self-cast skills, otherwise up to
    /// `target_count` distinct units sampled from `pool`.
    pub fn select_targets(&self, user: UnitId, pool: &[UnitId], rng: &mut CombatRng) -> Vec<UnitId> {
        match self.target_type {
            TargetType::SelfCast => vec![user],
            TargetType::Enemy => rng.sample(pool, self.target_count as usize),
        }
    }
}

/// Per-unit adjustments applied on top of a skill template.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillOverrides {
    pub damage_multiplier: Option<f64>,
    pub cooldown: Option<u32>,
    pub target_type: Option<TargetType>,
    pub target_count: Option<u32>,
    pub effects: Option<Vec<EffectRequest>>,
}

impl SkillOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, skill: &mut Skill) {
        if let Some(multiplier) = self.damage_multiplier {
            skill.damage_multiplier = multiplier;
        }
        if let Some(cooldown) = self.cooldown {
            skill.cooldown_max = cooldown;
        }
        if let Some(target_type) = self.target_type {
            skill.target_type = target_type;
        }
        if let Some(count) = self.target_count {
            skill.target_count = count;
        }
        if let Some(effects) = &self.effects {
            skill.effects = effects.clone();
        }
    }
}

// ============================================================================
// Skill Use
// ============================================================================

impl Arena {
    /// Uses the skill at `index` of `user`'s skill list.
    ///
    /// Returns `false` without touching any state if the skill is missing or
    /// still cooling down.
    pub fn use_skill(
        &mut self,
        user: UnitId,
        index: usize,
        opponents: &[UnitId],
        rng: &mut CombatRng,
        effects: &dyn EffectTemplateProvider,
    ) -> bool {
        let Some(skill) = self.unit(user).and_then(|unit| unit.skills().get(index)) else {
            return false;
        };
        if !skill.is_ready() {
            debug!(
                target: "combat::skill",
                skill = skill.name(),
                cooldown = skill.current_cooldown(),
                "skill not ready"
            );
            return false;
        }
        let skill = skill.clone();

        let pool: Vec<UnitId> = opponents
            .iter()
            .copied()
            .filter(|&id| self.is_alive(id))
            .collect();
        let targets = skill.select_targets(user, &pool, rng);

        self.narrate(|arena| CombatEvent::SkillUsed {
            unit: arena.unit_name(user),
            skill: skill.name().to_owned(),
            targets: targets.iter().map(|&id| arena.unit_name(id)).collect(),
        });

        if skill.damage_multiplier() > 0.0 && !targets.is_empty() {
            let damage = (self.attack(user) as f64 * skill.damage_multiplier()).floor() as i64;
            let is_crit = rng.roll(self.crit_rate(user));
            for &target in &targets {
                self.strike(user, target, damage, is_crit);
            }
        }

        for request in skill.effects() {
            for &target in &targets {
                match effects.create(&request.name, &request.overrides) {
                    Some(effect) => {
                        self.attach_effect(target, effect.with_source(user));
                    }
                    None => warn!(
                        target: "combat::skill",
                        skill = skill.name(),
                        "effect template '{}' is not registered",
                        request.name
                    ),
                }
            }
        }

        if let Some(slot) = self
            .unit_mut(user)
            .and_then(|unit| unit.skills_mut().get_mut(index))
        {
            slot.start_cooldown();
        }
        true
    }
}
