//! Collaborators the combat rules consume but do not own.
//!
//! Templates for effects, skills and units come from outside the crate
//! (typically the RON catalogs in `combat-content`) through the provider
//! traits below. Randomness comes from [`CombatRng`].

mod rng;

pub use rng::{COMBAT_STREAM, CombatRng, PcgRng, RngOracle, compute_seed};

use std::collections::BTreeMap;

use crate::effect::{EffectInstance, ParamBag};
use crate::skill::{Skill, SkillOverrides};
use crate::state::Unit;

/// Named stat overrides applied when instantiating a unit template.
pub type StatOverrides = BTreeMap<String, f64>;

/// Resolves named effect templates into fresh instances.
pub trait EffectTemplateProvider: Send + Sync {
    /// Instantiates `name` with the template defaults merged with `overrides`.
    ///
    /// Returns `None` if `name` is not registered. Every call must return an
    /// independent instance.
    fn create(&self, name: &str, overrides: &ParamBag) -> Option<EffectInstance>;
}

/// Resolves named skill templates.
pub trait SkillTemplateProvider: Send + Sync {
    fn create(
        &self,
        name: &str,
        effects: &dyn EffectTemplateProvider,
        overrides: &SkillOverrides,
    ) -> Option<Skill>;
}

/// Resolves named unit templates, including their skills.
pub trait UnitTemplateProvider: Send + Sync {
    fn create(&self, name: &str, stat_overrides: &StatOverrides) -> Option<Unit>;
}

/// Provider with no templates, for battles fought with plain stats.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEffects;

impl EffectTemplateProvider for NoEffects {
    fn create(&self, _name: &str, _overrides: &ParamBag) -> Option<EffectInstance> {
        None
    }
}
