//! Skill template catalog.
//!
//! RON format: a map from skill name to [`SkillSpec`]. Effect requests are
//! parameter maps holding the template `name` plus per-skill overrides:
//!
//! ```ron
//! {
//!     "frostbolt": (
//!         damage_multiplier: 1.2,
//!         cooldown: 2,
//!         effects: [{"name": "slow", "duration": 2}],
//!     ),
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{
    EffectRequest, EffectTemplateProvider, ParamBag, Skill, SkillOverrides, SkillTemplateProvider,
    TargetType,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::loaders::{LoadResult, read_file};

/// Skill template as written in a content file.
#[derive(Clone, Debug, Deserialize)]
pub struct SkillSpec {
    #[serde(default)]
    pub damage_multiplier: f64,
    #[serde(default, alias = "effects_to_apply")]
    pub effects: Vec<ParamBag>,
    #[serde(default)]
    pub cooldown: u32,
    /// `"enemy"` or `"self"`.
    #[serde(default = "SkillSpec::default_target_type")]
    pub target_type: String,
    #[serde(default = "SkillSpec::default_target_count")]
    pub target_count: u32,
}

impl SkillSpec {
    fn default_target_type() -> String {
        TargetType::Enemy.to_string()
    }

    fn default_target_count() -> u32 {
        1
    }

    pub fn compile(&self, name: &str) -> LoadResult<Skill> {
        let effects = effect_requests(&self.effects)
            .map_err(|e| anyhow::anyhow!("Invalid effect list of skill '{}': {}", name, e))?;
        let target_type = parse_target_type(&self.target_type)
            .map_err(|e| anyhow::anyhow!("Invalid skill '{}': {}", name, e))?;
        Ok(Skill::new(name)
            .with_damage_multiplier(self.damage_multiplier)
            .with_effects(effects)
            .with_cooldown(self.cooldown)
            .with_target(target_type, self.target_count))
    }
}

pub(crate) fn parse_target_type(name: &str) -> LoadResult<TargetType> {
    name.parse::<TargetType>()
        .map_err(|_| anyhow::anyhow!("unknown target type '{}'", name))
}

/// Splits `{"name": ..., <overrides>}` maps into effect requests.
pub fn effect_requests(entries: &[ParamBag]) -> LoadResult<Vec<EffectRequest>> {
    entries
        .iter()
        .map(|entry| {
            let name = entry
                .text("name")
                .ok_or_else(|| anyhow::anyhow!("effect request without a `name`"))?;
            let overrides: ParamBag = entry
                .iter()
                .filter(|(key, _)| *key != "name")
                .map(|(key, value)| (key, value.clone()))
                .collect();
            Ok(EffectRequest::new(name).with_overrides(overrides))
        })
        .collect()
}

/// Registry of skill templates by name.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    templates: BTreeMap<String, Skill>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load skill templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load skills from {}: {}", path.display(), e))
    }

    pub fn from_ron(content: &str) -> LoadResult<Self> {
        let specs: BTreeMap<String, SkillSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let mut catalog = Self::new();
        for (name, spec) in &specs {
            catalog.register(spec.compile(name)?);
        }
        debug!(target: "combat::content", count = catalog.len(), "skill templates loaded");
        Ok(catalog)
    }

    /// Adds a template, replacing any template of the same name.
    pub fn register(&mut self, skill: Skill) {
        if self.templates.contains_key(skill.name()) {
            warn!(
                target: "combat::content",
                "overwriting registered skill '{}'",
                skill.name()
            );
        }
        self.templates.insert(skill.name().to_owned(), skill);
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl SkillTemplateProvider for SkillCatalog {
    fn create(
        &self,
        name: &str,
        effects: &dyn EffectTemplateProvider,
        overrides: &SkillOverrides,
    ) -> Option<Skill> {
        let mut skill = self.get(name)?.clone();
        overrides.apply(&mut skill);

        for request in skill.effects() {
            if effects.create(&request.name, &request.overrides).is_none() {
                warn!(
                    target: "combat::content",
                    skill = name,
                    "effect '{}' is not registered and will be skipped on use",
                    request.name
                );
            }
        }
        Some(skill)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::NoEffects;

    use super::*;

    const CATALOG: &str = r#"{
        "cleave": (damage_multiplier: 1.1, cooldown: 2, target_count: 2),
        "rejuvenate": (
            target_type: "self",
            effects_to_apply: [{"name": "regeneration", "duration": 4}],
            cooldown: 3,
        ),
        "strike": (damage_multiplier: 1.0),
    }"#;

    #[test]
    fn compiles_specs_into_skills() {
        let catalog = SkillCatalog::from_ron(CATALOG).unwrap();

        let cleave = catalog.get("cleave").unwrap();
        assert_eq!(cleave.damage_multiplier(), 1.1);
        assert_eq!(cleave.cooldown_max(), 2);
        assert_eq!(cleave.target_type(), TargetType::Enemy);
        assert_eq!(cleave.target_count(), 2);

        let rejuvenate = catalog.get("rejuvenate").unwrap();
        assert_eq!(rejuvenate.target_type(), TargetType::SelfCast);
        assert_eq!(rejuvenate.effects().len(), 1);
        assert_eq!(rejuvenate.effects()[0].name, "regeneration");
        assert_eq!(rejuvenate.effects()[0].overrides.number("duration"), Some(4.0));
        assert!(rejuvenate.effects()[0].overrides.get("name").is_none());

        assert_eq!(catalog.get("strike").unwrap().target_count(), 1);
    }

    #[test]
    fn overrides_apply_per_instance() {
        let catalog = SkillCatalog::from_ron(CATALOG).unwrap();
        let overrides = SkillOverrides {
            cooldown: Some(0),
            target_count: Some(3),
            ..SkillOverrides::default()
        };

        let skill = catalog.create("cleave", &NoEffects, &overrides).unwrap();

        assert_eq!(skill.cooldown_max(), 0);
        assert_eq!(skill.target_count(), 3);
        assert_eq!(catalog.get("cleave").unwrap().target_count(), 2);
        assert!(catalog.create("fireball", &NoEffects, &overrides).is_none());
    }

    #[test]
    fn unknown_target_types_fail_the_load() {
        let broken = r#"{"hex": (target_type: "everyone")}"#;
        let error = SkillCatalog::from_ron(broken).unwrap_err().to_string();
        assert!(error.contains("everyone"), "{error}");
    }

    #[test]
    fn effect_requests_need_a_name() {
        let broken = r#"{"hex": (effects: [{"duration": 2}])}"#;
        let error = SkillCatalog::from_ron(broken).unwrap_err().to_string();
        assert!(error.contains("skill 'hex'"), "{error}");
    }
}
