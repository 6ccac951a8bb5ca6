//! Unit (hero) template catalog.
//!
//! RON format: a map from unit name to [`UnitSpec`]. Each skill slot names
//! a skill template and may override any of its fields, including the
//! whole effect list:
//!
//! ```ron
//! #![enable(implicit_some)]
//! {
//!     "jaina": (
//!         base_stats: (hp: 420.0, attack: 52.0, armor: 8.0, speed: 12.0),
//!         skills: [
//!             (name: "frostbolt", cooldown: 1),
//!             (name: "blizzard", effects: [{"name": "slow", "duration": 3}]),
//!         ],
//!     ),
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use combat_core::{
    BaseStats, ParamBag, SkillOverrides, SkillTemplateProvider, StatOverrides, Unit,
    UnitTemplateProvider,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::loaders::effects::EffectCatalog;
use crate::loaders::skills::{SkillCatalog, effect_requests, parse_target_type};
use crate::loaders::{LoadResult, read_file};

/// Unit template as written in a content file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UnitSpec {
    #[serde(default)]
    pub base_stats: BaseStats,
    #[serde(default)]
    pub skills: Vec<SkillSlotSpec>,
}

/// One skill of a unit template with its per-unit overrides.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SkillSlotSpec {
    pub name: String,
    #[serde(default)]
    pub damage_multiplier: Option<f64>,
    #[serde(default)]
    pub cooldown: Option<u32>,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub target_count: Option<u32>,
    #[serde(default, alias = "custom_effects")]
    pub effects: Option<Vec<ParamBag>>,
}

impl SkillSlotSpec {
    fn overrides(&self) -> LoadResult<SkillOverrides> {
        Ok(SkillOverrides {
            damage_multiplier: self.damage_multiplier,
            cooldown: self.cooldown,
            target_type: self.target_type.as_deref().map(parse_target_type).transpose()?,
            target_count: self.target_count,
            effects: self.effects.as_deref().map(effect_requests).transpose()?,
        })
    }
}

/// Compiled unit template.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitTemplate {
    pub base_stats: BaseStats,
    pub skills: Vec<(String, SkillOverrides)>,
}

impl UnitTemplate {
    pub fn compile(name: &str, spec: &UnitSpec) -> LoadResult<Self> {
        let skills = spec
            .skills
            .iter()
            .map(|slot| {
                slot.overrides()
                    .map(|overrides| (slot.name.clone(), overrides))
                    .map_err(|e| {
                        anyhow::anyhow!("Invalid skill slot '{}' of unit '{}': {}", slot.name, name, e)
                    })
            })
            .collect::<LoadResult<_>>()?;
        Ok(Self {
            base_stats: spec.base_stats.clone(),
            skills,
        })
    }
}

/// Registry of unit templates, resolving skills and effects through the
/// shared catalogs.
#[derive(Clone, Debug)]
pub struct UnitCatalog {
    templates: BTreeMap<String, UnitTemplate>,
    skills: Arc<SkillCatalog>,
    effects: Arc<EffectCatalog>,
}

impl UnitCatalog {
    pub fn new(skills: Arc<SkillCatalog>, effects: Arc<EffectCatalog>) -> Self {
        Self {
            templates: BTreeMap::new(),
            skills,
            effects,
        }
    }

    /// Load unit templates from a RON file.
    pub fn load(
        path: &Path,
        skills: Arc<SkillCatalog>,
        effects: Arc<EffectCatalog>,
    ) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::from_ron(&content, skills, effects)
            .map_err(|e| anyhow::anyhow!("Failed to load units from {}: {}", path.display(), e))
    }

    pub fn from_ron(
        content: &str,
        skills: Arc<SkillCatalog>,
        effects: Arc<EffectCatalog>,
    ) -> LoadResult<Self> {
        let specs: BTreeMap<String, UnitSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        let mut catalog = Self::new(skills, effects);
        for (name, spec) in &specs {
            catalog.register(name, UnitTemplate::compile(name, spec)?);
        }
        debug!(target: "combat::content", count = catalog.len(), "unit templates loaded");
        Ok(catalog)
    }

    pub fn register(&mut self, name: impl Into<String>, template: UnitTemplate) {
        let name = name.into();
        if self.templates.contains_key(&name) {
            warn!(target: "combat::content", "overwriting registered unit '{name}'");
        }
        self.templates.insert(name, template);
    }

    pub fn get(&self, name: &str) -> Option<&UnitTemplate> {
        self.templates.get(name)
    }

    /// Registered unit names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn skills(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }
}

impl UnitTemplateProvider for UnitCatalog {
    /// Assembles a fresh unit. Skills whose template is missing are skipped.
    fn create(&self, name: &str, stat_overrides: &StatOverrides) -> Option<Unit> {
        let Some(template) = self.get(name) else {
            warn!(target: "combat::content", "unit template '{name}' is not registered");
            return None;
        };

        let stats = template
            .base_stats
            .clone()
            .with_overrides(stat_overrides.iter().map(|(key, value)| (key.as_str(), *value)));

        let skills = template.skills.iter().filter_map(|(skill, overrides)| {
            let created = self.skills.create(skill, self.effects.as_ref(), overrides);
            if created.is_none() {
                warn!(
                    target: "combat::content",
                    unit = name,
                    "skill template '{skill}' is not registered, slot skipped"
                );
            }
            created
        });

        Some(Unit::new(name, &stats).with_skills(skills))
    }
}

#[cfg(test)]
mod tests {
    use combat_core::TargetType;

    use super::*;

    const SKILLS: &str = r#"{
        "strike": (damage_multiplier: 1.0, cooldown: 1),
        "mend": (target_type: "self", effects: [{"name": "regeneration"}], cooldown: 4),
    }"#;

    const UNITS: &str = r#"#![enable(implicit_some)]
    {
        "knight": (
            base_stats: (hp: 300.0, attack: 25.0, armor: 20.0, speed: 8.0),
            skills: [
                (name: "strike", damage_multiplier: 1.5),
                (name: "vanish"),
                (name: "mend", effects: [{"name": "shield", "duration": 2}]),
            ],
        ),
        "squire": (),
    }"#;

    fn catalog() -> UnitCatalog {
        UnitCatalog::from_ron(
            UNITS,
            Arc::new(SkillCatalog::from_ron(SKILLS).unwrap()),
            Arc::new(EffectCatalog::new()),
        )
        .unwrap()
    }

    #[test]
    fn assembles_units_with_overridden_skills() {
        let catalog = catalog();

        let knight = catalog.create("knight", &StatOverrides::new()).unwrap();

        assert_eq!(knight.max_hp(), 300);
        let names: Vec<_> = knight.skills().iter().map(|skill| skill.name()).collect();
        assert_eq!(names, ["strike", "mend"]);
        assert_eq!(knight.skills()[0].damage_multiplier(), 1.5);
        assert_eq!(knight.skills()[0].cooldown_max(), 1);
        assert_eq!(knight.skills()[1].target_type(), TargetType::SelfCast);
        assert_eq!(knight.skills()[1].effects()[0].name, "shield");
    }

    #[test]
    fn stat_overrides_replace_template_values() {
        let catalog = catalog();
        let overrides = StatOverrides::from([("attack".to_string(), 40.0), ("hp".to_string(), 500.0)]);

        let knight = catalog.create("knight", &overrides).unwrap();

        assert_eq!(knight.max_hp(), 500);
        assert_eq!(knight.base(combat_core::CoreAttribute::Attack), 40.0);
        assert_eq!(
            catalog.get("knight").unwrap().base_stats.attack,
            25.0,
            "template must stay untouched"
        );
    }

    #[test]
    fn empty_templates_use_default_stats() {
        let squire = catalog().create("squire", &StatOverrides::new()).unwrap();
        assert_eq!(squire.max_hp(), BaseStats::DEFAULT_HP as i64);
        assert!(squire.skills().is_empty());
    }

    #[test]
    fn omitted_stats_default_to_zero() {
        let units = r#"{"recruit": (base_stats: (hp: 50.0))}"#;
        let catalog = UnitCatalog::from_ron(
            units,
            Arc::new(SkillCatalog::new()),
            Arc::new(EffectCatalog::new()),
        )
        .unwrap();

        let stats = &catalog.get("recruit").unwrap().base_stats;
        assert_eq!(stats.hp, 50.0);
        assert_eq!(stats.attack, 0.0);
        assert_eq!(stats.armor, 0.0);
        assert_eq!(stats.speed, 0.0);
        assert_eq!(stats.crit_rate, 0.0);

        let recruit = catalog.create("recruit", &StatOverrides::new()).unwrap();
        assert_eq!(recruit.max_hp(), 50);
        assert_eq!(recruit.base(combat_core::CoreAttribute::Speed), 0.0);
    }

    #[test]
    fn missing_units_yield_nothing() {
        assert!(catalog().create("paladin", &StatOverrides::new()).is_none());
    }

    #[test]
    fn bad_slot_target_type_fails_the_load() {
        let units = r#"#![enable(implicit_some)]
        {"rogue": (skills: [(name: "strike", target_type: "behind")])}"#;
        let result = UnitCatalog::from_ron(
            units,
            Arc::new(SkillCatalog::new()),
            Arc::new(EffectCatalog::new()),
        );

        let error = result.unwrap_err().to_string();
        assert!(error.contains("rogue"), "{error}");
    }
}
