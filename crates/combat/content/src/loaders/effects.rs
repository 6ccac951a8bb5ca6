//! Effect template catalog.
//!
//! RON format: a map from template name to [`EffectSpec`].
//!
//! ```ron
//! {
//!     "poison": (
//!         default_params: {"duration": 3, "potency": 0.5},
//!         logic_hooks: {
//!             "ON_TURN_END": [
//!                 {"type": "deal_damage", "target": "owner",
//!                  "amount": {"source": "source_attack", "multiplier": "potency"}},
//!             ],
//!         },
//!     ),
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use combat_core::{EffectInstance, EffectTemplateProvider, HookTable, ParamBag, TriggerPhase};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::loaders::actions::{RawStep, compile_steps};
use crate::loaders::{LoadResult, read_file};

/// Effect template as written in a content file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EffectSpec {
    #[serde(default)]
    pub default_params: ParamBag,
    /// Step lists keyed by phase name (`ON_TURN_END`, `PASSIVE`, ...).
    #[serde(default)]
    pub logic_hooks: BTreeMap<String, Vec<RawStep>>,
}

/// Compiled effect template. Instances share its hook table.
#[derive(Clone, Debug)]
pub struct EffectTemplate {
    name: String,
    default_params: ParamBag,
    hooks: Arc<HookTable>,
}

impl EffectTemplate {
    pub fn new(name: impl Into<String>, hooks: HookTable, default_params: ParamBag) -> Self {
        Self {
            name: name.into(),
            default_params,
            hooks: Arc::new(hooks),
        }
    }

    /// Compiles a spec, validating every step and expression.
    ///
    /// Phase names outside the known set are logged and dropped.
    pub fn compile(name: &str, spec: &EffectSpec) -> LoadResult<Self> {
        let mut hooks = HookTable::new();
        for (phase_name, raw_steps) in &spec.logic_hooks {
            let Ok(phase) = phase_name.parse::<TriggerPhase>() else {
                warn!(
                    target: "combat::content",
                    effect = name,
                    "unknown trigger phase '{phase_name}' ignored"
                );
                continue;
            };
            let steps = compile_steps(raw_steps).map_err(|e| {
                anyhow::anyhow!("Invalid {} hook of effect '{}': {}", phase, name, e)
            })?;
            hooks.set(phase, steps);
        }
        Ok(Self::new(name, hooks, spec.default_params.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_params(&self) -> &ParamBag {
        &self.default_params
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    /// Creates a fresh instance with `overrides` layered over the defaults.
    pub fn instantiate(&self, overrides: &ParamBag) -> EffectInstance {
        EffectInstance::new(
            self.name.clone(),
            Arc::clone(&self.hooks),
            self.default_params.merged(overrides),
        )
    }
}

/// Registry of effect templates by name.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    templates: BTreeMap<String, EffectTemplate>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load effect templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::from_ron(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load effects from {}: {}", path.display(), e))
    }

    pub fn from_ron(content: &str) -> LoadResult<Self> {
        let specs: BTreeMap<String, EffectSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;

        let mut catalog = Self::new();
        for (name, spec) in &specs {
            catalog.register(EffectTemplate::compile(name, spec)?);
        }
        debug!(target: "combat::content", count = catalog.len(), "effect templates loaded");
        Ok(catalog)
    }

    /// Adds a template, replacing any template of the same name.
    pub fn register(&mut self, template: EffectTemplate) {
        if self.templates.contains_key(template.name()) {
            warn!(
                target: "combat::content",
                "overwriting registered effect '{}'",
                template.name()
            );
        }
        self.templates.insert(template.name().to_owned(), template);
    }

    pub fn get(&self, name: &str) -> Option<&EffectTemplate> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
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

impl EffectTemplateProvider for EffectCatalog {
    fn create(&self, name: &str, overrides: &ParamBag) -> Option<EffectInstance> {
        self.get(name).map(|template| template.instantiate(overrides))
    }
}
