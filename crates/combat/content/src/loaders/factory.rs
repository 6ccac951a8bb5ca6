//! Content factory for building template catalogs from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use combat_core::CombatConfig;

use crate::loaders::{ConfigLoader, EffectCatalog, LoadResult, SkillCatalog, UnitCatalog};

const BUILTIN_CONFIG: &str = include_str!("../../data/config.toml");
const BUILTIN_EFFECTS: &str = include_str!("../../data/effects.ron");
const BUILTIN_SKILLS: &str = include_str!("../../data/skills.ron");
const BUILTIN_HEROES: &str = include_str!("../../data/heroes.ron");

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── skills.ron
/// └── heroes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load effect templates from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<EffectCatalog> {
        EffectCatalog::load(&self.data_dir.join("effects.ron"))
    }

    /// Load skill templates from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        SkillCatalog::load(&self.data_dir.join("skills.ron"))
    }

    /// Load unit templates from `heroes.ron`, resolving through the given
    /// skill and effect catalogs.
    pub fn load_units(
        &self,
        skills: Arc<SkillCatalog>,
        effects: Arc<EffectCatalog>,
    ) -> LoadResult<UnitCatalog> {
        UnitCatalog::load(&self.data_dir.join("heroes.ron"), skills, effects)
    }

    /// Load every catalog in dependency order.
    pub fn load_library(&self) -> LoadResult<ContentLibrary> {
        let config = self.load_config()?;
        let effects = Arc::new(self.load_effects()?);
        let skills = Arc::new(self.load_skills()?);
        let units = self.load_units(Arc::clone(&skills), Arc::clone(&effects))?;
        Ok(ContentLibrary {
            config,
            effects,
            skills,
            units,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Every catalog needed to assemble and fight battles.
#[derive(Clone, Debug)]
pub struct ContentLibrary {
    config: CombatConfig,
    effects: Arc<EffectCatalog>,
    skills: Arc<SkillCatalog>,
    units: UnitCatalog,
}

impl ContentLibrary {
    /// The roster compiled into this crate.
    pub fn builtin() -> LoadResult<Self> {
        let config = ConfigLoader::from_toml(BUILTIN_CONFIG)?;
        let effects = Arc::new(EffectCatalog::from_ron(BUILTIN_EFFECTS)?);
        let skills = Arc::new(SkillCatalog::from_ron(BUILTIN_SKILLS)?);
        let units = UnitCatalog::from_ron(BUILTIN_HEROES, Arc::clone(&skills), Arc::clone(&effects))?;
        Ok(Self {
            config,
            effects,
            skills,
            units,
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }

    pub fn skills(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn units(&self) -> &UnitCatalog {
        &self.units
    }

    /// Names of every unit template, sorted.
    pub fn hero_names(&self) -> Vec<String> {
        self.units.names().map(str::to_owned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builtin_roster_loads() {
        let library = ContentLibrary::builtin().unwrap();

        assert!(library.units().len() >= 6);
        assert!(!library.effects().is_empty());
        assert!(!library.skills().is_empty());
        assert!(library.config().round_limit.is_some());
    }
}
