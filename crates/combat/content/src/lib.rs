//! Data-driven combat content and loaders.
//!
//! This crate houses the built-in hero roster and loads RON/TOML data files
//! into the template catalogs consumed by `combat-core`:
//! - Effect templates (phase-keyed action steps, default parameters)
//! - Skill templates
//! - Unit templates (base stats plus skill slots with overrides)
//! - Combat configuration
//!
//! Catalogs are compiled at load time: unknown phases and action types are
//! logged and skipped, malformed expressions fail the load.

pub mod loaders;

pub use loaders::{
    ActionSpecError, ConfigLoader, ContentFactory, ContentLibrary, EffectCatalog, EffectTemplate,
    LoadResult, SkillCatalog, UnitCatalog, UnitTemplate,
};
