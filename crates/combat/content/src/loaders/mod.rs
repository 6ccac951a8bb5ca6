//! Content loaders for reading combat data from files.
//!
//! Each loader turns a RON or TOML document into a compiled catalog that
//! implements one of the template provider traits of `combat-core`.

pub mod actions;
pub mod config;
pub mod effects;
pub mod factory;
pub mod skills;
pub mod units;

pub use actions::{ActionSpecError, RawStep, RawValue, compile_step, compile_steps};
pub use config::ConfigLoader;
pub use effects::{EffectCatalog, EffectSpec, EffectTemplate};
pub use factory::{ContentFactory, ContentLibrary};
pub use skills::{SkillCatalog, SkillSpec};
pub use units::{SkillSlotSpec, UnitCatalog, UnitSpec, UnitTemplate};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
