//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_limit_is_optional() {
        assert_eq!(ConfigLoader::from_toml("").unwrap(), CombatConfig::default());
        assert_eq!(
            ConfigLoader::from_toml("round_limit = 150").unwrap(),
            CombatConfig::with_round_limit(150)
        );
        assert!(ConfigLoader::from_toml("round_limit = \"many\"").is_err());
    }
}
