use super::{mutation::MutateParams, traits::ConfigSection};
use crate::error::TpgError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `TPGRAPH__MUTATION__P_LRN_DEL=0.5`
pub const ENV_PREFIX: &str = "TPGRAPH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seed for the random source; entropy when absent
    pub seed: Option<u64>,
    pub mutation: MutateParams,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TpgError> {
        self.mutation.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TpgError> {
        let contents = std::fs::read_to_string(path)?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| TpgError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.install(config)
    }

    /// Load `path` and apply `TPGRAPH__<SECTION>__<FIELD>` environment overrides on top.
    pub fn load_layered<P: AsRef<Path>>(&self, path: P) -> Result<(), TpgError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TpgError::Configuration(format!("Failed to layer config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| TpgError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.install(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TpgError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| TpgError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to a copy and keep it only if it still validates
    pub fn update<F>(&self, f: F) -> Result<(), TpgError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.install(candidate)
    }

    fn install(&self, config: AppConfig) -> Result<(), TpgError> {
        config.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let dir = std::env::temp_dir().join(format!("tpgraph-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tpgraph.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.seed = Some(7);
                c.mutation.rampant_gen = 5;
                c.mutation.rampant_min = 2;
                c.mutation.rampant_max = 4;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        let config = reloaded.get();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.mutation.rampant_gen, 5);
        assert_eq!(config.mutation.rampant_max, 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_update_rejects_invalid_and_keeps_previous() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.mutation.p_lrn_add = 1.5);
        assert!(result.is_err());
        assert_eq!(manager.get().mutation.p_lrn_add, MutateParams::default().p_lrn_add);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let manager = ConfigManager::new();
        let path = std::env::temp_dir().join("tpgraph-config-does-not-exist.toml");
        assert!(matches!(manager.load_from_file(&path), Err(TpgError::Io(_))));

        // Layered loading treats the file as optional
        manager.load_layered(&path).unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[mutation]\np_lrn_del = 0.3\n").unwrap();
        assert_eq!(config.mutation.p_lrn_del, 0.3);
        assert_eq!(config.mutation.p_lrn_add, MutateParams::default().p_lrn_add);
        assert!(config.seed.is_none());
    }
}
