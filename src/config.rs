//! Host-side policy configuration.
//!
//! Loaded in two tiers:
//! 1. TOML file (`quantum_policy.toml` or any path)
//! 2. Environment overrides (`RTOS_QUANTUM_NN_MODEL_PATH`)
//!
//! The network topology is fixed at build time and is not configurable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, ModelResult};
use crate::fixed::FixedPoint;
use crate::model_io::load_model;
use crate::network::{ModelParams, OUTPUT_SIZE};
use crate::policy::DEFAULT_QUANTA_NS;

/// Environment variable that overrides [`PolicyConfig::model_path`].
pub const MODEL_PATH_ENV: &str = "RTOS_QUANTUM_NN_MODEL_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Weights export to load; `None` keeps the compiled-in tables.
    pub model_path: Option<PathBuf>,
    /// Decision table: quantum length in ns for each network output.
    pub quanta_ns: [u64; OUTPUT_SIZE],
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { model_path: None, quanta_ns: DEFAULT_QUANTA_NS }
    }
}

impl PolicyConfig {
    /// Parse and validate TOML. No environment overrides are applied.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env_overrides();
        log::info!("loaded policy config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment, in production).
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(MODEL_PATH_ENV).filter(|p| !p.is_empty()) {
            log::debug!("{} overrides model_path with {}", MODEL_PATH_ENV, path);
            self.model_path = Some(PathBuf::from(path));
        }
    }

    /// Quanta must be non-zero and strictly ascending.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(i) = self.quanta_ns.iter().position(|&q| q == 0) {
            return Err(ConfigError::InvalidValue(format!("quanta_ns[{}] must be non-zero", i)));
        }
        if let Some(i) = self.quanta_ns.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ConfigError::InvalidValue(format!(
                "quanta_ns must be strictly ascending (index {} >= index {})",
                i,
                i + 1
            )));
        }
        Ok(())
    }

    /// Load the configured weights, if a path is set.
    pub fn load_model<T: FixedPoint>(&self) -> ModelResult<Option<Box<ModelParams<T>>>> {
        self.model_path.as_deref().map(|path| load_model::<T>(path)).transpose()
    }
}
