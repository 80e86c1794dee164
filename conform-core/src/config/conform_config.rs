//! Top-level Conform configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EngineConfig, MemoryConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CONFORM_*`)
/// 2. Project config (`conform.toml` in project root)
/// 3. User config (`~/.conform/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConformConfig {
    pub engine: EngineConfig,
    pub memory: MemoryConfig,
}

impl ConformConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(_) => {
                        // Non-parse errors from user config are warnings, not fatal.
                        // Continue with defaults.
                    }
                }
            }
        }

        // Project config
        let project_config_path = root.join("conform.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Highest priority: environment variables
        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ConformConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.engine.drift_share_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "engine.drift_share_threshold".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        for (field, value) in [
            ("engine.auto_fix_confidence", config.engine.auto_fix_confidence),
            ("engine.recommend_confidence", config.engine.recommend_confidence),
            ("engine.suggest_confidence", config.engine.suggest_confidence),
        ] {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0 and 100".to_string(),
                    });
                }
            }
        }
        if let Some(min) = config.engine.min_sample_size {
            if min == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "engine.min_sample_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.conform/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        conform_dir().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut ConformConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: ConformConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut ConformConfig, other: &ConformConfig) {
        if other.engine.min_sample_size.is_some() {
            base.engine.min_sample_size = other.engine.min_sample_size;
        }
        if other.engine.drift_share_threshold.is_some() {
            base.engine.drift_share_threshold = other.engine.drift_share_threshold;
        }
        if other.engine.auto_fix_confidence.is_some() {
            base.engine.auto_fix_confidence = other.engine.auto_fix_confidence;
        }
        if other.engine.recommend_confidence.is_some() {
            base.engine.recommend_confidence = other.engine.recommend_confidence;
        }
        if other.engine.suggest_confidence.is_some() {
            base.engine.suggest_confidence = other.engine.suggest_confidence;
        }
        if other.memory.memory_dir.is_some() {
            base.memory.memory_dir = other.memory.memory_dir.clone();
        }
        if other.memory.lock_timeout_ms.is_some() {
            base.memory.lock_timeout_ms = other.memory.lock_timeout_ms;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CONFORM_MIN_SAMPLE_SIZE`, `CONFORM_DRIFT_SHARE_THRESHOLD`, etc.
    fn apply_env_overrides(config: &mut ConformConfig) {
        if let Ok(val) = std::env::var("CONFORM_MIN_SAMPLE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.engine.min_sample_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_DRIFT_SHARE_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.engine.drift_share_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_MEMORY_DIR") {
            config.memory.memory_dir = Some(val);
        }
        if let Ok(val) = std::env::var("CONFORM_LOCK_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.memory.lock_timeout_ms = Some(v);
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level conform directory: `~/.conform/`.
pub fn conform_dir() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".conform"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
