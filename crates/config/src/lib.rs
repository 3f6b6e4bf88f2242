//! Effect configuration: construction settings plus sparse emitter options,
//! read from YAML or JSON.
//!
//! ```yaml
//! settings:
//!   particle_count: 2000
//!   lifetime: 1.5
//!   seed: 42
//! emitter:
//!   originPitch: 1.5
//!   originYaw: 1.5
//!   originIntensity: 5
//!   originPosition: [0, 0, 10]
//! ```
//!
//! Every key is optional. Missing settings take their defaults; missing
//! emitter keys leave the emitter defaults untouched.

use rockfall_kernel::{EffectSettings, EmitterOptions, Rockfall};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

/// Everything needed to build one effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub settings: EffectSettings,
    pub emitter: EmitterOptions,
}

impl EffectConfig {
    /// Load from a file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let parse: fn(&str) -> Result<Self, ConfigError> = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        let config = parse(&std::fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), "loaded effect config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Construct the effect this config describes.
    pub fn build(&self) -> Rockfall {
        Rockfall::new(self.settings.clone(), &self.emitter)
    }
}
