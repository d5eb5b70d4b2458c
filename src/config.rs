//! Pipeline configuration.
//!
//! A small serializable configuration for the analysis pipeline, with
//! TOML and JSON round-tripping so deployments can keep their settings in
//! version control.
//!
//! # Example
//!
//! ```ignore
//! use valuation_engine::config::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! config.save_toml("valuation.toml")?;
//!
//! let loaded = PipelineConfig::load_toml("valuation.toml")?;
//! let pipeline = Pipeline::from_config(loaded)?;
//! ```

use crate::selection::DEFAULT_NUM_COMPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Configuration for a valuation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// K: number of comparables to select.
    pub num_comps: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_comps: DEFAULT_NUM_COMPS,
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_comps == 0 {
            return Err(ConfigError::InvalidNumComps);
        }
        Ok(())
    }

    /// Save to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `num_comps` must be at least 1.
    InvalidNumComps,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumComps => write!(f, "num_comps must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}
