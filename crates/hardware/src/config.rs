//! Configuration system for the tandem simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline values (step bound, lane count).
//! 2. **Structures:** Hierarchical config for general settings and the compute unit.
//! 3. **Loading:** JSON parsing from a string or file, followed by validation.
//!
//! Every field is optional in JSON; omitted fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::constants::{DEFAULT_LANES, DEFAULT_MAX_STEPS};

    /// Upper bound on instructions executed by one `Simulator::run` call.
    ///
    /// Stops programs that never reach `HLT`.
    pub const MAX_STEPS: u64 = DEFAULT_MAX_STEPS;

    /// Number of parallel compute lanes.
    pub const LANES: usize = DEFAULT_LANES;

    /// A compute unit is attached unless disabled.
    pub const COMPUTE_ENABLED: bool = true;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use tandem_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "compute": { "lanes": 4 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.general.max_steps, 100_000);
/// assert_eq!(config.compute.lanes, 4);
/// assert!(config.compute.enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Compute unit settings
    #[serde(default)]
    pub compute: ComputeConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Arguments
    ///
    /// * `json` - Configuration text.
    ///
    /// # Returns
    ///
    /// The configuration, or `ConfigError::Parse` / `ConfigError::Invalid`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compute.lanes == 0 {
            return Err(ConfigError::Invalid {
                field: "compute.lanes",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.general.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "general.max_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Log every committed instruction at `info` level
    #[serde(default)]
    pub trace_instructions: bool,

    /// Instruction bound for `Simulator::run`
    #[serde(default = "GeneralConfig::default_max_steps")]
    pub max_steps: u64,
}

impl GeneralConfig {
    /// Returns the default instruction bound.
    const fn default_max_steps() -> u64 {
        defaults::MAX_STEPS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            max_steps: defaults::MAX_STEPS,
        }
    }
}

/// Compute unit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComputeConfig {
    /// Attach a compute unit to the CPU
    #[serde(default = "ComputeConfig::default_enabled")]
    pub enabled: bool,

    /// Number of parallel lanes (at least 1)
    #[serde(default = "ComputeConfig::default_lanes")]
    pub lanes: usize,
}

impl ComputeConfig {
    const fn default_enabled() -> bool {
        defaults::COMPUTE_ENABLED
    }

    const fn default_lanes() -> usize {
        defaults::LANES
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::COMPUTE_ENABLED,
            lanes: defaults::LANES,
        }
    }
}
