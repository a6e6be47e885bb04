// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. qemo.yaml file
//! 3. Environment variables (QEMO_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::entanglement::MetricsConfig;
use crate::error::{Error, Result};
use crate::optimize::{HybridConfig, QngConfig, SpsaConfig};
use crate::schedule::{CouplingMode, EvolutionConfig};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Entanglement metric settings
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Standalone SPSA settings
    #[serde(default)]
    pub spsa: SpsaConfig,

    /// Standalone natural-gradient settings
    #[serde(default)]
    pub qng: QngConfig,

    /// Hybrid optimizer settings
    #[serde(default)]
    pub hybrid: HybridConfig,

    /// Hamiltonian schedule settings
    #[serde(default)]
    pub schedule: EvolutionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// An explicit path that does not exist yields the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        } else {
            for path in &["qemo.yaml", "qemo.yml", "/etc/qemo/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    config = Self::from_file(path)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("QEMO_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QEMO_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("QEMO_SPSA_SEED") {
            if let Ok(seed) = val.parse() {
                self.spsa.seed = Some(seed);
                self.hybrid.spsa.seed = Some(seed);
            }
        }
        if let Ok(val) = env::var("QEMO_NUM_SUBSYSTEMS") {
            if let Ok(n) = val.parse() {
                self.schedule.num_subsystems = n;
            }
        }
        if let Ok(val) = env::var("QEMO_COUPLING_MODE") {
            match val.parse::<CouplingMode>() {
                Ok(mode) => self.schedule.coupling_mode = mode,
                Err(e) => tracing::warn!(error = %e, "Ignoring QEMO_COUPLING_MODE"),
            }
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.metrics.validate().map_err(Error::Config)?;
        self.spsa.validate().map_err(Error::Config)?;
        self.qng.validate().map_err(Error::Config)?;
        self.hybrid.validate().map_err(Error::Config)?;
        self.schedule.validate().map_err(Error::Config)?;
        self.logging.validate().map_err(Error::Config)?;

        if self.schedule.num_subsystems > self.metrics.max_subsystems {
            return Err(Error::Config(format!(
                "schedule.num_subsystems ({}) exceeds metrics.max_subsystems ({})",
                self.schedule.num_subsystems, self.metrics.max_subsystems
            )));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(format!("logging.level '{}' is not a log level", other)),
        }
        match self.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(format!(
                "logging.format '{}' must be 'pretty' or 'json'",
                other
            )),
        }
    }

    /// Whether JSON output is selected.
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
