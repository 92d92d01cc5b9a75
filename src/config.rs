// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Solver configuration, loadable from TOML.
//!
//! ```
//! use parking_solver::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str("max_expansions = 50000").unwrap();
//! assert_eq!(Some(50_000), config.max_expansions);
//! assert_eq!(1, config.initial_capacity);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// An error raised while loading a [`SolverConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("configuration could not be loaded: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for a [`SolverConfig`].
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tuning knobs for a [`Solver`](crate::Solver).
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Give up after expanding this many boards without reaching the goal.
    pub max_expansions: Option<usize>,

    /// Room reserved in the frontier before it first has to grow.
    pub initial_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_expansions: None,
            initial_capacity: 1,
        }
    }
}

impl SolverConfig {
    /// Parses a configuration from TOML. Missing keys take their default values.
    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        toml::from_str(data).map_err(Into::into)
    }

    /// Loads a configuration from the TOML file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    /// Sets the expansion cap.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}
