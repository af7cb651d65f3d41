// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration loaded from TOML

use crate::error::ConfigLoadError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use studio_core::{Pacing, SyntheticAdapter};

/// Engine configuration. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Multiplier on registry estimated durations
    pub time_scale: f64,
    /// Progress increments per flat stage
    pub ticks_per_stage: u32,
    /// Simulated scene regeneration time
    #[serde(with = "humantime_serde")]
    pub regeneration_delay: Duration,
    /// Stage ids the synthetic adapter fails
    pub fail_stages: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let pacing = Pacing::default();
        Self {
            time_scale: pacing.time_scale,
            ticks_per_stage: pacing.ticks_per_stage,
            regeneration_delay: pacing.regeneration_delay,
            fail_stages: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigLoadError::Invalid(format!(
                "time_scale must be a non-negative number, got {}",
                self.time_scale
            )));
        }
        if !(1..=100).contains(&self.ticks_per_stage) {
            return Err(ConfigLoadError::Invalid(format!(
                "ticks_per_stage must be between 1 and 100, got {}",
                self.ticks_per_stage
            )));
        }
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            time_scale: self.time_scale,
            ticks_per_stage: self.ticks_per_stage,
            regeneration_delay: self.regeneration_delay,
        }
    }

    pub fn adapter(&self) -> SyntheticAdapter {
        SyntheticAdapter::failing(self.fail_stages.iter().cloned())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
