//! Audit configuration.

use lopf_core::{LopfError, LopfResult};
use serde::{Deserialize, Serialize};

/// Default normalising constant applied to the reactance-weighted loop sums.
pub const DEFAULT_CYCLE_SCALE: f64 = 1e5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Largest accepted deviation (absolute, in the unit of each check)
    pub tolerance: f64,
    /// Multiplier applied to per-unit impedances in the loop-flow check
    pub cycle_scale: f64,
    /// Evaluate the checks concurrently (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            cycle_scale: DEFAULT_CYCLE_SCALE,
            parallel: true,
        }
    }
}

impl CheckConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Parse and validate a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> LopfResult<Self> {
        let config: CheckConfig =
            serde_json::from_str(json).map_err(|e| LopfError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LopfResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(LopfError::Config(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        if !self.cycle_scale.is_finite() || self.cycle_scale <= 0.0 {
            return Err(LopfError::Config(format!(
                "cycle_scale must be positive, got {}",
                self.cycle_scale
            )));
        }
        Ok(())
    }
}
