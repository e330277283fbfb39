//! Configuration for value-based goal prioritizing.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use value_mapping::CalibrationConfig;

/// Complete configuration: calibration tables plus engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VbgpConfig {
    /// Per-goal gain/loss tables
    #[serde(default)]
    pub calibration: CalibrationConfig,
    /// Engine settings
    #[serde(default)]
    pub prioritizing: PrioritizingConfig,
}

impl VbgpConfig {
    /// Create a config from calibration tables with default engine settings.
    pub fn new(calibration: CalibrationConfig) -> Self {
        Self {
            calibration,
            ..Default::default()
        }
    }

    /// Load config from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizingConfig {
    /// What to do when adjusted importances sum to zero
    #[serde(default)]
    pub zero_sum_policy: ZeroSumPolicy,
}

impl Default for PrioritizingConfig {
    fn default() -> Self {
        Self {
            zero_sum_policy: ZeroSumPolicy::LeaveUnnormalized,
        }
    }
}

impl PrioritizingConfig {
    /// Load config from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Handling of a zero renormalization total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ZeroSumPolicy {
    /// Skip the division and keep the adjusted values as they are
    #[default]
    LeaveUnnormalized,
    /// Fail the cycle with `ZeroTotalImportance`
    Fail,
}
