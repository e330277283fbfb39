//! Core types for calibration tables.
//!
//! With the `typescript` feature enabled, the plain data types can be exported
//! to TypeScript using ts-rs.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Lower bound of a raw (percentage) argument.
pub const MIN_RAW_ARGUMENT: f64 = -100.0;

/// Upper bound of a raw (percentage) argument.
pub const MAX_RAW_ARGUMENT: f64 = 100.0;

/// Divisor mapping the percentage domain onto `[-1.0, 1.0]`.
pub const PERCENT_SCALE: f64 = 100.0;

/// One break point of a calibration curve.
///
/// Raw points are expressed in percentage units (`-100..=100`). Points held by
/// a [`crate::GoalMapping`] are normalized to `[-1.0, 1.0]`. Loss-side values
/// are unsigned magnitudes subtracted from 1.0; gain-side values are added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MappingPoint {
    /// Relative change
    pub argument: f64,
    /// Adjustment magnitude at that change
    pub value: f64,
}

impl MappingPoint {
    /// Create a new point.
    pub fn new(argument: f64, value: f64) -> Self {
        Self { argument, value }
    }

    /// Divide both coordinates by `divisor`.
    pub(crate) fn scaled(self, divisor: f64) -> Self {
        Self {
            argument: self.argument / divisor,
            value: self.value / divisor,
        }
    }
}

impl From<(f64, f64)> for MappingPoint {
    fn from((argument, value): (f64, f64)) -> Self {
        Self::new(argument, value)
    }
}

/// Which half of a goal mapping a lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CurveSide {
    /// Deterioration relative to the reference
    Loss,
    /// Improvement relative to the reference
    Gain,
}

impl CurveSide {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveSide::Loss => "loss",
            CurveSide::Gain => "gain",
        }
    }
}

/// Validation errors for a single goal's calibration table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    /// Goal name absent or blank
    #[error("Goal name is missing")]
    MissingName,

    /// Element list absent
    #[error("Gain/loss mapping is missing")]
    MissingMapping,

    /// Element list present but empty
    #[error("Gain/loss mapping has no elements")]
    EmptyMapping,

    /// Raw argument outside `[-100, 100]` (or not finite)
    #[error("Argument {argument} at element {index} is outside [-100, 100]")]
    ArgumentOutOfRange {
        /// Position in the input list
        index: usize,
        /// Offending raw argument
        argument: f64,
    },

    /// Two elements share one raw argument
    #[error("Argument {argument} at element {index} duplicates element {first_index}")]
    DuplicateArgument {
        /// Duplicated raw argument
        argument: f64,
        /// Position of the duplicate
        index: usize,
        /// Position where the argument first appeared
        first_index: usize,
    },

    /// No negative arguments
    #[error("Mapping has no loss side (no negative arguments)")]
    MissingLossSide,

    /// No non-negative arguments
    #[error("Mapping has no gain side (no non-negative arguments)")]
    MissingGainSide,
}

/// Errors building a [`crate::MappingRegistry`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Calibration source absent
    #[error("Value-based goal prioritizing configuration is missing")]
    MissingConfiguration,

    /// Calibration source has no goals
    #[error("Value-based goal prioritizing configuration defines no goals")]
    NoGoals,

    /// One goal's table failed validation
    #[error("Invalid mapping for goal '{goal}': {source}")]
    InvalidGoal {
        /// Goal whose table failed
        goal: String,
        /// Underlying validation failure
        #[source]
        source: MappingError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_scaling() {
        let point = MappingPoint::new(-25.0, 40.0).scaled(PERCENT_SCALE);
        assert_eq!(point, MappingPoint::new(-0.25, 0.4));
    }

    #[test]
    fn test_registry_error_reports_goal_and_source() {
        let err = RegistryError::InvalidGoal {
            goal: "income".to_string(),
            source: MappingError::DuplicateArgument {
                argument: 10.0,
                index: 3,
                first_index: 1,
            },
        };

        let message = err.to_string();
        assert!(message.contains("income"));
        assert!(message.contains("element 3 duplicates element 1"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
