//! Core types for goal prioritizing.
//!
//! Only the goal fields the prioritizer reads or writes are modeled here; the
//! wider agent/goal data model belongs to the caller.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use value_mapping::{CurveSide, RegistryError};

/// How deviation from a goal's reference is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Higher is better; compared to the prior value
    Maximize,
    /// Lower is better; compared to the prior value
    Minimize,
    /// Stay at the focal value
    MaintainAtValue,
    /// Stay at or above the focal value
    EqualToOrAboveFocalValue,
}

impl GoalType {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Maximize => "maximize",
            GoalType::Minimize => "minimize",
            GoalType::MaintainAtValue => "maintain_at_value",
            GoalType::EqualToOrAboveFocalValue => "equal_to_or_above_focal_value",
        }
    }

    /// All goal types.
    pub fn all() -> [Self; 4] {
        [
            Self::Maximize,
            Self::Minimize,
            Self::MaintainAtValue,
            Self::EqualToOrAboveFocalValue,
        ]
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = PrioritizingError;

    /// Case-insensitive; `_`, `-` and spaces are ignored, so `MaintainAtValue`
    /// and `maintain_at_value` both parse.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "maximize" => Ok(Self::Maximize),
            "minimize" => Ok(Self::Minimize),
            "maintainatvalue" => Ok(Self::MaintainAtValue),
            "equaltoorabovefocalvalue" => Ok(Self::EqualToOrAboveFocalValue),
            _ => Err(PrioritizingError::UnsupportedGoalType(s.to_string())),
        }
    }
}

/// A named objective an agent pursues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Goal {
    /// Name used to look up the goal's calibration
    pub name: String,
    /// Evaluation rule
    pub goal_type: GoalType,
}

impl Goal {
    /// Create a new goal.
    pub fn new(name: impl Into<String>, goal_type: GoalType) -> Self {
        Self {
            name: name.into(),
            goal_type,
        }
    }
}

/// One agent's current state for one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct GoalState {
    /// Current measured value
    pub value: f64,
    /// Goal-specific reference target
    pub focal_value: f64,
    /// Value measured at the previous decision cycle
    pub prior_value: f64,
    /// Base weight
    pub importance: f64,
    /// Whether the agent currently trusts its importance weight
    pub confidence: bool,
    /// Output: renormalized weight after adjustment
    #[serde(default)]
    pub adjusted_importance: f64,
}

impl GoalState {
    /// Create a low-confidence state with the given importance and zeroed values.
    pub fn new(importance: f64) -> Self {
        Self {
            value: 0.0,
            focal_value: 0.0,
            prior_value: 0.0,
            importance,
            confidence: false,
            adjusted_importance: 0.0,
        }
    }

    /// Set the current value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Set the focal value.
    pub fn with_focal_value(mut self, focal_value: f64) -> Self {
        self.focal_value = focal_value;
        self
    }

    /// Set the prior value.
    pub fn with_prior_value(mut self, prior_value: f64) -> Self {
        self.prior_value = prior_value;
        self
    }

    /// Set confidence.
    pub fn with_confidence(mut self, confidence: bool) -> Self {
        self.confidence = confidence;
        self
    }

    /// Whether the goal takes part in importance adjustment.
    pub fn is_low_confidence(&self) -> bool {
        self.importance > 0.0 && !self.confidence
    }
}

/// Goals of one agent for one decision cycle, in a stable order.
pub type GoalStates = IndexMap<Goal, GoalState>;

/// Capabilities the prioritizer reads from an agent.
pub trait Agent {
    /// Agent identifier (used for logging).
    fn id(&self) -> &str;

    /// Whether this agent adjusts goal importance by gains and losses.
    fn uses_importance_adjusting(&self) -> bool;
}

/// Plain agent description, for callers without their own agent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AgentProfile {
    /// Agent ID
    pub id: String,
    /// Importance adjusting capability flag
    pub uses_importance_adjusting: bool,
}

impl AgentProfile {
    /// Create a profile.
    pub fn new(id: impl Into<String>, uses_importance_adjusting: bool) -> Self {
        Self {
            id: id.into(),
            uses_importance_adjusting,
        }
    }
}

impl Agent for AgentProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn uses_importance_adjusting(&self) -> bool {
        self.uses_importance_adjusting
    }
}

/// How one goal's adjustment factor was derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Curve consulted; `None` when the adjustment is neutral
    pub side: Option<CurveSide>,
    /// Relative change the curve was queried with
    pub argument: f64,
    /// Value of the nearest break point
    pub curve_value: f64,
    /// Multiplier applied to the goal's importance
    pub factor: f64,
}

impl Adjustment {
    /// Neutral adjustment used when no relative change can be formed.
    pub fn neutral() -> Self {
        Self {
            side: None,
            argument: 0.0,
            curve_value: 0.0,
            factor: 1.0,
        }
    }

    /// Adjustment read from the loss curve: `1 - value`.
    pub fn loss(argument: f64, curve_value: f64) -> Self {
        Self {
            side: Some(CurveSide::Loss),
            argument,
            curve_value,
            factor: 1.0 - curve_value,
        }
    }

    /// Adjustment read from the gain curve: `1 + value`.
    pub fn gain(argument: f64, curve_value: f64) -> Self {
        Self {
            side: Some(CurveSide::Gain),
            argument,
            curve_value,
            factor: 1.0 + curve_value,
        }
    }
}

/// Result of one prioritization cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PrioritizationOutcome {
    /// Adjusted importance for every goal, in input order
    pub adjusted_importance: IndexMap<Goal, f64>,
    /// Adjustment detail for the low-confidence goals only
    pub adjustments: IndexMap<Goal, Adjustment>,
    /// Whether the values were divided by their total
    pub renormalized: bool,
    /// Fingerprint of the calibration used
    pub calibration_fingerprint: String,
}

impl PrioritizationOutcome {
    /// Adjusted importance of a goal by name.
    pub fn importance_of(&self, goal: &str) -> Option<f64> {
        self.adjusted_importance
            .iter()
            .find(|(g, _)| g.name == goal)
            .map(|(_, v)| *v)
    }
}

/// Error types for goal prioritizing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrioritizingError {
    /// Goal has no calibration in the registry
    #[error("No gain/loss mapping configured for goal '{0}'")]
    UnknownGoal(String),

    /// Goal type text not recognised
    #[error("Unsupported goal type: {0}")]
    UnsupportedGoalType(String),

    /// Adjusted importances summed to zero under the failing policy
    #[error("Adjusted importance of {goal_count} goals sums to zero")]
    ZeroTotalImportance {
        /// Number of goals in the cycle
        goal_count: usize,
    },

    /// Calibration failed to load
    #[error("Calibration error: {0}")]
    Registry(#[from] RegistryError),
}

pub type Result<T> = std::result::Result<T, PrioritizingError>;
