//! Serializable calibration configuration.
//!
//! Describes the shape a tabular-source reader hands over: one raw element
//! list per goal. Parsing works on in-memory text only.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::registry::{CalibrationSource, MappingRegistry};
use crate::types::{MappingPoint, RegistryError};

/// Calibration tables for every goal, in percentage units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Goal name to raw `(argument, value)` elements
    #[serde(default)]
    pub goals: Option<CalibrationSource>,
}

impl CalibrationConfig {
    /// Create a config holding the given goals.
    pub fn new(goals: CalibrationSource) -> Self {
        Self { goals: Some(goals) }
    }

    /// Add (or replace) one goal's table.
    pub fn with_goal(mut self, goal: impl Into<String>, elements: Vec<MappingPoint>) -> Self {
        self.goals
            .get_or_insert_with(IndexMap::new)
            .insert(goal.into(), Some(elements));
        self
    }

    /// Load config from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Validate and build the registry.
    pub fn build_registry(&self) -> Result<MappingRegistry, RegistryError> {
        MappingRegistry::build(self.goals.as_ref())
    }
}
