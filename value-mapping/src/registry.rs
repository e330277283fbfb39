//! Registry of goal mappings, keyed by goal name.
//!
//! Built once when the simulation configuration is loaded and read-only
//! afterwards, so a single registry can be shared across agents and threads.

use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::mapping::GoalMapping;
use crate::types::{MappingPoint, RegistryError};

/// Raw calibration input: goal name to (possibly absent) element list.
pub type CalibrationSource = IndexMap<String, Option<Vec<MappingPoint>>>;

/// All goal mappings for a configuration. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingRegistry {
    mappings: IndexMap<String, GoalMapping>,
    fingerprint: String,
}

impl MappingRegistry {
    /// Build the registry from a raw calibration source.
    ///
    /// Fails on the first goal whose table is invalid, naming that goal.
    pub fn build(source: Option<&CalibrationSource>) -> Result<Self, RegistryError> {
        let source = source.ok_or(RegistryError::MissingConfiguration)?;
        if source.is_empty() {
            return Err(RegistryError::NoGoals);
        }

        let mut mappings = IndexMap::with_capacity(source.len());
        for (goal, elements) in source {
            let mapping = GoalMapping::build(Some(goal.as_str()), elements.as_deref())
                .map_err(|source| RegistryError::InvalidGoal {
                    goal: goal.clone(),
                    source,
                })?;
            mappings.insert(goal.clone(), mapping);
        }

        let fingerprint = Self::compute_fingerprint(&mappings);

        tracing::info!(
            goal_count = mappings.len(),
            fingerprint = %fingerprint,
            "Built goal mapping registry"
        );

        Ok(Self {
            mappings,
            fingerprint,
        })
    }

    /// Build from `(goal name, raw table)` pairs.
    pub fn from_goals<I, S>(goals: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, Vec<MappingPoint>)>,
        S: Into<String>,
    {
        let source: CalibrationSource = goals
            .into_iter()
            .map(|(goal, elements)| (goal.into(), Some(elements)))
            .collect();
        Self::build(Some(&source))
    }

    /// Mapping for a goal.
    pub fn get(&self, goal: &str) -> Option<&GoalMapping> {
        self.mappings.get(goal)
    }

    /// Check if a goal has a mapping.
    pub fn contains(&self, goal: &str) -> bool {
        self.mappings.contains_key(goal)
    }

    /// Number of goals.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Always false; an empty registry cannot be built.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Goal names in configuration order.
    pub fn goal_names(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    /// Iterate over `(goal name, mapping)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GoalMapping)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// SHA-256 of the normalized tables, independent of goal order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn compute_fingerprint(mappings: &IndexMap<String, GoalMapping>) -> String {
        let mut hasher = Sha256::new();

        // Sort goals for deterministic hashing
        let mut goals: Vec<_> = mappings.keys().collect();
        goals.sort();

        for goal in goals {
            if let Some(mapping) = mappings.get(goal) {
                hasher.update(goal.as_bytes());
                hasher.update([0u8]);
                for curve in [mapping.loss_curve(), mapping.gain_curve()] {
                    hasher.update((curve.len() as u64).to_le_bytes());
                    for point in curve.points() {
                        hasher.update(point.argument.to_bits().to_le_bytes());
                        hasher.update(point.value.to_bits().to_le_bytes());
                    }
                }
            }
        }

        hex::encode(hasher.finalize())
    }
}
