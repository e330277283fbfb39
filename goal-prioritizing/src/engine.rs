//! Value-based goal prioritizing engine.
//!
//! Once per agent per decision cycle, rescales the importance of goals the
//! agent is not confident about by how far each goal has moved from its
//! reference, then renormalizes all importances to sum to one.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use value_mapping::MappingRegistry;

use crate::adjustment::adjustment_factor;
use crate::config::{PrioritizingConfig, VbgpConfig, ZeroSumPolicy};
use crate::types::{
    Agent, Goal, GoalStates, PrioritizationOutcome, PrioritizingError, Result,
};

/// Adjusts goal importance from gain/loss calibration curves.
///
/// Holds only immutable state; one engine may serve any number of agents
/// concurrently as long as each call gets its own goal collection.
#[derive(Debug, Clone)]
pub struct ValueBasedGoalPrioritizing {
    /// Engine settings
    config: PrioritizingConfig,
    /// Calibration for every goal the engine may see
    registry: Arc<MappingRegistry>,
}

impl ValueBasedGoalPrioritizing {
    /// Create an engine with default settings.
    pub fn new(registry: Arc<MappingRegistry>) -> Self {
        Self::with_config(registry, PrioritizingConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(registry: Arc<MappingRegistry>, config: PrioritizingConfig) -> Self {
        info!(
            goal_count = registry.len(),
            fingerprint = %registry.fingerprint(),
            zero_sum_policy = ?config.zero_sum_policy,
            "Value-based goal prioritizing initialized"
        );
        Self { config, registry }
    }

    /// Build the registry and the engine from one configuration.
    pub fn from_config(config: &VbgpConfig) -> Result<Self> {
        let registry = config.calibration.build_registry()?;
        Ok(Self::with_config(
            Arc::new(registry),
            config.prioritizing.clone(),
        ))
    }

    /// The calibration registry.
    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    /// Engine settings.
    pub fn config(&self) -> &PrioritizingConfig {
        &self.config
    }

    /// Compute adjusted importances without touching `goals`.
    pub fn evaluate<A>(&self, agent: &A, goals: &GoalStates) -> Result<PrioritizationOutcome>
    where
        A: Agent + ?Sized,
    {
        let mut outcome = PrioritizationOutcome {
            adjusted_importance: goals
                .iter()
                .map(|(goal, state)| (goal.clone(), state.importance))
                .collect(),
            adjustments: IndexMap::new(),
            renormalized: false,
            calibration_fingerprint: self.registry.fingerprint().to_string(),
        };

        if goals.is_empty() || !agent.uses_importance_adjusting() {
            return Ok(outcome);
        }

        for (goal, state) in goals.iter().filter(|(_, s)| s.is_low_confidence()) {
            let mapping = self
                .registry
                .get(&goal.name)
                .ok_or_else(|| PrioritizingError::UnknownGoal(goal.name.clone()))?;

            let adjustment = adjustment_factor(goal.goal_type, state, mapping);
            debug!(
                agent_id = %agent.id(),
                goal = %goal.name,
                goal_type = %goal.goal_type,
                side = ?adjustment.side,
                argument = adjustment.argument,
                factor = adjustment.factor,
                "Goal importance adjusted"
            );

            outcome
                .adjusted_importance
                .insert(goal.clone(), state.importance * adjustment.factor);
            outcome.adjustments.insert(goal.clone(), adjustment);
        }

        if outcome.adjustments.is_empty() {
            return Ok(outcome);
        }

        let total: f64 = outcome.adjusted_importance.values().sum();
        if total == 0.0 {
            match self.config.zero_sum_policy {
                ZeroSumPolicy::Fail => {
                    return Err(PrioritizingError::ZeroTotalImportance {
                        goal_count: goals.len(),
                    });
                }
                ZeroSumPolicy::LeaveUnnormalized => {
                    warn!(
                        agent_id = %agent.id(),
                        goal_count = goals.len(),
                        "Adjusted importance sums to zero; leaving unnormalized"
                    );
                    return Ok(outcome);
                }
            }
        }

        for value in outcome.adjusted_importance.values_mut() {
            *value /= total;
        }
        outcome.renormalized = true;

        debug!(
            agent_id = %agent.id(),
            adjusted = outcome.adjustments.len(),
            total,
            "Goal importances renormalized"
        );

        Ok(outcome)
    }

    /// Write adjusted importances into `goals`.
    ///
    /// Setting `adjusted_importance` is the only change made to the goal
    /// states, and happens only if the whole cycle succeeds.
    pub fn prioritize<A>(&self, agent: &A, goals: &mut GoalStates) -> Result<PrioritizationOutcome>
    where
        A: Agent + ?Sized,
    {
        let outcome = self.evaluate(agent, goals)?;
        for (goal, state) in goals.iter_mut() {
            if let Some(adjusted) = outcome.adjusted_importance.get(goal) {
                state.adjusted_importance = *adjusted;
            }
        }
        Ok(outcome)
    }

    /// Whether every goal in `goals` has a calibration.
    pub fn covers<'a>(&self, goals: impl IntoIterator<Item = &'a Goal>) -> bool {
        goals.into_iter().all(|g| self.registry.contains(&g.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentProfile, GoalState, GoalType};
    use value_mapping::MappingPoint;

    fn table() -> Vec<MappingPoint> {
        vec![
            MappingPoint::new(-50.0, 60.0),
            MappingPoint::new(-20.0, 30.0),
            MappingPoint::new(-5.0, 10.0),
            MappingPoint::new(0.0, 0.0),
            MappingPoint::new(20.0, 15.0),
        ]
    }

    fn engine() -> ValueBasedGoalPrioritizing {
        let registry = MappingRegistry::from_goals([
            ("income", table()),
            ("leisure", table()),
            ("water", table()),
        ])
        .unwrap();
        ValueBasedGoalPrioritizing::new(Arc::new(registry))
    }

    /// Any loss wipes the goal's importance out.
    fn zeroing_registry() -> MappingRegistry {
        MappingRegistry::from_goals([(
            "income",
            vec![MappingPoint::new(-10.0, 100.0), MappingPoint::new(10.0, 0.0)],
        )])
        .unwrap()
    }

    fn adjusting() -> AgentProfile {
        AgentProfile::new("agent-1", true)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_goals() {
        let mut goals = GoalStates::new();
        let outcome = engine().prioritize(&adjusting(), &mut goals).unwrap();
        assert!(outcome.adjusted_importance.is_empty());
        assert!(!outcome.renormalized);
    }

    #[test]
    fn test_capability_off_keeps_baseline() {
        let mut goals = GoalStates::new();
        goals.insert(
            Goal::new("income", GoalType::Maximize),
            GoalState::new(0.6).with_prior_value(100.0).with_value(50.0),
        );
        goals.insert(
            Goal::new("leisure", GoalType::Maximize),
            GoalState::new(0.9).with_prior_value(100.0).with_value(50.0),
        );

        let agent = AgentProfile::new("agent-2", false);
        let outcome = engine().prioritize(&agent, &mut goals).unwrap();

        assert!(!outcome.renormalized);
        assert!(outcome.adjustments.is_empty());
        for state in goals.values() {
            assert_eq!(state.adjusted_importance, state.importance);
        }
    }

    #[test]
    fn test_all_confident_keeps_baseline() {
        let mut goals = GoalStates::new();
        goals.insert(
            Goal::new("income", GoalType::Maximize),
            GoalState::new(0.6)
                .with_prior_value(100.0)
                .with_value(50.0)
                .with_confidence(true),
        );
        goals.insert(Goal::new("leisure", GoalType::Minimize), GoalState::new(0.0));

        let outcome = engine().prioritize(&adjusting(), &mut goals).unwrap();

        assert!(!outcome.renormalized);
        assert_eq!(outcome.importance_of("income"), Some(0.6));
        assert_eq!(outcome.importance_of("leisure"), Some(0.0));
    }

    #[test]
    fn test_adjust_and_renormalize() {
        let mut goals = GoalStates::new();
        goals.insert(
            Goal::new("income", GoalType::Maximize),
            GoalState::new(0.5).with_prior_value(100.0).with_value(80.0),
        );
        goals.insert(
            Goal::new("leisure", GoalType::Maximize),
            GoalState::new(0.5)
                .with_prior_value(100.0)
                .with_value(80.0)
                .with_confidence(true),
        );

        let outcome = engine().prioritize(&adjusting(), &mut goals).unwrap();

        // income: 0.5 * 0.7 = 0.35; leisure stays 0.5; total 0.85
        assert!(outcome.renormalized);
        assert_eq!(outcome.adjustments.len(), 1);
        assert_close(goals[0].adjusted_importance, 0.35 / 0.85);
        assert_close(goals[1].adjusted_importance, 0.5 / 0.85);
        assert_close(goals.values().map(|s| s.adjusted_importance).sum(), 1.0);
    }

    #[test]
    fn test_non_positive_importance_counts_in_total() {
        let mut goals = GoalStates::new();
        goals.insert(
            Goal::new("income", GoalType::Maximize),
            GoalState::new(0.5).with_prior_value(100.0).with_value(80.0),
        );
        goals.insert(
            Goal::new("leisure", GoalType::Maximize),
            GoalState::new(-0.25).with_prior_value(100.0).with_value(50.0),
        );
        goals.insert(
            Goal::new("water", GoalType::Maximize),
            GoalState::new(0.4)
                .with_prior_value(100.0)
                .with_value(50.0)
                .with_confidence(true),
        );

        let outcome = engine().prioritize(&adjusting(), &mut goals).unwrap();

        // income: 0.5 * 0.7 = 0.35; leisure keeps -0.25; water keeps 0.4; total 0.5
        assert!(outcome.renormalized);
        assert_eq!(outcome.adjustments.len(), 1);
        assert!(!outcome
            .adjustments
            .contains_key(&Goal::new("leisure", GoalType::Maximize)));
        assert_close(goals[0].adjusted_importance, 0.7);
        assert_close(goals[1].adjusted_importance, -0.5);
        assert_close(goals[2].adjusted_importance, 0.8);
    }

    #[test]
    fn test_nan_measurement_is_neutral_in_cycle() {
        let registry = MappingRegistry::from_goals([(
            "water",
            vec![MappingPoint::new(-10.0, 20.0), MappingPoint::new(10.0, 5.0)],
        )])
        .unwrap();
        let engine = ValueBasedGoalPrioritizing::new(Arc::new(registry));

        let water = Goal::new("water", GoalType::MaintainAtValue);
        let mut goals = GoalStates::new();
        goals.insert(
            water.clone(),
            GoalState::new(1.0).with_focal_value(50.0).with_value(f64::NAN),
        );

        let outcome = engine.prioritize(&adjusting(), &mut goals).unwrap();

        assert_eq!(outcome.adjustments[&water].factor, 1.0);
        assert!(outcome.renormalized);
        assert_eq!(goals[0].adjusted_importance, 1.0);
    }

    #[test]
    fn test_unknown_goal_leaves_state_untouched() {
        let mut goals = GoalStates::new();
        goals.insert(Goal::new("income", GoalType::Maximize), GoalState::new(0.5));
        goals.insert(
            Goal::new("shelter", GoalType::Maximize),
            GoalState::new(0.5).with_prior_value(10.0).with_value(5.0),
        );

        let err = engine().prioritize(&adjusting(), &mut goals).unwrap_err();
        assert_eq!(err, PrioritizingError::UnknownGoal("shelter".to_string()));
        assert!(goals.values().all(|s| s.adjusted_importance == 0.0));
    }

    #[test]
    fn test_zero_total_left_unnormalized() {
        let registry = zeroing_registry();
        let engine = ValueBasedGoalPrioritizing::new(Arc::new(registry));

        let mut goals = GoalStates::new();
        goals.insert(
            Goal::new("income", GoalType::Maximize),
            GoalState::new(1.0).with_prior_value(100.0).with_value(90.0),
        );

        let outcome = engine.prioritize(&adjusting(), &mut goals).unwrap();
        assert!(!outcome.renormalized);
        assert_eq!(goals[0].adjusted_importance, 0.0);
    }

    #[test]
    fn test_zero_total_fails_under_policy() {
        let registry = zeroing_registry();
        let engine = ValueBasedGoalPrioritizing::with_config(
            Arc::new(registry),
            PrioritizingConfig {
                zero_sum_policy: ZeroSumPolicy::Fail,
            },
        );

        let mut goals = GoalStates::new();
        goals.insert(
            Goal::new("income", GoalType::Maximize),
            GoalState::new(1.0).with_prior_value(100.0).with_value(90.0),
        );

        let err = engine.prioritize(&adjusting(), &mut goals).unwrap_err();
        assert_eq!(err, PrioritizingError::ZeroTotalImportance { goal_count: 1 });
    }

    #[test]
    fn test_covers() {
        let engine = engine();
        let known = [Goal::new("income", GoalType::Maximize)];
        let unknown = [Goal::new("shelter", GoalType::Minimize)];
        assert!(engine.covers(&known));
        assert!(!engine.covers(&unknown));
    }
}
