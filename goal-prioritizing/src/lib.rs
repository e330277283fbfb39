//! Goal Prioritizing - Value-Based Importance Adjustment
//!
//! Adjusts the relative importance an agent assigns to competing goals from
//! how far each goal's measured outcome has moved from its reference value,
//! using prospect-theory style loss and gain curves:
//!
//! - **Adjustment**: one formula per goal type, loss or gain curve
//! - **Engine**: per-agent, per-cycle rescaling and renormalization
//! - **Configuration**: calibration tables and engine settings from YAML
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               ValueBasedGoalPrioritizing                    │
//! │                                                             │
//! │  ┌──────────┐   ┌──────────────┐   ┌─────────────────┐     │
//! │  │ Baseline │──▶│ Adjustment   │──▶│ Renormalization │     │
//! │  └──────────┘   └──────┬───────┘   └─────────────────┘     │
//! │                        │                                    │
//! │                ┌───────▼────────┐                           │
//! │                │ MappingRegistry│                           │
//! │                └────────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use goal_prioritizing::{
//!     AgentProfile, Goal, GoalState, GoalStates, GoalType, ValueBasedGoalPrioritizing,
//! };
//! use value_mapping::{MappingPoint, MappingRegistry};
//!
//! let registry = MappingRegistry::from_goals([(
//!     "income",
//!     vec![MappingPoint::new(-20.0, 30.0), MappingPoint::new(10.0, 5.0)],
//! )])
//! .unwrap();
//! let engine = ValueBasedGoalPrioritizing::new(Arc::new(registry));
//!
//! let mut goals = GoalStates::new();
//! goals.insert(
//!     Goal::new("income", GoalType::Maximize),
//!     GoalState::new(1.0).with_prior_value(100.0).with_value(80.0),
//! );
//!
//! let agent = AgentProfile::new("household-7", true);
//! let outcome = engine.prioritize(&agent, &mut goals).unwrap();
//! assert!(outcome.renormalized);
//! assert_eq!(goals[0].adjusted_importance, 1.0);
//! ```

pub mod adjustment;
pub mod config;
pub mod engine;
pub mod types;

// Re-export main types
pub use adjustment::adjustment_factor;
pub use config::{PrioritizingConfig, VbgpConfig, ZeroSumPolicy};
pub use engine::ValueBasedGoalPrioritizing;
pub use types::*;
