//! Value Mapping - Gain/Loss Calibration Curves
//!
//! Owns the calibration tables used by value-based goal prioritizing:
//!
//! - **Curves**: sorted break points queried by nearest-argument lookup
//! - **Goal mappings**: one validated loss curve + gain curve per goal
//! - **Registry**: every goal's mapping, keyed by goal name
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            MappingRegistry              │
//! │   (goal name -> GoalMapping, immutable) │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ Loss Curve  │       │ Gain Curve  │
//! │ [-1.0, 0)   │       │ [0, 1.0]    │
//! └─────────────┘       └─────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use value_mapping::{MappingPoint, MappingRegistry};
//!
//! let registry = MappingRegistry::from_goals([(
//!     "income",
//!     vec![MappingPoint::new(-20.0, 30.0), MappingPoint::new(10.0, 5.0)],
//! )])
//! .unwrap();
//!
//! let mapping = registry.get("income").unwrap();
//! assert_eq!(mapping.loss_curve().value_at(-0.2), 0.3);
//! ```

pub mod config;
pub mod curve;
pub mod mapping;
pub mod registry;
pub mod types;

// Re-export main types
pub use config::CalibrationConfig;
pub use curve::{Curve, ARGUMENT_EPSILON};
pub use mapping::GoalMapping;
pub use registry::{CalibrationSource, MappingRegistry};
pub use types::*;
