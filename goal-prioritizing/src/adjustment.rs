//! Adjustment factors per goal type.
//!
//! | Goal type                | Reference | Relative change   | Curve                         |
//! |--------------------------|-----------|-------------------|-------------------------------|
//! | Maximize                 | prior     | `min(0, v/p - 1)` | loss                          |
//! | EqualToOrAboveFocalValue | focal     | `min(0, v/f - 1)` | loss                          |
//! | Minimize                 | prior     | `max(0, v/p - 1)` | loss                          |
//! | MaintainAtValue          | focal     | `v/f - 1`         | gain if `v/f >= 1`, else loss |
//!
//! A zero reference value, or a ratio that is not finite (NaN or infinite
//! measurements), yields a neutral factor of 1.0.

use value_mapping::GoalMapping;

use crate::types::{Adjustment, GoalState, GoalType};

/// Compute how a goal's importance is scaled for its current state.
pub fn adjustment_factor(
    goal_type: GoalType,
    state: &GoalState,
    mapping: &GoalMapping,
) -> Adjustment {
    match goal_type {
        GoalType::Maximize => match ratio(state.value, state.prior_value) {
            Some(ratio) => loss(mapping, (ratio - 1.0).min(0.0)),
            None => Adjustment::neutral(),
        },
        GoalType::EqualToOrAboveFocalValue => match ratio(state.value, state.focal_value) {
            Some(ratio) => loss(mapping, (ratio - 1.0).min(0.0)),
            None => Adjustment::neutral(),
        },
        GoalType::Minimize => match ratio(state.value, state.prior_value) {
            Some(ratio) => loss(mapping, (ratio - 1.0).max(0.0)),
            None => Adjustment::neutral(),
        },
        GoalType::MaintainAtValue => match ratio(state.value, state.focal_value) {
            Some(ratio) if ratio >= 1.0 => gain(mapping, ratio - 1.0),
            Some(ratio) => loss(mapping, ratio - 1.0),
            None => Adjustment::neutral(),
        },
    }
}

/// `value / reference`, or `None` when the reference is zero or the ratio
/// is not finite.
fn ratio(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        return None;
    }
    Some(value / reference).filter(|r| r.is_finite())
}

fn loss(mapping: &GoalMapping, change: f64) -> Adjustment {
    Adjustment::loss(change, mapping.loss_curve().value_at(change))
}

fn gain(mapping: &GoalMapping, change: f64) -> Adjustment {
    Adjustment::gain(change, mapping.gain_curve().value_at(change))
}
