//! Per-goal gain/loss mapping tables.
//!
//! A raw table is an unordered list of `(argument, value)` pairs in percentage
//! units. Construction validates it, splits it at zero into a loss curve
//! (negative arguments) and a gain curve (non-negative arguments), and
//! normalizes both to `[-1.0, 1.0]`.

use serde::Serialize;

use crate::curve::{check_duplicates, sort_by_argument, Curve};
use crate::types::{
    CurveSide, MappingError, MappingPoint, MAX_RAW_ARGUMENT, MIN_RAW_ARGUMENT, PERCENT_SCALE,
};

/// Validated, normalized calibration for a single goal. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalMapping {
    /// Goal this mapping calibrates
    name: String,
    /// Points with raw argument < 0, normalized
    loss_curve: Curve,
    /// Points with raw argument >= 0, normalized
    gain_curve: Curve,
}

impl GoalMapping {
    /// Build a mapping from a goal name and its raw table.
    pub fn new(name: impl Into<String>, elements: &[MappingPoint]) -> Result<Self, MappingError> {
        let name = name.into();
        Self::build(Some(&name), Some(elements))
    }

    /// Build a mapping from possibly-absent inputs.
    ///
    /// Checks run in a fixed order: name, presence, emptiness, argument range,
    /// duplicate arguments, then presence of both sides. A blank name counts
    /// as missing; any other name is kept exactly as given.
    pub fn build(
        name: Option<&str>,
        elements: Option<&[MappingPoint]>,
    ) -> Result<Self, MappingError> {
        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(MappingError::MissingName),
        };
        let elements = elements.ok_or(MappingError::MissingMapping)?;
        if elements.is_empty() {
            return Err(MappingError::EmptyMapping);
        }

        if let Some((index, point)) = elements
            .iter()
            .enumerate()
            .find(|(_, p)| !(MIN_RAW_ARGUMENT..=MAX_RAW_ARGUMENT).contains(&p.argument))
        {
            return Err(MappingError::ArgumentOutOfRange {
                index,
                argument: point.argument,
            });
        }
        check_duplicates(elements)?;

        let mut sorted = elements.to_vec();
        sort_by_argument(&mut sorted);

        let split = sorted
            .iter()
            .position(|p| p.argument >= 0.0)
            .unwrap_or(sorted.len());
        if split == 0 {
            return Err(MappingError::MissingLossSide);
        }
        if split == sorted.len() {
            return Err(MappingError::MissingGainSide);
        }

        let gain = sorted.split_off(split);
        let loss = sorted;

        Ok(Self {
            name: name.to_string(),
            loss_curve: Curve::from_sorted(loss).scaled(PERCENT_SCALE),
            gain_curve: Curve::from_sorted(gain).scaled(PERCENT_SCALE),
        })
    }

    /// Goal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loss-side curve, arguments in `[-1.0, 0)`.
    pub fn loss_curve(&self) -> &Curve {
        &self.loss_curve
    }

    /// Gain-side curve, arguments in `[0, 1.0]`.
    pub fn gain_curve(&self) -> &Curve {
        &self.gain_curve
    }

    /// Curve for one side.
    pub fn curve(&self, side: CurveSide) -> &Curve {
        match side {
            CurveSide::Loss => &self.loss_curve,
            CurveSide::Gain => &self.gain_curve,
        }
    }
}
