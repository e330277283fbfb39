//! Sorted calibration curves and nearest-argument lookup.
//!
//! Arguments are compared with an absolute tolerance rather than exact
//! equality so that rounding from the percentage normalization never changes
//! which break point is selected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{MappingError, MappingPoint};

/// Tolerance under which two curve arguments are treated as equal.
///
/// Far below any realistic calibration granularity.
pub const ARGUMENT_EPSILON: f64 = 1e-17;

/// A non-empty sequence of break points, strictly ascending by argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MappingPoint>", into = "Vec<MappingPoint>")]
pub struct Curve {
    points: Vec<MappingPoint>,
}

impl Curve {
    /// Build a curve from unordered points.
    ///
    /// Rejects an empty list and repeated arguments; indices in errors refer
    /// to positions in `points` as given.
    pub fn from_points(points: Vec<MappingPoint>) -> Result<Self, MappingError> {
        if points.is_empty() {
            return Err(MappingError::EmptyMapping);
        }
        check_duplicates(&points)?;

        let mut points = points;
        sort_by_argument(&mut points);
        Ok(Self { points })
    }

    /// Wrap points that are already validated and sorted.
    pub(crate) fn from_sorted(points: Vec<MappingPoint>) -> Self {
        debug_assert!(!points.is_empty());
        debug_assert!(points.windows(2).all(|w| w[0].argument < w[1].argument));
        Self { points }
    }

    /// Break points in ascending argument order.
    pub fn points(&self) -> &[MappingPoint] {
        &self.points
    }

    /// Number of break points (always at least one).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; curves are never empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point with the smallest argument.
    pub fn first(&self) -> MappingPoint {
        self.points[0]
    }

    /// Point with the largest argument.
    pub fn last(&self) -> MappingPoint {
        self.points[self.points.len() - 1]
    }

    /// Index of the break point whose argument is closest to `argument`.
    ///
    /// Queries at or beyond either end clamp to that end. When the query is
    /// equidistant (within [`ARGUMENT_EPSILON`]) from two neighbours, the
    /// lower one wins if its argument is negative, otherwise the upper one.
    /// A NaN query has no nearest point and resolves to the last one.
    pub fn nearest_index(&self, argument: f64) -> usize {
        let points = &self.points;
        let last = points.len() - 1;

        if argument.is_nan() {
            return last;
        }
        if argument - points[0].argument <= ARGUMENT_EPSILON {
            return 0;
        }
        if points[last].argument - argument <= ARGUMENT_EPSILON {
            return last;
        }

        let mut left = 0;
        let mut right = last;
        while left < right {
            if (argument - points[left].argument).abs() <= ARGUMENT_EPSILON {
                return left;
            }

            let mid = left + (right - left) / 2;
            if argument - points[mid].argument < -ARGUMENT_EPSILON {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        // The lower-bound check above guarantees the search moved past index 0.
        let upper = left.max(1);
        let lower = upper - 1;
        let to_lower = (argument - points[lower].argument).abs();
        let to_upper = (points[upper].argument - argument).abs();

        if (to_lower - to_upper).abs() > ARGUMENT_EPSILON {
            if to_lower < to_upper {
                lower
            } else {
                upper
            }
        } else if points[lower].argument < 0.0 {
            lower
        } else {
            upper
        }
    }

    /// Value of the break point nearest to `argument`.
    pub fn value_at(&self, argument: f64) -> f64 {
        self.points[self.nearest_index(argument)].value
    }

    /// Divide every argument and value by `divisor`.
    pub(crate) fn scaled(self, divisor: f64) -> Self {
        Self {
            points: self
                .points
                .into_iter()
                .map(|p| p.scaled(divisor))
                .collect(),
        }
    }
}

impl TryFrom<Vec<MappingPoint>> for Curve {
    type Error = MappingError;

    fn try_from(points: Vec<MappingPoint>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<Curve> for Vec<MappingPoint> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

/// Sort ascending by argument.
pub(crate) fn sort_by_argument(points: &mut [MappingPoint]) {
    points.sort_by(|a, b| a.argument.total_cmp(&b.argument));
}

/// Fail on the first argument that repeats an earlier one.
pub(crate) fn check_duplicates(points: &[MappingPoint]) -> Result<(), MappingError> {
    let mut seen: HashMap<u64, usize> = HashMap::with_capacity(points.len());

    for (index, point) in points.iter().enumerate() {
        // -0.0 and 0.0 are the same argument
        let key = if point.argument == 0.0 {
            0.0f64.to_bits()
        } else {
            point.argument.to_bits()
        };

        if let Some(&first_index) = seen.get(&key) {
            return Err(MappingError::DuplicateArgument {
                argument: point.argument,
                index,
                first_index,
            });
        }
        seen.insert(key, index);
    }

    Ok(())
}
