//! Floor-plan coordinate bounds.

use serde::{Deserialize, Serialize};

use crate::error::{Axis, PositionError};

/// Allowed coordinate ranges for one deployment's floor plan.
///
/// The defaults describe the pilot building; real deployments override them
/// through configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for FloorBounds {
    fn default() -> Self {
        Self {
            min_x: -20.0,
            max_x: 5.0,
            min_y: -5.0,
            max_y: 20.0,
        }
    }
}

impl FloorBounds {
    pub fn validate(&self, x: f64, y: f64) -> Result<(), PositionError> {
        if !(self.min_x..=self.max_x).contains(&x) {
            return Err(PositionError::OutOfBounds {
                axis: Axis::X,
                value: x,
                min: self.min_x,
                max: self.max_x,
            });
        }
        if !(self.min_y..=self.max_y).contains(&y) {
            return Err(PositionError::OutOfBounds {
                axis: Axis::Y,
                value: y,
                min: self.min_y,
                max: self.max_y,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_interior_points() {
        let bounds = FloorBounds::default();
        assert!(bounds.validate(-10.0, 10.0).is_ok());
        // Boundary values are inclusive
        assert!(bounds.validate(-20.0, -5.0).is_ok());
        assert!(bounds.validate(5.0, 20.0).is_ok());
    }

    #[test]
    fn x_violation_names_the_axis_and_range() {
        let err = FloorBounds::default().validate(6.0, 0.0).unwrap_err();
        match err {
            PositionError::OutOfBounds {
                axis, value, min, max,
            } => {
                assert_eq!(axis, Axis::X);
                assert_eq!(value, 6.0);
                assert_eq!((min, max), (-20.0, 5.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn y_checked_after_x() {
        let err = FloorBounds::default().validate(0.0, 25.0).unwrap_err();
        assert!(matches!(
            err,
            PositionError::OutOfBounds { axis: Axis::Y, .. }
        ));
    }

    #[test]
    fn custom_bounds_are_respected() {
        let bounds = FloorBounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 50.0,
        };
        assert!(bounds.validate(60.0, 40.0).is_ok());
        assert!(bounds.validate(-1.0, 0.0).is_err());
    }
}
