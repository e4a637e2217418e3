//! Walking-route suggestions toward ranked points of interest.

use serde::{Deserialize, Serialize};

use crate::types::{Point2D, RankedPoint, RouteSuggestion};

/// Route generation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanner {
    /// Indoor walking speed, m/s.
    pub walking_speed_mps: f64,
    /// Axis deltas below this contribute no instruction.
    pub axis_deadband_m: f64,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self {
            walking_speed_mps: 1.0,
            axis_deadband_m: 0.5,
        }
    }
}

impl RoutePlanner {
    /// Build suggestions for the first `max_suggestions` ranked points.
    ///
    /// `ranked` must already be sorted (output of `rank_points`).
    /// `max_suggestions <= 0` yields an empty list, not an error.
    pub fn suggest(
        &self,
        origin: Point2D,
        ranked: &[RankedPoint],
        max_suggestions: i64,
    ) -> Vec<RouteSuggestion> {
        if max_suggestions <= 0 {
            return Vec::new();
        }

        ranked
            .iter()
            .take(max_suggestions as usize)
            .map(|target| self.suggestion_for(origin, target))
            .collect()
    }

    fn suggestion_for(&self, origin: Point2D, target: &RankedPoint) -> RouteSuggestion {
        let directions = self.directions(origin, target.point.pos);
        let estimated_time = self.format_walking_time(target.distance_m);

        let instructions = vec![
            format!("Head toward {}", target.point.name),
            directions.clone(),
            format!("Total distance: {:.2} m", target.distance_m),
            format!("Estimated time: {estimated_time}"),
        ];

        RouteSuggestion {
            destination: target.clone(),
            directions,
            total_distance_m: target.distance_m,
            estimated_time,
            instructions,
        }
    }

    /// Cardinal per-axis directions with a deadband per axis.
    fn directions(&self, from: Point2D, to: Point2D) -> String {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        let mut legs = Vec::with_capacity(2);
        if dx.abs() > self.axis_deadband_m {
            let heading = if dx > 0.0 { "EAST" } else { "WEST" };
            legs.push(format!("Walk {:.1} m {heading}", dx.abs()));
        }
        if dy.abs() > self.axis_deadband_m {
            let heading = if dy > 0.0 { "NORTH" } else { "SOUTH" };
            legs.push(format!("Walk {:.1} m {heading}", dy.abs()));
        }

        if legs.is_empty() {
            "You are already at the destination".to_string()
        } else {
            legs.join(", then ")
        }
    }

    fn format_walking_time(&self, distance_m: f64) -> String {
        let seconds = distance_m / self.walking_speed_mps;
        if seconds < 60.0 {
            format!("{} s", seconds as u64)
        } else {
            let minutes = (seconds / 60.0) as u64;
            let rem = (seconds % 60.0) as u64;
            format!("{minutes} min {rem} s")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PointOfInterest;

    fn ranked(id: u32, name: &str, x: f64, y: f64, distance: f64) -> RankedPoint {
        RankedPoint {
            point: PointOfInterest {
                id,
                name: name.to_string(),
                pos: Point2D::new(x, y),
            },
            distance_m: distance,
        }
    }

    #[test]
    fn zero_max_suggestions_is_empty() {
        let planner = RoutePlanner::default();
        let list = [ranked(1, "Lab", 3.0, 4.0, 5.0)];
        assert!(planner.suggest(Point2D::default(), &list, 0).is_empty());
        assert!(planner.suggest(Point2D::default(), &list, -2).is_empty());
    }

    #[test]
    fn takes_only_the_requested_head() {
        let planner = RoutePlanner::default();
        let list = [
            ranked(1, "A", 1.0, 0.0, 1.0),
            ranked(2, "B", 2.0, 0.0, 2.0),
            ranked(3, "C", 3.0, 0.0, 3.0),
        ];
        let out = planner.suggest(Point2D::default(), &list, 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].destination.point.id, 1);
        assert_eq!(out[1].destination.point.id, 2);
    }

    #[test]
    fn directions_cover_both_axes() {
        let planner = RoutePlanner::default();
        let out = planner.suggest(
            Point2D::default(),
            &[ranked(1, "Cafe", -3.0, 4.0, 5.0)],
            1,
        );
        let d = &out[0].directions;
        assert!(d.contains("3.0 m WEST"), "got {d}");
        assert!(d.contains("4.0 m NORTH"), "got {d}");
        assert!(d.contains(", then "), "got {d}");
    }

    #[test]
    fn deadband_suppresses_a_single_axis() {
        let planner = RoutePlanner::default();
        let out = planner.suggest(
            Point2D::default(),
            &[ranked(1, "Desk", 0.3, -6.0, 6.0)],
            1,
        );
        let d = &out[0].directions;
        assert!(!d.contains("EAST") && !d.contains("WEST"), "got {d}");
        assert!(d.contains("6.0 m SOUTH"), "got {d}");
    }

    #[test]
    fn within_deadband_on_both_axes_reports_arrival() {
        let planner = RoutePlanner::default();
        let out = planner.suggest(
            Point2D::new(1.0, 1.0),
            &[ranked(1, "Here", 1.2, 0.8, 0.28)],
            1,
        );
        assert_eq!(out[0].directions, "You are already at the destination");
    }

    #[test]
    fn time_formatting_switches_at_one_minute() {
        let planner = RoutePlanner::default();
        assert_eq!(planner.format_walking_time(45.0), "45 s");
        assert_eq!(planner.format_walking_time(90.0), "1 min 30 s");
    }

    #[test]
    fn time_scales_with_walking_speed() {
        let planner = RoutePlanner {
            walking_speed_mps: 2.0,
            ..RoutePlanner::default()
        };
        assert_eq!(planner.format_walking_time(90.0), "45 s");
    }

    #[test]
    fn instruction_sequence_is_complete() {
        let planner = RoutePlanner::default();
        let out = planner.suggest(Point2D::default(), &[ranked(9, "Exit", 3.0, 4.0, 5.0)], 1);
        let ins = &out[0].instructions;
        assert_eq!(ins.len(), 4);
        assert!(ins[0].contains("Exit"));
        assert!(ins[2].contains("5.00 m"));
        assert!(ins[3].contains("5 s"));
    }
}
