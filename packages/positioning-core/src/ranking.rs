//! Distance ranking of points of interest.

use crate::types::{Point2D, PointOfInterest, RankedPoint};

/// Distance from `origin` to every point, sorted ascending.
///
/// Stable sort: equidistant points keep their input order. Empty input is a
/// valid empty result.
pub fn rank_points(origin: Point2D, points: &[PointOfInterest]) -> Vec<RankedPoint> {
    let mut ranked: Vec<RankedPoint> = points
        .iter()
        .map(|p| RankedPoint {
            point: p.clone(),
            distance_m: origin.distance_to(p.pos),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(id: u32, name: &str, x: f64, y: f64) -> PointOfInterest {
        PointOfInterest {
            id,
            name: name.to_string(),
            pos: Point2D::new(x, y),
        }
    }

    #[test]
    fn sorted_ascending_regardless_of_input_order() {
        let points = vec![
            poi(1, "far", 10.0, 10.0),
            poi(2, "near", 1.0, 0.0),
            poi(3, "mid", 3.0, 4.0),
        ];
        let origin = Point2D::new(0.0, 0.0);

        // Every permutation of the input must produce a non-decreasing list.
        let perms: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for perm in perms {
            let shuffled: Vec<_> = perm.iter().map(|&i| points[i].clone()).collect();
            let ranked = rank_points(origin, &shuffled);
            assert!(ranked
                .windows(2)
                .all(|w| w[0].distance_m <= w[1].distance_m));
            assert_eq!(ranked[0].point.id, 2);
            assert_eq!(ranked[2].point.id, 1);
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let points = vec![poi(7, "east", 5.0, 0.0), poi(8, "west", -5.0, 0.0)];
        let ranked = rank_points(Point2D::default(), &points);
        assert_eq!(ranked[0].point.id, 7);
        assert_eq!(ranked[1].point.id, 8);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(rank_points(Point2D::default(), &[]).is_empty());
    }
}
