//! Position estimation strategies.
//!
//! Two policies live behind [`PositioningStrategy`]:
//!
//! - [`FallbackSolver`] (default): picks trilateration, bilateration, or a
//!   single-anchor approximation based on how many readings carry a valid
//!   positive distance.
//! - [`StrongestSignalSolver`]: places the user near the anchor with the
//!   smallest estimated distance, shifted by a distance-scaled offset. The
//!   offset direction depends only on the anchor's own coordinates, so this
//!   policy is low-fidelity; it exists for deployments with too few anchors
//!   for geometry to work.
//!
//! The active policy is a deployment choice, selected by the backend config.

use crate::error::PositionError;
use crate::types::{AnchorReading, EstimatedPosition, Method, Point2D, Precision};

/// Denominator threshold below which trilateration geometry is degenerate.
const DEGENERACY_EPS: f64 = 1e-10;

/// A positioning policy: readings in, one estimate out.
pub trait PositioningStrategy: Send + Sync {
    fn solve(&self, readings: &[AnchorReading]) -> Result<EstimatedPosition, PositionError>;

    /// Stable name used in config and status reporting.
    fn name(&self) -> &'static str;
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Strict batch validation: every reading must carry a positive distance.
/// Used when a caller demands pure trilateration with no fallback.
pub fn validate_strict(readings: &[AnchorReading]) -> Result<(), PositionError> {
    for r in readings {
        if r.distance_m <= 0.0 {
            return Err(PositionError::InvalidMeasurement {
                anchor_id: r.anchor_id.clone(),
                distance_m: r.distance_m,
            });
        }
    }
    Ok(())
}

fn valid_readings(readings: &[AnchorReading]) -> Vec<&AnchorReading> {
    readings.iter().filter(|r| r.distance_m > 0.0).collect()
}

// ── Fallback-by-count solver ──────────────────────────────────────────────────

/// Default policy: best geometric method the reading count allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSolver;

impl PositioningStrategy for FallbackSolver {
    fn solve(&self, readings: &[AnchorReading]) -> Result<EstimatedPosition, PositionError> {
        let valid = valid_readings(readings);

        match valid.len() {
            0 => Err(PositionError::InsufficientData { have: 0 }),
            1 => Ok(single_anchor(valid[0])),
            2 => Ok(bilaterate(valid[0], valid[1])),
            _ => trilaterate(valid[0], valid[1], valid[2]).map(|pos| EstimatedPosition {
                pos,
                method: Method::Trilateration,
                precision: Precision::High,
                readings_used: 3,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// One anchor: the best guess is the anchor itself.
fn single_anchor(r: &AnchorReading) -> EstimatedPosition {
    EstimatedPosition {
        pos: r.pos,
        method: Method::SingleAnchor,
        precision: Precision::Low,
        readings_used: 1,
    }
}

/// Two anchors: weighted midpoint biased toward the closer one.
///
/// Each anchor's weight is the *other* anchor's distance over the sum, so a
/// user 1 m from A and 9 m from B lands 90% of the way toward A. Deterministic
/// reconstruction of a two-circle fix without the sign ambiguity of the true
/// intersection.
fn bilaterate(a: &AnchorReading, b: &AnchorReading) -> EstimatedPosition {
    let total = a.distance_m + b.distance_m;
    let wa = b.distance_m / total;
    let wb = a.distance_m / total;

    EstimatedPosition {
        pos: Point2D::new(
            wa * a.pos.x + wb * b.pos.x,
            wa * a.pos.y + wb * b.pos.y,
        ),
        method: Method::Bilateration,
        precision: Precision::Medium,
        readings_used: 2,
    }
}

/// Three anchors: linearized two-equation system.
///
/// Subtracting circle equations pairwise cancels the quadratic terms and
/// leaves a 2x2 linear system solved by Cramer's rule. Fails with
/// `DegenerateGeometry` when the anchors are collinear or coincident.
fn trilaterate(
    r1: &AnchorReading,
    r2: &AnchorReading,
    r3: &AnchorReading,
) -> Result<Point2D, PositionError> {
    let (x1, y1, d1) = (r1.pos.x, r1.pos.y, r1.distance_m);
    let (x2, y2, d2) = (r2.pos.x, r2.pos.y, r2.distance_m);
    let (x3, y3, d3) = (r3.pos.x, r3.pos.y, r3.distance_m);

    let a = 2.0 * (x2 - x1);
    let b = 2.0 * (y2 - y1);
    let c = d1 * d1 - d2 * d2 - x1 * x1 + x2 * x2 - y1 * y1 + y2 * y2;
    let d = 2.0 * (x3 - x2);
    let e = 2.0 * (y3 - y2);
    let f = d2 * d2 - d3 * d3 - x2 * x2 + x3 * x3 - y2 * y2 + y3 * y3;

    let denom = a * e - b * d;
    if denom.abs() < DEGENERACY_EPS {
        return Err(PositionError::DegenerateGeometry);
    }

    let x = (c * e - f * b) / denom;
    let y = (a * f - d * c) / denom;

    if !x.is_finite() || !y.is_finite() {
        return Err(PositionError::Internal(
            "trilateration produced a non-finite coordinate".to_string(),
        ));
    }

    Ok(Point2D::new(x, y))
}

// ── Strongest-signal solver ───────────────────────────────────────────────────

/// Alternate policy: nearest anchor plus a distance-scaled offset.
///
/// Offset magnitude: 0.5 m under 2 m, 30% of distance between 2 and 5 m,
/// then 40% capped at 3 m. Offset direction is `atan2(y, x) + π/4` of the
/// anchor's own coordinates — arbitrary but stable, kept for parity with the
/// deployed firmware. Always reports low precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongestSignalSolver;

impl StrongestSignalSolver {
    fn offset_radius(distance_m: f64) -> f64 {
        if distance_m < 2.0 {
            0.5
        } else if distance_m < 5.0 {
            distance_m * 0.3
        } else {
            (distance_m * 0.4).min(3.0)
        }
    }
}

impl PositioningStrategy for StrongestSignalSolver {
    fn solve(&self, readings: &[AnchorReading]) -> Result<EstimatedPosition, PositionError> {
        let valid = valid_readings(readings);
        if valid.is_empty() {
            return Err(PositionError::InsufficientData { have: 0 });
        }

        let nearest = valid
            .iter()
            .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m))
            .ok_or_else(|| {
                PositionError::Internal("strongest-signal selection yielded nothing".to_string())
            })?;

        let radius = Self::offset_radius(nearest.distance_m);
        let angle = nearest.pos.y.atan2(nearest.pos.x) + std::f64::consts::FRAC_PI_4;

        Ok(EstimatedPosition {
            pos: Point2D::new(
                nearest.pos.x + radius * angle.cos(),
                nearest.pos.y + radius * angle.sin(),
            ),
            method: Method::StrongestSignal,
            precision: Precision::Low,
            readings_used: valid.len(),
        })
    }

    fn name(&self) -> &'static str {
        "strongest-signal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: &str, x: f64, y: f64, d: f64) -> AnchorReading {
        AnchorReading {
            anchor_id: id.to_string(),
            pos: Point2D::new(x, y),
            distance_m: d,
        }
    }

    #[test]
    fn no_valid_readings_is_insufficient() {
        let solver = FallbackSolver;
        let err = solver
            .solve(&[reading("a", 0.0, 0.0, -1.0), reading("b", 1.0, 1.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, PositionError::InsufficientData { have: 0 }));
    }

    #[test]
    fn single_reading_returns_anchor_position() {
        let solver = FallbackSolver;
        let est = solver.solve(&[reading("a", 2.5, -1.0, 4.0)]).unwrap();
        assert_eq!(est.pos, Point2D::new(2.5, -1.0));
        assert_eq!(est.method, Method::SingleAnchor);
        assert_eq!(est.precision, Precision::Low);
    }

    #[test]
    fn bilateration_biases_toward_closer_anchor() {
        let solver = FallbackSolver;
        // 1 m from A(0,0), 9 m from B(10,0) → 90% of the way toward A → x = 1
        let est = solver
            .solve(&[reading("a", 0.0, 0.0, 1.0), reading("b", 10.0, 0.0, 9.0)])
            .unwrap();
        assert!((est.pos.x - 1.0).abs() < 1e-12);
        assert!(est.pos.y.abs() < 1e-12);
        assert_eq!(est.method, Method::Bilateration);
        assert_eq!(est.precision, Precision::Medium);
    }

    #[test]
    fn trilateration_recovers_known_point() {
        // Anchors at (0,0), (10,0), (0,10); distances consistent with (3,4)
        let solver = FallbackSolver;
        let est = solver
            .solve(&[
                reading("a", 0.0, 0.0, 5.0),
                reading("b", 10.0, 0.0, (49.0f64 + 16.0).sqrt()),
                reading("c", 0.0, 10.0, (9.0f64 + 36.0).sqrt()),
            ])
            .unwrap();
        assert!((est.pos.x - 3.0).abs() < 1e-6);
        assert!((est.pos.y - 4.0).abs() < 1e-6);
        assert_eq!(est.method, Method::Trilateration);
        assert_eq!(est.precision, Precision::High);
        assert_eq!(est.readings_used, 3);
    }

    #[test]
    fn collinear_anchors_are_degenerate() {
        let solver = FallbackSolver;
        let err = solver
            .solve(&[
                reading("a", 0.0, 0.0, 1.0),
                reading("b", 5.0, 0.0, 2.0),
                reading("c", 10.0, 0.0, 3.0),
            ])
            .unwrap_err();
        assert!(matches!(err, PositionError::DegenerateGeometry));
    }

    #[test]
    fn fallback_filters_invalid_then_trilaterates() {
        // A no-signal entry must not block the three good ones.
        let solver = FallbackSolver;
        let est = solver
            .solve(&[
                reading("dead", 7.0, 7.0, -1.0),
                reading("a", 0.0, 0.0, 5.0),
                reading("b", 10.0, 0.0, (49.0f64 + 16.0).sqrt()),
                reading("c", 0.0, 10.0, (9.0f64 + 36.0).sqrt()),
            ])
            .unwrap();
        assert_eq!(est.method, Method::Trilateration);
        assert!((est.pos.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn strict_validation_names_offending_anchor() {
        let err = validate_strict(&[
            reading("good", 0.0, 0.0, 2.0),
            reading("bad", 1.0, 1.0, -1.0),
        ])
        .unwrap_err();
        match err {
            PositionError::InvalidMeasurement { anchor_id, .. } => assert_eq!(anchor_id, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strongest_signal_offsets_from_nearest_anchor() {
        let solver = StrongestSignalSolver;
        let est = solver
            .solve(&[reading("far", 10.0, 0.0, 8.0), reading("near", 3.0, 4.0, 1.5)])
            .unwrap();
        assert_eq!(est.method, Method::StrongestSignal);
        assert_eq!(est.precision, Precision::Low);
        // Under 2 m the offset radius is exactly 0.5 m
        let base = Point2D::new(3.0, 4.0);
        assert!((est.pos.distance_to(base) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn strongest_signal_offset_tiers() {
        assert_eq!(StrongestSignalSolver::offset_radius(1.0), 0.5);
        assert!((StrongestSignalSolver::offset_radius(3.0) - 0.9).abs() < 1e-12);
        assert_eq!(StrongestSignalSolver::offset_radius(20.0), 3.0);
    }
}
