//! Shared data model for the indoor positioning core.
//!
//! All coordinates are meters in the floor-plan frame (X = East, Y = North).
//! These types cross the HTTP boundary unchanged, so everything here derives
//! Serialize/Deserialize.

use serde::{Deserialize, Serialize};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// 2D point in the floor-plan frame (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ── Registry entities ─────────────────────────────────────────────────────────

/// Fixed wireless node at a known position. Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    pub pos: Point2D,
}

/// Named destination used for route suggestions. Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: u32,
    pub name: String,
    pub pos: Point2D,
}

// ── Measurements ──────────────────────────────────────────────────────────────

/// Last reading from one anchor for one user.
///
/// Superseded by the next report from the same anchor; at most one live
/// measurement per (user, anchor) pair. The anchor position is snapshotted at
/// ingestion time so a solve never races a registry change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub anchor_id: String,
    pub rssi: i32,
    /// Estimated distance in meters. `-1.0` means "no signal".
    pub distance_m: f64,
    pub anchor_pos: Point2D,
    pub timestamp_ms: i64,
}

/// Position/distance pair fed to a positioning strategy.
#[derive(Debug, Clone)]
pub struct AnchorReading {
    pub anchor_id: String,
    pub pos: Point2D,
    pub distance_m: f64,
}

impl From<&Measurement> for AnchorReading {
    fn from(m: &Measurement) -> Self {
        Self {
            anchor_id: m.anchor_id.clone(),
            pos: m.anchor_pos,
            distance_m: m.distance_m,
        }
    }
}

// ── Solve results ─────────────────────────────────────────────────────────────

/// Which algorithm produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    Trilateration,
    Bilateration,
    SingleAnchor,
    StrongestSignal,
}

/// Confidence tier derived from method and anchor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Precision {
    Low,
    Medium,
    High,
}

impl Precision {
    /// Human-readable capability label for a given count of valid readings.
    pub fn capability_label(valid_readings: usize) -> &'static str {
        match valid_readings {
            0 => "no usable signal",
            1 => "basic positioning from 1 reference point",
            2 => "good positioning from 2 reference points",
            _ => "full trilateration from 3+ reference points",
        }
    }
}

/// Output of a positioning solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedPosition {
    pub pos: Point2D,
    pub method: Method,
    pub precision: Precision,
    /// Number of valid readings that fed the solve.
    pub readings_used: usize,
}

// ── Ranking & routes ──────────────────────────────────────────────────────────

/// A point of interest plus its distance from an estimated position.
/// Lists of these are always sorted ascending by distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPoint {
    pub point: PointOfInterest,
    pub distance_m: f64,
}

/// Walking route toward one ranked point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSuggestion {
    pub destination: RankedPoint,
    pub directions: String,
    pub total_distance_m: f64,
    pub estimated_time: String,
    pub instructions: Vec<String>,
}
