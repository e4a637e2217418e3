use thiserror::Error;

/// Axis name carried by out-of-bounds failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Failure modes of the positioning core.
///
/// The transport layer maps these to protocol responses; the core never
/// retries. Empty result sets from list-producing operations are not errors.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("insufficient data: {have} valid measurement(s), at least 1 required")]
    InsufficientData { have: usize },

    #[error("invalid measurement from anchor '{anchor_id}': distance {distance_m} m is not positive")]
    InvalidMeasurement { anchor_id: String, distance_m: f64 },

    #[error("degenerate geometry: anchors are collinear or coincident")]
    DegenerateGeometry,

    #[error("coordinate {axis} = {value} outside allowed range [{min}, {max}]")]
    OutOfBounds {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("internal computation error: {0}")]
    Internal(String),
}

impl PositionError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
