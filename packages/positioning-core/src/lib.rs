//! # positioning-core
//!
//! Algorithmic core of the indoor navigation suite: RSSI-to-distance
//! conversion, multi-method 2D position estimation, point-of-interest
//! ranking, and walking-route generation.
//!
//! The crate is pure and synchronous — no I/O, no shared state, no async.
//! The `backend-rust` service owns the measurement store and registries and
//! calls into this crate per request.
//!
//! ## Pipeline
//!
//! anchor report → [`rssi::RssiCurve`] → stored [`types::Measurement`] →
//! [`solver::PositioningStrategy`] → [`ranking::rank_points`] →
//! [`routes::RoutePlanner`]

pub mod bounds;
pub mod error;
pub mod ranking;
pub mod routes;
pub mod rssi;
pub mod solver;
pub mod types;

pub use bounds::FloorBounds;
pub use error::{Axis, PositionError};
pub use ranking::rank_points;
pub use routes::RoutePlanner;
pub use rssi::{RssiCurve, NO_SIGNAL};
pub use solver::{FallbackSolver, PositioningStrategy, StrongestSignalSolver};
pub use types::{
    Anchor, AnchorReading, EstimatedPosition, Measurement, Method, Point2D, PointOfInterest,
    Precision, RankedPoint, RouteSuggestion,
};
