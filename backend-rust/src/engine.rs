//! Navigation engine — composes the positioning core with the measurement
//! store and the deployment registry.
//!
//! Every inbound operation of the request layer lands here; handlers only
//! translate HTTP to these calls and map errors to status codes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use positioning_core::{
    rank_points, AnchorReading, EstimatedPosition, FloorBounds, Measurement, Point2D,
    PointOfInterest, PositionError, PositioningStrategy, Precision, RankedPoint, RoutePlanner,
    RouteSuggestion, RssiCurve,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::registry::Registry;
use crate::store::{MeasurementStore, StoreStats};

// ── Response payloads ─────────────────────────────────────────────────────────

/// Acknowledgement for one ingested anchor report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestAck {
    pub user_name: String,
    pub beacon_name: String,
    pub measurement: Measurement,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub user_name: String,
    pub estimate: EstimatedPosition,
    pub capability: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestPointsResponse {
    pub user_name: String,
    pub user_position: Point2D,
    pub estimate: EstimatedPosition,
    pub nearest_points: Vec<RankedPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    pub user_position: Point2D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<EstimatedPosition>,
    pub suggested_routes: Vec<RouteSuggestion>,
}

/// Stored data overview for one user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub user_name: String,
    pub beacon_name: String,
    pub total_measurements: usize,
    pub can_calculate_position: bool,
    pub capability: &'static str,
    pub measurements: HashMap<String, Measurement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecisionSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub strategy: &'static str,
    pub anchors_registered: usize,
    pub points_registered: usize,
    pub beacons_registered: usize,
    pub store: StoreStats,
    pub users_by_precision: PrecisionSummary,
}

// ── Engine ────────────────────────────────────────────────────────────────────

pub struct NavEngine {
    store: MeasurementStore,
    registry: Arc<Registry>,
    strategy: Arc<dyn PositioningStrategy>,
    rssi_curve: RssiCurve,
    planner: RoutePlanner,
    bounds: FloorBounds,
}

impl NavEngine {
    pub fn new(
        store: MeasurementStore,
        registry: Arc<Registry>,
        strategy: Arc<dyn PositioningStrategy>,
        rssi_curve: RssiCurve,
        planner: RoutePlanner,
        bounds: FloorBounds,
    ) -> Self {
        Self {
            store,
            registry,
            strategy,
            rssi_curve,
            planner,
            bounds,
        }
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Store one anchor report, attributing it to the beacon's user.
    pub async fn ingest_reading(
        &self,
        beacon_name: &str,
        anchor_id: &str,
        rssi: i32,
    ) -> Result<IngestAck, PositionError> {
        let user_name = self
            .registry
            .user_for_beacon(beacon_name)
            .ok_or_else(|| PositionError::not_found("beacon", beacon_name))?
            .to_string();

        let anchor_pos = self
            .registry
            .anchor_position(anchor_id)
            .ok_or_else(|| PositionError::not_found("anchor", anchor_id))?;

        let measurement = Measurement {
            anchor_id: anchor_id.to_string(),
            rssi,
            distance_m: self.rssi_curve.distance(rssi),
            anchor_pos,
            timestamp_ms: Utc::now().timestamp_millis(),
        };

        debug!(
            "Reading: user={user_name} anchor={anchor_id} rssi={rssi} → {:.2} m",
            measurement.distance_m
        );
        self.store.record(&user_name, measurement.clone()).await;

        Ok(IngestAck {
            user_name,
            beacon_name: beacon_name.to_string(),
            measurement,
        })
    }

    /// Solve the user's position from their current measurement set.
    pub async fn compute_position(&self, user_name: &str) -> Result<PositionResponse, PositionError> {
        self.require_beacon(user_name)?;

        let readings = self.readings_for(user_name).await;
        if readings.is_empty() {
            return Err(PositionError::InsufficientData { have: 0 });
        }

        let estimate = self.strategy.solve(&readings)?;
        info!(
            "Solved {user_name}: ({:.2}, {:.2}) via {:?} [{:?}]",
            estimate.pos.x, estimate.pos.y, estimate.method, estimate.precision
        );

        Ok(PositionResponse {
            user_name: user_name.to_string(),
            capability: Precision::capability_label(estimate.readings_used),
            estimate,
        })
    }

    /// Nearest points of interest to the user's estimated position.
    pub async fn nearest_points(
        &self,
        user_name: &str,
        max_points: usize,
    ) -> Result<NearestPointsResponse, PositionError> {
        let position = self.compute_position(user_name).await?;
        let mut ranked = rank_points(position.estimate.pos, self.registry.points());
        ranked.truncate(max_points);

        Ok(NearestPointsResponse {
            user_name: user_name.to_string(),
            user_position: position.estimate.pos,
            estimate: position.estimate,
            nearest_points: ranked,
        })
    }

    /// Route suggestions from the user's estimated position.
    pub async fn suggest_routes(
        &self,
        user_name: &str,
        max_suggestions: i64,
    ) -> Result<RoutesResponse, PositionError> {
        let position = self.compute_position(user_name).await?;
        let ranked = rank_points(position.estimate.pos, self.registry.points());
        let suggested_routes = self
            .planner
            .suggest(position.estimate.pos, &ranked, max_suggestions);

        Ok(RoutesResponse {
            user_position: position.estimate.pos,
            estimate: Some(position.estimate),
            suggested_routes,
        })
    }

    /// Route suggestions from an arbitrary (validated) position, optionally
    /// narrowed to one destination.
    pub async fn routes_from(
        &self,
        x: f64,
        y: f64,
        destination_id: Option<u32>,
        max_suggestions: i64,
    ) -> Result<RoutesResponse, PositionError> {
        self.bounds.validate(x, y)?;
        let origin = Point2D::new(x, y);

        let points: Vec<PointOfInterest> = match destination_id {
            Some(id) => {
                let point = self
                    .registry
                    .point(id)
                    .ok_or_else(|| PositionError::not_found("point of interest", id.to_string()))?;
                vec![point.clone()]
            }
            None => self.registry.points().to_vec(),
        };

        let ranked = rank_points(origin, &points);
        let suggested_routes = self.planner.suggest(origin, &ranked, max_suggestions);

        Ok(RoutesResponse {
            user_position: origin,
            estimate: None,
            suggested_routes,
        })
    }

    /// Stored measurements and positioning capability for one user.
    pub async fn user_overview(&self, user_name: &str) -> Result<UserOverview, PositionError> {
        let beacon_name = self.require_beacon(user_name)?.to_string();
        let measurements = self.store.snapshot(user_name).await;
        let valid = measurements
            .values()
            .filter(|m| m.distance_m > 0.0)
            .count();

        Ok(UserOverview {
            user_name: user_name.to_string(),
            beacon_name,
            total_measurements: measurements.len(),
            can_calculate_position: !measurements.is_empty(),
            capability: Precision::capability_label(valid),
            measurements,
        })
    }

    /// System-wide snapshot: registry sizes, store counters, per-precision
    /// user tally.
    pub async fn system_status(&self) -> SystemStatus {
        let (anchors, points, beacons) = self.registry.counts();
        let counts = self.store.counts_by_user().await;

        let mut summary = PrecisionSummary {
            high: 0,
            medium: 0,
            low: 0,
        };
        for n in counts.values() {
            match n {
                0 => {}
                1 => summary.low += 1,
                2 => summary.medium += 1,
                _ => summary.high += 1,
            }
        }

        SystemStatus {
            strategy: self.strategy.name(),
            anchors_registered: anchors,
            points_registered: points,
            beacons_registered: beacons,
            store: self.store.stats().await,
            users_by_precision: summary,
        }
    }

    fn require_beacon(&self, user_name: &str) -> Result<&str, PositionError> {
        self.registry
            .beacon_for_user(user_name)
            .ok_or_else(|| PositionError::not_found("user", user_name))
    }

    /// Readings in ingestion order (timestamp, then anchor id for ties) so
    /// trilateration's "first three" is deterministic.
    async fn readings_for(&self, user_name: &str) -> Vec<AnchorReading> {
        let snapshot = self.store.snapshot(user_name).await;
        let mut measurements: Vec<&Measurement> = snapshot.values().collect();
        measurements.sort_by(|a, b| {
            a.timestamp_ms
                .cmp(&b.timestamp_ms)
                .then_with(|| a.anchor_id.cmp(&b.anchor_id))
        });
        measurements.into_iter().map(AnchorReading::from).collect()
    }
}
