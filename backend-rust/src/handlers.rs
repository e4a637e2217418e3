//! HTTP layer: axum handlers and the error-to-status mapping.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use positioning_core::PositionError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::engine::NavEngine;
use crate::registry::BeaconAssignment;

pub type SharedEngine = Arc<NavEngine>;

// ── Error mapping ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] PositionError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            PositionError::NotFound { .. } => StatusCode::NOT_FOUND,
            PositionError::InsufficientData { .. }
            | PositionError::InvalidMeasurement { .. }
            | PositionError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
            PositionError::DegenerateGeometry => StatusCode::UNPROCESSABLE_ENTITY,
            PositionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("Internal error: {}", self.0);
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

// ── Request payloads ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRequest {
    pub beacon_name: String,
    pub anchor_id: String,
    pub rssi: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesFromRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub destination_id: Option<u32>,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestQuery {
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesQuery {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: i64,
}

fn default_max_points() -> usize {
    5
}

fn default_max_suggestions() -> i64 {
    3
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconValidation {
    pub beacon_exists: bool,
    pub user_name: Option<String>,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn list_anchors(State(engine): State<SharedEngine>) -> Json<serde_json::Value> {
    Json(json!(engine.registry().anchors()))
}

async fn get_anchor(
    State(engine): State<SharedEngine>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let anchor = engine
        .registry()
        .anchor(&id)
        .ok_or_else(|| PositionError::not_found("anchor", &id))?;
    Ok(Json(json!(anchor)))
}

async fn list_points(State(engine): State<SharedEngine>) -> Json<serde_json::Value> {
    Json(json!(engine.registry().points()))
}

async fn get_point(
    State(engine): State<SharedEngine>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let point = engine
        .registry()
        .point(id)
        .ok_or_else(|| PositionError::not_found("point of interest", id.to_string()))?;
    Ok(Json(json!(point)))
}

async fn list_beacons(State(engine): State<SharedEngine>) -> Json<Vec<BeaconAssignment>> {
    Json(engine.registry().beacons())
}

async fn validate_beacon(
    State(engine): State<SharedEngine>,
    Path(name): Path<String>,
) -> Json<BeaconValidation> {
    let user = engine.registry().user_for_beacon(&name);
    Json(BeaconValidation {
        beacon_exists: user.is_some(),
        user_name: user.map(str::to_string),
    })
}

async fn post_reading(
    State(engine): State<SharedEngine>,
    Json(req): Json<ReadingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = engine
        .ingest_reading(&req.beacon_name, &req.anchor_id, req.rssi)
        .await?;
    Ok(Json(ack))
}

async fn user_measurements(
    State(engine): State<SharedEngine>,
    Path(user): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(engine.user_overview(&user).await?))
}

async fn clear_all(State(engine): State<SharedEngine>) -> impl IntoResponse {
    Json(engine.store().clear_all().await)
}

async fn clear_user(
    State(engine): State<SharedEngine>,
    Path(user): Path<String>,
) -> impl IntoResponse {
    Json(engine.store().clear_user(&user).await)
}

async fn compute_position(
    State(engine): State<SharedEngine>,
    Path(user): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(engine.compute_position(&user).await?))
}

async fn nearest_points(
    State(engine): State<SharedEngine>,
    Path(user): Path<String>,
    Query(q): Query<NearestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(engine.nearest_points(&user, q.max_points).await?))
}

async fn user_routes(
    State(engine): State<SharedEngine>,
    Path(user): Path<String>,
    Query(q): Query<RoutesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(engine.suggest_routes(&user, q.max_suggestions).await?))
}

async fn routes_from_position(
    State(engine): State<SharedEngine>,
    Json(req): Json<RoutesFromRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        engine
            .routes_from(req.x, req.y, req.destination_id, req.max_suggestions)
            .await?,
    ))
}

async fn system_status(State(engine): State<SharedEngine>) -> impl IntoResponse {
    Json(engine.system_status().await)
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/anchors", get(list_anchors))
        .route("/anchors/:id", get(get_anchor))
        .route("/points", get(list_points))
        .route("/points/:id", get(get_point))
        .route("/beacons", get(list_beacons))
        .route("/beacons/validate/:name", get(validate_beacon))
        .route("/readings", post(post_reading))
        .route("/users/:user/measurements", get(user_measurements))
        .route("/measurements", delete(clear_all))
        .route("/measurements/:user", delete(clear_user))
        .route("/users/:user/position", post(compute_position))
        .route("/users/:user/nearest", get(nearest_points))
        .route("/users/:user/routes", get(user_routes))
        .route("/routes/from-position", post(routes_from_position))
        .route("/status", get(system_status))
        .with_state(engine)
}
