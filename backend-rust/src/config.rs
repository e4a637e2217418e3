//! Process configuration, env-var driven.

use std::sync::Arc;

use positioning_core::{
    FallbackSolver, FloorBounds, PositioningStrategy, RoutePlanner, RssiCurve,
    StrongestSignalSolver,
};
use tracing::warn;

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

pub struct AppConfig {
    /// HTTP port to listen on (default 8000)
    pub http_port: u16,
    /// Registry snapshot file (anchors, points of interest, beacons)
    pub registry_file: String,
    /// Active positioning policy: "fallback" (default) or "strongest-signal"
    pub strategy_name: String,
    pub rssi_curve: RssiCurve,
    pub route_planner: RoutePlanner,
    pub floor_bounds: FloorBounds,
}

impl Default for AppConfig {
    fn default() -> Self {
        let defaults = FloorBounds::default();
        Self {
            http_port: env_parse("NAV_HTTP_PORT").unwrap_or(8000),
            registry_file: std::env::var("NAV_REGISTRY_FILE")
                .unwrap_or_else(|_| "registry.json".to_string()),
            strategy_name: std::env::var("NAV_POSITIONING_STRATEGY")
                .unwrap_or_else(|_| "fallback".to_string()),
            rssi_curve: RssiCurve {
                reference_power: env_parse("NAV_RSSI_REFERENCE_POWER").unwrap_or(-59.0),
                path_loss_exponent: env_parse("NAV_RSSI_PATH_LOSS_EXPONENT").unwrap_or(2.0),
            },
            route_planner: RoutePlanner {
                walking_speed_mps: env_parse("NAV_WALKING_SPEED_MPS").unwrap_or(1.0),
                axis_deadband_m: env_parse("NAV_AXIS_DEADBAND_M").unwrap_or(0.5),
            },
            floor_bounds: FloorBounds {
                min_x: env_parse("NAV_FLOOR_MIN_X").unwrap_or(defaults.min_x),
                max_x: env_parse("NAV_FLOOR_MAX_X").unwrap_or(defaults.max_x),
                min_y: env_parse("NAV_FLOOR_MIN_Y").unwrap_or(defaults.min_y),
                max_y: env_parse("NAV_FLOOR_MAX_Y").unwrap_or(defaults.max_y),
            },
        }
    }
}

impl AppConfig {
    /// Instantiate the configured positioning policy.
    pub fn strategy(&self) -> Arc<dyn PositioningStrategy> {
        match self.strategy_name.as_str() {
            "strongest-signal" => Arc::new(StrongestSignalSolver),
            "fallback" => Arc::new(FallbackSolver),
            other => {
                warn!("Unknown positioning strategy '{other}', using fallback");
                Arc::new(FallbackSolver)
            }
        }
    }
}
