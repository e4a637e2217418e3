//! Static deployment registry: anchors, points of interest, beacon→user
//! assignments.
//!
//! Loaded once at startup from a JSON snapshot and read-only afterwards —
//! registry entries are immutable once registered. A missing or corrupt file
//! logs a warning and yields an empty registry so the service still comes up.

use std::collections::HashMap;
use std::path::Path;

use positioning_core::{Anchor, Point2D, PointOfInterest};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

/// Beacon carried by a user; maps radio identity to a user name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconAssignment {
    pub beacon_name: String,
    pub user_name: String,
}

/// On-disk snapshot format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryFile {
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    #[serde(default)]
    pub beacons: Vec<BeaconAssignment>,
}

/// In-memory indexed registry.
#[derive(Debug, Default)]
pub struct Registry {
    anchors: HashMap<String, Anchor>,
    points: Vec<PointOfInterest>,
    beacon_to_user: HashMap<String, String>,
    user_to_beacon: HashMap<String, String>,
}

impl Registry {
    pub fn from_file_data(data: RegistryFile) -> Self {
        let anchors = data
            .anchors
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();
        let beacon_to_user: HashMap<String, String> = data
            .beacons
            .iter()
            .map(|b| (b.beacon_name.clone(), b.user_name.clone()))
            .collect();
        let user_to_beacon = data
            .beacons
            .iter()
            .map(|b| (b.user_name.clone(), b.beacon_name.clone()))
            .collect();
        Self {
            anchors,
            points: data.points_of_interest,
            beacon_to_user,
            user_to_beacon,
        }
    }

    pub fn anchor(&self, id: &str) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    pub fn anchor_position(&self, id: &str) -> Option<Point2D> {
        self.anchors.get(id).map(|a| a.pos)
    }

    pub fn anchors(&self) -> Vec<&Anchor> {
        let mut list: Vec<&Anchor> = self.anchors.values().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn point(&self, id: u32) -> Option<&PointOfInterest> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn user_for_beacon(&self, beacon_name: &str) -> Option<&str> {
        self.beacon_to_user.get(beacon_name).map(String::as_str)
    }

    pub fn beacon_for_user(&self, user_name: &str) -> Option<&str> {
        self.user_to_beacon.get(user_name).map(String::as_str)
    }

    pub fn beacons(&self) -> Vec<BeaconAssignment> {
        let mut list: Vec<BeaconAssignment> = self
            .beacon_to_user
            .iter()
            .map(|(beacon, user)| BeaconAssignment {
                beacon_name: beacon.clone(),
                user_name: user.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.beacon_name.cmp(&b.beacon_name));
        list
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.anchors.len(), self.points.len(), self.beacon_to_user.len())
    }
}

/// Load the registry snapshot. Empty registry if missing or corrupt.
pub async fn load_registry(path: &str) -> Registry {
    if !Path::new(path).exists() {
        warn!("No registry file at {path}, starting with an empty registry");
        return Registry::default();
    }

    match fs::read_to_string(path).await {
        Ok(data) => match serde_json::from_str::<RegistryFile>(&data) {
            Ok(file) => {
                let registry = Registry::from_file_data(file);
                let (anchors, points, beacons) = registry.counts();
                info!(
                    "Loaded registry from {path} ({anchors} anchors, {points} points, {beacons} beacons)"
                );
                registry
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}, starting empty");
                Registry::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {path}: {e}, starting empty");
            Registry::default()
        }
    }
}
