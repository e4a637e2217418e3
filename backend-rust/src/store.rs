//! Per-user measurement cache.
//!
//! The only mutable shared state in the system: user → (anchor → last
//! measurement). One `RwLock` guards the whole table so a snapshot of a
//! user's set is always consistent — a solve never observes a half-applied
//! overwrite. Last write wins for concurrent reports from the same anchor.
//!
//! No eviction: the table grows with distinct users and anchors. Known
//! limitation, acceptable for the deployment sizes this serves.

use std::collections::HashMap;
use std::sync::Arc;

use positioning_core::Measurement;
use serde::Serialize;
use tokio::sync::RwLock;

/// Result of clearing one user's measurements.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearReport {
    pub user_id: String,
    pub measurements_cleared: usize,
    pub anchors_cleared: Vec<String>,
}

/// Result of clearing the whole store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearAllReport {
    pub users_affected: usize,
    pub users_cleared: Vec<String>,
    pub measurements_cleared: usize,
}

/// Aggregate counters for the status endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub users: usize,
    pub measurements: usize,
}

#[derive(Clone, Default)]
pub struct MeasurementStore {
    inner: Arc<RwLock<HashMap<String, HashMap<String, Measurement>>>>,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the measurement for (user, anchor).
    pub async fn record(&self, user_id: &str, measurement: Measurement) {
        let mut table = self.inner.write().await;
        table
            .entry(user_id.to_string())
            .or_default()
            .insert(measurement.anchor_id.clone(), measurement);
    }

    /// Consistent copy of one user's measurement set. Empty for unknown users.
    pub async fn snapshot(&self, user_id: &str) -> HashMap<String, Measurement> {
        let table = self.inner.read().await;
        table.get(user_id).cloned().unwrap_or_default()
    }

    /// Remove one user's set. Zero counts for unknown users, never an error.
    pub async fn clear_user(&self, user_id: &str) -> ClearReport {
        let mut table = self.inner.write().await;
        match table.remove(user_id) {
            Some(set) => {
                let mut anchors: Vec<String> = set.into_keys().collect();
                anchors.sort();
                ClearReport {
                    user_id: user_id.to_string(),
                    measurements_cleared: anchors.len(),
                    anchors_cleared: anchors,
                }
            }
            None => ClearReport {
                user_id: user_id.to_string(),
                measurements_cleared: 0,
                anchors_cleared: Vec::new(),
            },
        }
    }

    /// Empty the store, reporting what was dropped.
    pub async fn clear_all(&self) -> ClearAllReport {
        let mut table = self.inner.write().await;
        let measurements = table.values().map(|set| set.len()).sum();
        let mut users: Vec<String> = table.keys().cloned().collect();
        users.sort();
        table.clear();
        ClearAllReport {
            users_affected: users.len(),
            users_cleared: users,
            measurements_cleared: measurements,
        }
    }

    pub async fn stats(&self) -> StoreStats {
        let table = self.inner.read().await;
        StoreStats {
            users: table.len(),
            measurements: table.values().map(|set| set.len()).sum(),
        }
    }

    /// Per-user measurement counts, for the status summary.
    pub async fn counts_by_user(&self) -> HashMap<String, usize> {
        let table = self.inner.read().await;
        table
            .iter()
            .map(|(user, set)| (user.clone(), set.len()))
            .collect()
    }
}
