//! RSSI → distance conversion.
//!
//! Single empirical curve fit taken from the deployed ESP32 sniffer firmware.
//! It is not a general propagation model; callers must treat non-positive
//! results as "no usable distance".

use serde::{Deserialize, Serialize};

/// Distance sentinel returned when an anchor reports no signal.
pub const NO_SIGNAL: f64 = -1.0;

/// Parameters of the empirical RSSI curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RssiCurve {
    /// Reference power at 1 m (dBm).
    pub reference_power: f64,
    /// Environment path-loss exponent (unused by the fitted curve itself,
    /// kept as a tuning hook for recalibration).
    pub path_loss_exponent: f64,
}

impl Default for RssiCurve {
    fn default() -> Self {
        Self {
            reference_power: -59.0,
            path_loss_exponent: 2.0,
        }
    }
}

impl RssiCurve {
    /// Estimate distance in meters from a raw RSSI sample.
    ///
    /// `rssi == 0` means the anchor saw no signal and yields [`NO_SIGNAL`].
    /// A negative ratio (rssi and reference power with opposite signs) would
    /// put a negative base under a fractional exponent, so it also yields the
    /// sentinel instead of NaN.
    pub fn distance(&self, rssi: i32) -> f64 {
        if rssi == 0 {
            return NO_SIGNAL;
        }

        let ratio = self.reference_power / rssi as f64;
        if ratio < 0.0 {
            return NO_SIGNAL;
        }

        if ratio < 1.0 {
            ratio.powi(10)
        } else {
            0.89976 * ratio.powf(7.7095) + 0.111
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rssi_is_no_signal() {
        let curve = RssiCurve::default();
        assert_eq!(curve.distance(0), NO_SIGNAL);
    }

    #[test]
    fn unit_ratio_takes_power_law_branch() {
        // ratio == 1.0 exactly: `ratio < 1.0` is false, so the fitted
        // power-law branch runs: 0.89976 * 1^7.7095 + 0.111 = 1.01076
        let curve = RssiCurve::default();
        let d = curve.distance(-59);
        assert!((d - 1.01076).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn sub_unit_ratio_takes_tenth_power_branch() {
        // rssi = -70 → ratio = 59/70 ≈ 0.8429 < 1 → 0.8429^10 ≈ 0.1810
        let curve = RssiCurve::default();
        let d = curve.distance(-70);
        assert!((d - (59.0f64 / 70.0).powi(10)).abs() < 1e-12, "got {d}");
    }

    #[test]
    fn curve_is_monotonic_in_ratio() {
        // Larger ratio → larger distance, across both branches.
        let curve = RssiCurve::default();
        assert!(curve.distance(-90) < curve.distance(-70));
        assert!(curve.distance(-70) < curve.distance(-59));
        assert!(curve.distance(-59) < curve.distance(-40));
    }

    #[test]
    fn positive_rssi_against_negative_reference_is_guarded() {
        // Negative ratio would raise a negative base to a fractional power.
        let curve = RssiCurve::default();
        assert_eq!(curve.distance(40), NO_SIGNAL);
    }
}
