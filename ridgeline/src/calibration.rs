//! Two-tap horizontal field-of-view calibration.
//!
//! The host asks the user to line a distant landmark up with one screen edge,
//! tap, pan until the landmark sits on the opposite edge, and tap again. The
//! bearing swept between the taps *is* the horizontal field of view. The
//! calibrator only records smoothed bearings and computes the difference; all
//! prompting and tap detection stays with the host.

use serde::{Deserialize, Serialize};

/// Fallback horizontal field of view in degrees, used until calibration
/// completes.
pub const DEFAULT_HFOV_DEG: f64 = 50.2;

/// Fixed vertical field of view in degrees.
pub const DEFAULT_VFOV_DEG: f64 = 20.0;

/// Progress of the two-tap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationState {
    /// No edge recorded yet.
    WaitingFirstTap,
    /// First edge recorded; waiting for the opposite edge.
    WaitingSecondTap {
        /// Smoothed bearing at the first tap, degrees.
        first_edge_deg: f64,
    },
    /// Field of view derived; terminal until reset.
    Calibrated {
        /// Calibrated horizontal field of view, degrees.
        hfov_deg: f64,
    },
}

/// Two-tap field-of-view calibration state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct FovCalibrator {
    state: CalibrationState,
}

impl FovCalibrator {
    /// Start uncalibrated, waiting for the first edge.
    pub fn new() -> Self {
        Self {
            state: CalibrationState::WaitingFirstTap,
        }
    }

    /// Start already calibrated, e.g. restored from a persisted profile.
    pub fn calibrated(hfov_deg: f64) -> Self {
        Self {
            state: CalibrationState::Calibrated { hfov_deg },
        }
    }

    /// Record a tap at the given smoothed bearing (degrees, without any
    /// compass trim).
    ///
    /// Returns the derived field of view when this tap completes the
    /// protocol. Taps after completion are ignored until [`reset`](Self::reset).
    pub fn record_tap(&mut self, bearing_deg: f64) -> Option<f64> {
        use CalibrationState::*;

        let (next, completed) = match self.state {
            WaitingFirstTap => {
                log::info!("fov calibration: first edge at {bearing_deg:.1}°");
                (
                    WaitingSecondTap {
                        first_edge_deg: bearing_deg,
                    },
                    None,
                )
            }
            WaitingSecondTap { first_edge_deg } => {
                let mut hfov_deg = first_edge_deg - bearing_deg;
                if hfov_deg < 0.0 {
                    hfov_deg += 360.0;
                }
                log::info!(
                    "fov calibration: second edge at {bearing_deg:.1}°, hfov {hfov_deg:.1}°"
                );
                if hfov_deg > 180.0 {
                    log::warn!(
                        "calibrated hfov {hfov_deg:.1}° exceeds a half turn; \
                         the sweep direction was likely reversed"
                    );
                }
                (Calibrated { hfov_deg }, Some(hfov_deg))
            }
            Calibrated { hfov_deg } => {
                log::debug!("calibration tap ignored, already calibrated");
                (Calibrated { hfov_deg }, None)
            }
        };

        self.state = next;
        completed
    }

    /// Discard any calibration and return to waiting for the first edge.
    pub fn reset(&mut self) {
        log::info!("fov calibration reset");
        self.state = CalibrationState::WaitingFirstTap;
    }

    /// Current protocol state.
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// True once the protocol has completed.
    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, CalibrationState::Calibrated { .. })
    }

    /// The calibrated horizontal field of view, if the protocol has completed.
    pub fn hfov_degrees(&self) -> Option<f64> {
        match self.state {
            CalibrationState::Calibrated { hfov_deg } => Some(hfov_deg),
            _ => None,
        }
    }

    /// The calibrated horizontal field of view, or [`DEFAULT_HFOV_DEG`] while
    /// uncalibrated.
    pub fn hfov_or_default(&self) -> f64 {
        self.hfov_degrees().unwrap_or(DEFAULT_HFOV_DEG)
    }
}

impl Default for FovCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Calibration values the host persists between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Calibrated horizontal field of view, degrees; `None` if the two-tap
    /// protocol never completed.
    pub hfov_deg: Option<f64>,
    /// Manual compass trim, degrees.
    pub compass_adjustment_deg: f64,
}
