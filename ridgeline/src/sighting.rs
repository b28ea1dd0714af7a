//! Host-facing facade wiring the whole sighting pipeline together.
//!
//! [`SightingSystem`] owns the two smoothing windows, the orientation
//! estimator and the field-of-view calibrator, and exposes the narrow input
//! methods a host calls as its platform events arrive: sensor readings,
//! display-rotation and declination changes, calibration taps and compass trim
//! keys. Reads come back out as the smoothed bearing and pitch, the dispersion
//! scores, and a per-frame [`SkyProjector`].
//!
//! Everything is plain owned state behind `&mut self`; hosts delivering
//! events from more than one thread serialize access themselves.

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationProfile, CalibrationState, FovCalibrator, DEFAULT_VFOV_DEG};
use crate::orientation::{DeviceOrientation, OrientationEstimator, ScreenRotation, VectorSample};
use crate::projection::{ScreenSize, SkyProjector};
use crate::smoothing::{AngleWindow, DEFAULT_WINDOW_LEN};

/// Degrees of compass trim applied per adjustment key press.
pub const COMPASS_TRIM_STEP_DEG: f64 = 0.1;

/// Tunables for a [`SightingSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SightingConfig {
    /// Length of the bearing and elevation smoothing windows.
    pub window_len: usize,
    /// Vertical field of view in degrees; fixed, not calibrated.
    pub vfov_deg: f64,
}

impl Default for SightingConfig {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            vfov_deg: DEFAULT_VFOV_DEG,
        }
    }
}

/// The full sighting pipeline behind one owner.
///
/// Sensor readings pushed in through [`push_accelerometer`] and
/// [`push_magnetometer`] flow through the orientation estimator into the two
/// smoothing windows whenever they yield a valid attitude; degenerate or
/// unreliable readings leave the smoothed state untouched. Calibration taps
/// read the bearing window directly.
///
/// [`push_accelerometer`]: Self::push_accelerometer
/// [`push_magnetometer`]: Self::push_magnetometer
#[derive(Debug, Clone)]
pub struct SightingSystem {
    config: SightingConfig,
    bearing: AngleWindow,
    elevation: AngleWindow,
    estimator: OrientationEstimator,
    calibrator: FovCalibrator,
    /// Manual compass trim in degrees, applied on read, never stored in the
    /// window.
    compass_adjustment_deg: f64,
}

impl SightingSystem {
    /// Fresh system: empty windows, no stored readings, uncalibrated.
    pub fn new(config: SightingConfig) -> Self {
        Self {
            bearing: AngleWindow::new(config.window_len),
            elevation: AngleWindow::new(config.window_len),
            estimator: OrientationEstimator::new(),
            calibrator: FovCalibrator::new(),
            compass_adjustment_deg: 0.0,
            config,
        }
    }

    /// Feed an accelerometer reading from the host's sensor stack.
    ///
    /// Returns the fresh attitude when this event produced one; the smoothing
    /// windows are updated as a side effect. `None` means the smoothed state
    /// is unchanged (estimator not ready, unreliable reading, or a degenerate
    /// vector pair).
    pub fn push_accelerometer(&mut self, sample: VectorSample) -> Option<DeviceOrientation> {
        let orientation = self.estimator.push_accelerometer(sample)?;
        self.absorb(orientation);
        Some(orientation)
    }

    /// Feed a magnetometer reading. Same contract as
    /// [`push_accelerometer`](Self::push_accelerometer).
    pub fn push_magnetometer(&mut self, sample: VectorSample) -> Option<DeviceOrientation> {
        let orientation = self.estimator.push_magnetometer(sample)?;
        self.absorb(orientation);
        Some(orientation)
    }

    fn absorb(&mut self, orientation: DeviceOrientation) {
        self.bearing.add_sample(orientation.azimuth_rad);
        self.elevation.add_sample(orientation.pitch_rad);
    }

    /// Set the magnetic declination, degrees east of true north, as derived by
    /// the host from its current location.
    pub fn set_declination_degrees(&mut self, declination_deg: f64) {
        self.estimator.set_declination_degrees(declination_deg);
    }

    /// Set the display rotation the host currently reports.
    pub fn set_screen_rotation(&mut self, rotation: ScreenRotation) {
        self.estimator.set_screen_rotation(rotation);
    }

    /// Record a calibration tap at the current smoothed bearing.
    ///
    /// The raw smoothed bearing is used, without the compass trim; the trim
    /// would cancel in the two-tap difference anyway. Returns the derived
    /// horizontal field of view when this tap completes the protocol.
    pub fn calibration_tap(&mut self) -> Option<f64> {
        self.calibrator.record_tap(self.bearing.mean_degrees())
    }

    /// Discard the field-of-view calibration and restart the protocol.
    pub fn reset_calibration(&mut self) {
        self.calibrator.reset();
    }

    /// Current calibration protocol state.
    pub fn calibration_state(&self) -> CalibrationState {
        self.calibrator.state()
    }

    /// True once the two-tap protocol has completed or a calibrated profile
    /// was restored.
    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    /// Horizontal field of view the projection will use: the calibrated value,
    /// or the stock default while uncalibrated.
    pub fn hfov_degrees(&self) -> f64 {
        self.calibrator.hfov_or_default()
    }

    /// Step the compass trim by whole key presses, [`COMPASS_TRIM_STEP_DEG`]
    /// degrees each, negative for the opposite key.
    pub fn nudge_compass_adjustment(&mut self, steps: i32) {
        self.compass_adjustment_deg += f64::from(steps) * COMPASS_TRIM_STEP_DEG;
        log::info!(
            "compass adjustment now {:+.1}°",
            self.compass_adjustment_deg
        );
    }

    /// Set the compass trim outright, e.g. from a restored profile.
    pub fn set_compass_adjustment_degrees(&mut self, adjustment_deg: f64) {
        self.compass_adjustment_deg = adjustment_deg;
    }

    /// Current compass trim, degrees.
    pub fn compass_adjustment_degrees(&self) -> f64 {
        self.compass_adjustment_deg
    }

    /// Smoothed device bearing with the compass trim applied, degrees in
    /// `[0, 360)`.
    pub fn bearing_degrees(&self) -> f64 {
        self.bearing.adjusted_degrees(self.compass_adjustment_deg)
    }

    /// Smoothed device pitch, radians. Positive tilts the view below the
    /// horizontal.
    pub fn pitch_radians(&self) -> f64 {
        self.elevation.mean_radians()
    }

    /// Dispersion of the bearing window; near zero while the compass is
    /// steady. Hosts gate calibration prompts on this.
    pub fn bearing_dispersion(&self) -> f64 {
        self.bearing.dispersion()
    }

    /// Dispersion of the elevation window.
    pub fn pitch_dispersion(&self) -> f64 {
        self.elevation.dispersion()
    }

    /// True once both smoothing windows have completed a full pass and the
    /// startup transient is over.
    pub fn is_warm(&self) -> bool {
        self.bearing.is_warm() && self.elevation.is_warm()
    }

    /// Projector for the current smoothed attitude and the given screen.
    ///
    /// Build one per redraw and run every local peak through it.
    pub fn projector(&self, screen: ScreenSize) -> SkyProjector {
        SkyProjector::new(
            self.bearing_degrees(),
            self.pitch_radians(),
            self.hfov_degrees(),
            self.config.vfov_deg,
            screen,
        )
    }

    /// Calibration values for the host to persist between sessions.
    pub fn calibration_profile(&self) -> CalibrationProfile {
        CalibrationProfile {
            hfov_deg: self.calibrator.hfov_degrees(),
            compass_adjustment_deg: self.compass_adjustment_deg,
        }
    }

    /// Restore a persisted profile at startup.
    ///
    /// A profile without a field of view leaves the system uncalibrated and
    /// the two-tap protocol ready to run.
    pub fn restore_profile(&mut self, profile: CalibrationProfile) {
        self.calibrator = match profile.hfov_deg {
            Some(hfov_deg) => FovCalibrator::calibrated(hfov_deg),
            None => FovCalibrator::new(),
        };
        self.compass_adjustment_deg = profile.compass_adjustment_deg;
        log::info!(
            "restored calibration profile: hfov {:?}, compass adjustment {:+.1}°",
            profile.hfov_deg,
            profile.compass_adjustment_deg
        );
    }
}

impl Default for SightingSystem {
    fn default() -> Self {
        Self::new(SightingConfig::default())
    }
}
