//! Ridgeline - bearing/elevation estimation and screen projection for
//! augmented-reality peak sighting.
//!
//! The library is the computational core of a hill-identification overlay:
//! a host application feeds it raw accelerometer/magnetometer readings,
//! display rotation, magnetic declination and calibration taps, and reads back
//! a smoothed compass bearing, a smoothed pitch, a stability score and
//! per-peak screen placements. All rendering, sensor delivery and persistence
//! stay with the host.
//!
//! Pipeline: sensor triples → [`orientation::OrientationEstimator`] → two
//! [`smoothing::AngleWindow`]s (bearing, elevation) →
//! [`projection::SkyProjector`] per visible [`peak::Peak`]. The two-tap
//! [`calibration::FovCalibrator`] runs on the side, turning a pair of bearing
//! readings into the horizontal field of view the projector uses.
//! [`sighting::SightingSystem`] wires the whole pipeline behind one owner for
//! hosts that want a single entry point.

pub mod calibration;
pub mod orientation;
pub mod peak;
pub mod projection;
pub mod sighting;
pub mod smoothing;

pub use calibration::{
    CalibrationProfile, CalibrationState, FovCalibrator, DEFAULT_HFOV_DEG, DEFAULT_VFOV_DEG,
};
pub use orientation::{
    DeviceOrientation, OrientationError, OrientationEstimator, ScreenRotation, VectorSample,
};
pub use peak::Peak;
pub use projection::{ScreenPlacement, ScreenSize, SkyProjector};
pub use sighting::{SightingConfig, SightingSystem, COMPASS_TRIM_STEP_DEG};
pub use smoothing::{AngleWindow, DEFAULT_WINDOW_LEN};
