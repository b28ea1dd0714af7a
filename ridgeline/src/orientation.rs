//! Device attitude from raw accelerometer and magnetometer triples.
//!
//! Rebuilds, in plain `nalgebra`, the attitude pipeline a phone's sensor stack
//! provides: an east/north/up rotation matrix from the gravity and geomagnetic
//! vectors, a declination correction from magnetic to true north, a
//! screen-rotation remap so the extracted angles track the visual top of the
//! screen, and the final azimuth/pitch/roll decomposition.
//!
//! [`OrientationEstimator`] wraps the pipeline for event-driven hosts: push
//! accelerometer and magnetometer readings as they arrive and it re-derives
//! the attitude whenever both sensors have reported. Unreliable readings are
//! dropped and degenerate vector pairs skipped, keeping the last good state.
//! Azimuth and pitch feed the two smoothing windows; roll is discarded.

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard gravity, m/s².
const STANDARD_GRAVITY: f64 = 9.81;

/// Accelerometer readings with squared magnitude below this (1% of standard
/// gravity squared) are treated as free fall: no usable vertical reference.
const FREE_FALL_GRAVITY_SQUARED: f64 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;

/// Minimum norm of `field × gravity` (raw, unnormalized). Below this the two
/// vectors are close to parallel and east is undefined.
const MIN_EAST_NORM: f64 = 0.1;

/// Failure to derive an attitude from a gravity/field pair.
///
/// Both cases are recoverable: the caller skips the update and keeps the last
/// good smoothed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrientationError {
    /// Accelerometer magnitude too small to define the vertical.
    #[error("accelerometer reads near free fall, no vertical reference")]
    FreeFall,
    /// Gravity and magnetic field vectors are near-parallel.
    #[error("gravity and magnetic field are degenerate, east is undefined")]
    DegenerateField,
}

/// One three-axis reading from the accelerometer or magnetometer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSample {
    /// Measured components in the device coordinate frame. Accelerometer
    /// readings are in m/s², magnetometer readings in µT.
    pub values: Vector3<f64>,
    /// False when the host's sensor stack reports the reading at low accuracy.
    pub reliable: bool,
}

impl VectorSample {
    /// A reading reported at normal accuracy.
    pub fn new(values: [f64; 3]) -> Self {
        Self {
            values: Vector3::new(values[0], values[1], values[2]),
            reliable: true,
        }
    }

    /// A reading the host flagged as low accuracy.
    pub fn unreliable(values: [f64; 3]) -> Self {
        Self {
            reliable: false,
            ..Self::new(values)
        }
    }
}

/// Discrete screen rotation reported by the host's display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenRotation {
    /// Natural portrait orientation.
    #[default]
    Deg0,
    /// Rotated 90° counter-clockwise (landscape, left edge down).
    Deg90,
    /// Upside-down portrait.
    Deg180,
    /// Rotated 270° (landscape, right edge down).
    Deg270,
}

impl ScreenRotation {
    /// Parse the host's rotation value; accepts 0, 90, 180 and 270.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}

/// Instantaneous device attitude derived from one sensor pair.
///
/// Transient: each value is consumed by the smoothing windows as soon as it is
/// produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceOrientation {
    /// Compass bearing of the view axis, radians, clockwise from north.
    pub azimuth_rad: f64,
    /// Tilt of the view axis from the horizontal, radians.
    pub pitch_rad: f64,
}

/// Build the east/north/up rotation matrix from a gravity vector and a
/// geomagnetic field vector, both in device coordinates.
///
/// Rows of the result are the world east, north and up axes expressed in the
/// device frame, so `R * v_device` yields (east, north, up) components.
///
/// # Arguments
/// * `gravity` - accelerometer reading, m/s²
/// * `field` - magnetometer reading, µT
///
/// # Returns
/// The rotation matrix, or an error when the inputs cannot define one.
pub fn rotation_from_gravity_field(
    gravity: &Vector3<f64>,
    field: &Vector3<f64>,
) -> Result<Matrix3<f64>, OrientationError> {
    if gravity.norm_squared() < FREE_FALL_GRAVITY_SQUARED {
        return Err(OrientationError::FreeFall);
    }

    // East is horizontal: perpendicular to both the field and the vertical.
    let east = field.cross(gravity);
    if east.norm() < MIN_EAST_NORM {
        return Err(OrientationError::DegenerateField);
    }
    let east = east.normalize();
    let up = gravity.normalize();
    let north = up.cross(&east);

    Ok(Matrix3::from_rows(&[
        east.transpose(),
        north.transpose(),
        up.transpose(),
    ]))
}

/// Rotate an attitude matrix from magnetic to true north.
///
/// Left-multiplies a rotation of `-declination_deg` about the world vertical,
/// which shifts the extracted azimuth by exactly `+declination_deg`.
pub fn apply_declination(attitude: &Matrix3<f64>, declination_deg: f64) -> Matrix3<f64> {
    let correction =
        Rotation3::from_axis_angle(&Vector3::z_axis(), (-declination_deg).to_radians());
    correction.into_inner() * attitude
}

/// Remap an attitude matrix to the virtual device frame for a screen rotation.
///
/// Keeps azimuth and pitch defined relative to the visual top of the screen
/// however the device is physically held. Columns of the attitude matrix are
/// the device axes; the remap permutes and flips them:
///
/// | rotation | virtual (x, y, z) in device axes |
/// |----------|----------------------------------|
/// | 0°/180°  | (x, -z, y)  |
/// | 90°      | (-y, -z, x) |
/// | 270°     | (y, -z, -x) |
///
/// In every case the virtual y axis is the view axis out of the back of the
/// screen, which is what ties the extracted azimuth and pitch to where the
/// camera points.
pub fn remap_for_rotation(attitude: &Matrix3<f64>, rotation: ScreenRotation) -> Matrix3<f64> {
    let x = attitude.column(0).into_owned();
    let y = attitude.column(1).into_owned();
    let z = attitude.column(2).into_owned();

    let (vx, vy, vz) = match rotation {
        ScreenRotation::Deg0 | ScreenRotation::Deg180 => (x, -z, y),
        ScreenRotation::Deg90 => (-y, -z, x),
        ScreenRotation::Deg270 => (y, -z, -x),
    };
    Matrix3::from_columns(&[vx, vy, vz])
}

/// Decompose a remapped attitude matrix into `(azimuth, pitch, roll)` radians.
///
/// Azimuth is the compass bearing of the virtual y axis, pitch its tilt from
/// the horizontal, roll the rotation about it.
pub fn orientation_angles(attitude: &Matrix3<f64>) -> (f64, f64, f64) {
    let azimuth = attitude[(0, 1)].atan2(attitude[(1, 1)]);
    let pitch = (-attitude[(2, 1)]).clamp(-1.0, 1.0).asin();
    let roll = (-attitude[(2, 0)]).atan2(attitude[(2, 2)]);
    (azimuth, pitch, roll)
}

/// Attitude estimator fed by discrete host sensor events.
#[derive(Debug, Clone, Default)]
pub struct OrientationEstimator {
    /// Latest reliable accelerometer reading.
    gravity: Option<Vector3<f64>>,
    /// Latest reliable magnetometer reading.
    field: Option<Vector3<f64>>,
    /// Magnetic declination at the host's location, degrees east of true north.
    declination_deg: f64,
    /// Current display rotation.
    rotation: ScreenRotation,
}

impl OrientationEstimator {
    /// Estimator with no stored readings, zero declination, natural rotation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the magnetic declination, degrees east of true north. The host
    /// derives this from its location via a geomagnetic model.
    pub fn set_declination_degrees(&mut self, declination_deg: f64) {
        self.declination_deg = declination_deg;
    }

    /// Current declination, degrees.
    pub fn declination_degrees(&self) -> f64 {
        self.declination_deg
    }

    /// Set the display rotation the host currently reports.
    pub fn set_screen_rotation(&mut self, rotation: ScreenRotation) {
        self.rotation = rotation;
    }

    /// Current display rotation.
    pub fn screen_rotation(&self) -> ScreenRotation {
        self.rotation
    }

    /// Feed an accelerometer reading.
    ///
    /// Returns the fresh attitude when this event produced one; `None` while
    /// the magnetometer has not reported yet, for unreliable readings, and for
    /// degenerate vector pairs.
    pub fn push_accelerometer(&mut self, sample: VectorSample) -> Option<DeviceOrientation> {
        if !sample.reliable {
            log::debug!("dropping unreliable accelerometer reading");
            return None;
        }
        self.gravity = Some(sample.values);
        self.estimate()
    }

    /// Feed a magnetometer reading. Same contract as
    /// [`push_accelerometer`](Self::push_accelerometer).
    pub fn push_magnetometer(&mut self, sample: VectorSample) -> Option<DeviceOrientation> {
        if !sample.reliable {
            log::debug!("dropping unreliable magnetometer reading");
            return None;
        }
        self.field = Some(sample.values);
        self.estimate()
    }

    /// Derive the attitude from the stored readings, if possible.
    pub fn estimate(&self) -> Option<DeviceOrientation> {
        let (gravity, field) = match (&self.gravity, &self.field) {
            (Some(gravity), Some(field)) => (gravity, field),
            _ => return None,
        };

        let attitude = match rotation_from_gravity_field(gravity, field) {
            Ok(matrix) => matrix,
            Err(err) => {
                log::debug!("skipping attitude update: {err}");
                return None;
            }
        };
        let attitude = apply_declination(&attitude, self.declination_deg);
        let remapped = remap_for_rotation(&attitude, self.rotation);

        let (azimuth_rad, pitch_rad, _roll) = orientation_angles(&remapped);
        Some(DeviceOrientation {
            azimuth_rad,
            pitch_rad,
        })
    }
}
