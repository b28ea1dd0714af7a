//! Inverse sensor synthesis: from a wanted attitude to raw sensor readings.
//!
//! The library's fusion pipeline turns accelerometer and magnetometer
//! readings into an azimuth and pitch. The harness needs the opposite: given
//! the attitude a script wants the simulated device to have, produce the
//! readings that decode back to exactly that attitude. This runs the pipeline
//! backwards. Build the decomposed attitude matrix for the wanted angles with
//! zero roll, undo the screen-rotation remap and the declination correction,
//! and read the gravity and field vectors out of the resulting device-frame
//! rotation.
//!
//! The geomagnetic field is modelled by its horizontal and vertical
//! components, which is all the fusion ever resolves.

use nalgebra::{Matrix3, Vector3};
use ridgeline::orientation::{apply_declination, remap_for_rotation};
use ridgeline::{ScreenRotation, VectorSample};

/// Standard gravity used for synthesized accelerometer readings, m/s².
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Geomagnetic field strength at the simulated location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldModel {
    /// Horizontal component toward magnetic north, µT.
    pub horizontal_ut: f64,
    /// Vertical component, positive downward, µT.
    pub vertical_ut: f64,
}

impl Default for FieldModel {
    /// Mid-latitude northern-hemisphere field, steep inclination.
    fn default() -> Self {
        Self {
            horizontal_ut: 19.9,
            vertical_ut: 44.8,
        }
    }
}

/// One synthesized accelerometer/magnetometer pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPair {
    pub accelerometer: VectorSample,
    pub magnetometer: VectorSample,
}

/// The fixed surroundings of a simulated device: field, declination and how
/// the screen is rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorScene {
    /// Magnetic declination at the simulated location, degrees east.
    pub declination_deg: f64,
    /// Display rotation the simulated host reports.
    pub rotation: ScreenRotation,
    /// Local geomagnetic field.
    pub field: FieldModel,
}

impl Default for SensorScene {
    fn default() -> Self {
        Self {
            declination_deg: 0.0,
            rotation: ScreenRotation::Deg0,
            field: FieldModel::default(),
        }
    }
}

impl SensorScene {
    /// Sensor readings for a device whose view axis has the given true
    /// bearing and pitch (positive pitch tilts the view below the
    /// horizontal).
    ///
    /// Decoding the pair with the scene's declination and rotation applied
    /// recovers the same angles to floating precision.
    ///
    /// # Panics
    /// Panics when the pitch is within a millidegree of straight up or
    /// straight down, where the bearing stops being defined.
    pub fn synthesize(&self, azimuth_deg: f64, pitch_rad: f64) -> SensorPair {
        let attitude = self.device_attitude(azimuth_deg, pitch_rad);

        // Rows of the device attitude are the world axes in device
        // coordinates, so transposing maps world vectors into the frame the
        // sensors report in.
        let to_device = attitude.transpose();
        let gravity = to_device * Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
        let field = to_device
            * Vector3::new(0.0, self.field.horizontal_ut, -self.field.vertical_ut);

        SensorPair {
            accelerometer: VectorSample::new([gravity.x, gravity.y, gravity.z]),
            magnetometer: VectorSample::new([field.x, field.y, field.z]),
        }
    }

    /// The magnetic-frame device attitude whose decoded angles are the wanted
    /// ones: build the decomposed matrix with zero roll, then undo the remap
    /// and the declination correction.
    fn device_attitude(&self, azimuth_deg: f64, pitch_rad: f64) -> Matrix3<f64> {
        let decomposed = attitude_from_angles(azimuth_deg.to_radians(), pitch_rad);

        // The remap is a pure column permutation; applying it to the identity
        // yields the permutation matrix, whose transpose undoes it.
        let permutation = remap_for_rotation(&Matrix3::identity(), self.rotation);
        let corrected = decomposed * permutation.transpose();

        // The forward correction rotates by -declination; rotating by
        // +declination puts the attitude back in the magnetic frame the raw
        // sensors live in.
        apply_declination(&corrected, -self.declination_deg)
    }
}

/// Attitude matrix with the given azimuth and pitch and zero roll, columns
/// being the virtual device axes in world coordinates.
fn attitude_from_angles(azimuth_rad: f64, pitch_rad: f64) -> Matrix3<f64> {
    let cos_pitch = pitch_rad.cos();
    assert!(
        cos_pitch.abs() > 2e-5,
        "bearing is undefined with the view axis vertical"
    );

    // View axis in east/north/up coordinates; positive pitch points it below
    // the horizon.
    let view = Vector3::new(
        azimuth_rad.sin() * cos_pitch,
        azimuth_rad.cos() * cos_pitch,
        -pitch_rad.sin(),
    );
    // Zero roll keeps the virtual x axis horizontal, to the right of the view.
    let right = view.cross(&Vector3::z()).normalize();
    let out_of_screen = right.cross(&view);

    Matrix3::from_columns(&[right, view, out_of_screen])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ridgeline::OrientationEstimator;

    fn decode(scene: &SensorScene, pair: SensorPair) -> (f64, f64) {
        let mut estimator = OrientationEstimator::new();
        estimator.set_declination_degrees(scene.declination_deg);
        estimator.set_screen_rotation(scene.rotation);
        estimator.push_accelerometer(pair.accelerometer);
        let orientation = estimator
            .push_magnetometer(pair.magnetometer)
            .expect("synthesized pair must decode");
        (orientation.azimuth_rad.to_degrees(), orientation.pitch_rad)
    }

    #[test]
    fn test_round_trips_through_the_fusion_pipeline() {
        let scene = SensorScene::default();
        for (azimuth_deg, pitch_rad) in
            [(0.0, 0.0), (90.0, 0.1), (179.5, -0.3), (-120.0, 0.02)]
        {
            let pair = scene.synthesize(azimuth_deg, pitch_rad);
            let (decoded_azimuth, decoded_pitch) = decode(&scene, pair);

            // Compare on the circle so 360° - ε matches 0°.
            let separation =
                (decoded_azimuth - azimuth_deg + 180.0).rem_euclid(360.0) - 180.0;
            assert!(
                separation.abs() < 1e-9,
                "azimuth {azimuth_deg} decoded as {decoded_azimuth}"
            );
            assert_relative_eq!(decoded_pitch, pitch_rad, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_round_trips_across_screen_rotations() {
        for rotation in [
            ScreenRotation::Deg0,
            ScreenRotation::Deg90,
            ScreenRotation::Deg180,
            ScreenRotation::Deg270,
        ] {
            let scene = SensorScene {
                rotation,
                ..SensorScene::default()
            };
            let pair = scene.synthesize(237.0, -0.15);
            let (azimuth_deg, pitch_rad) = decode(&scene, pair);

            // decode reports atan2-range degrees; wrap to the compass range.
            assert_relative_eq!(azimuth_deg.rem_euclid(360.0), 237.0, epsilon = 1e-9);
            assert_relative_eq!(pitch_rad, -0.15, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_declination_is_baked_into_the_raw_field() {
        let scene = SensorScene {
            declination_deg: 5.0,
            ..SensorScene::default()
        };
        let pair = scene.synthesize(90.0, 0.0);

        // Decoding with the matching declination recovers the true bearing.
        let (true_bearing, _) = decode(&scene, pair);
        assert_relative_eq!(true_bearing, 90.0, epsilon = 1e-9);

        // Decoding the same physical readings without the correction yields
        // the magnetic bearing, 5° short.
        let uncorrected = SensorScene::default();
        let (magnetic_bearing, _) = decode(&uncorrected, pair);
        assert_relative_eq!(magnetic_bearing, 85.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gravity_magnitude_is_standard() {
        let pair = SensorScene::default().synthesize(42.0, 0.3);
        let accel = pair.accelerometer.values;

        assert_relative_eq!(accel.norm(), STANDARD_GRAVITY, epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "view axis vertical")]
    fn test_vertical_view_is_rejected() {
        let _ = SensorScene::default().synthesize(0.0, std::f64::consts::FRAC_PI_2);
    }
}
