//! End-to-end sighting sessions: synthesized sensors in, screen placements
//! out, with calibration performed through the facade along the way.

use approx::assert_relative_eq;
use ridgeline::{
    Peak, ScreenRotation, ScreenSize, SightingConfig, SightingSystem, DEFAULT_WINDOW_LEN,
};
use ridgeline_harness::{
    push_pair, stability_gauge, JitteredSweep, MotionScript, SensorScene, SteadySweep,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Hold the device still long enough for both windows to settle on the
/// attitude.
fn settle(system: &mut SightingSystem, scene: &SensorScene, azimuth_deg: f64, pitch_rad: f64) {
    for _ in 0..DEFAULT_WINDOW_LEN {
        push_pair(system, scene.synthesize(azimuth_deg, pitch_rad));
    }
}

#[test]
fn test_calibrated_session_places_a_peak() {
    init_logs();
    // The reference scenario: calibrate a 50.2° field of view with two taps,
    // face 90°, and sight a peak at 95° on a 1000x600 screen.
    let scene = SensorScene::default();
    let mut system = SightingSystem::new(SightingConfig::default());

    settle(&mut system, &scene, 115.1, 0.0);
    assert!(system.calibration_tap().is_none());

    settle(&mut system, &scene, 64.9, 0.0);
    let hfov = system.calibration_tap().expect("second tap calibrates");
    assert_relative_eq!(hfov, 50.2, epsilon = 1e-6);

    settle(&mut system, &scene, 90.0, 0.0);
    assert!(system.is_warm());

    let projector = system.projector(ScreenSize::new(1000, 600));
    let peak = Peak::new(1, "Causey Pike", 95.0, 0.0, 5.0, 637.0);
    let placement = projector.project(&peak).expect("in view");

    assert_relative_eq!(placement.ratio, 5.0 / 50.2, epsilon = 1e-6);
    assert!((placement.x_px - 599.6).abs() < 1.0);
    assert_relative_eq!(placement.y_px, 300.0, epsilon = 1e-6);
}

#[test]
fn test_landscape_session_matches_portrait() {
    init_logs();
    // The same physical scene viewed with the device held sideways must
    // produce the same smoothed attitude once the host reports the rotation.
    let portrait = SensorScene::default();
    let landscape = SensorScene {
        rotation: ScreenRotation::Deg90,
        ..SensorScene::default()
    };

    let mut upright = SightingSystem::default();
    settle(&mut upright, &portrait, 271.4, 0.05);

    let mut sideways = SightingSystem::default();
    sideways.set_screen_rotation(ScreenRotation::Deg90);
    settle(&mut sideways, &landscape, 271.4, 0.05);

    assert_relative_eq!(
        sideways.bearing_degrees(),
        upright.bearing_degrees(),
        epsilon = 1e-9
    );
    assert_relative_eq!(
        sideways.pitch_radians(),
        upright.pitch_radians(),
        epsilon = 1e-9
    );
}

#[test]
fn test_declination_yields_true_bearings() {
    init_logs();
    // Same physical field, two hosts: one passes the local declination, one
    // does not. Their bearings differ by exactly the declination.
    let scene = SensorScene {
        declination_deg: 4.0,
        ..SensorScene::default()
    };

    let mut corrected = SightingSystem::default();
    corrected.set_declination_degrees(4.0);
    settle(&mut corrected, &scene, 200.0, 0.0);
    assert_relative_eq!(corrected.bearing_degrees(), 200.0, epsilon = 1e-9);

    let mut magnetic = SightingSystem::default();
    settle(&mut magnetic, &scene, 200.0, 0.0);
    assert_relative_eq!(magnetic.bearing_degrees(), 196.0, epsilon = 1e-9);
}

#[test]
fn test_jittered_hold_reads_steady_on_the_gauge() {
    init_logs();
    let scene = SensorScene::default();
    let sweep = SteadySweep {
        start_deg: 310.0,
        rate_deg_per_step: 0.0,
        pitch_rad: 0.01,
    };
    let mut script = JitteredSweep::new(sweep, 1.5, 0.003, 42);

    let mut system = SightingSystem::default();
    for step in 0..4 * DEFAULT_WINDOW_LEN {
        let attitude = script.attitude(step);
        push_pair(
            &mut system,
            scene.synthesize(attitude.azimuth_deg, attitude.pitch_rad),
        );
    }

    // Smoothing pulls the bearing to the script center; the gauge shows a
    // small but nonzero score for a ±1.5° hand shake.
    let bearing = system.bearing_degrees();
    assert!(
        (bearing - 310.0).abs() < 1.0,
        "smoothed bearing {bearing} strayed from the hold"
    );
    assert!(system.bearing_dispersion() > 0.0, "jitter must register");
    let gauge = stability_gauge(system.bearing_dispersion());
    assert!(gauge < 100, "gauge {gauge} too high for a steady hold");
}

#[test]
fn test_profile_survives_a_restart() {
    init_logs();
    let scene = SensorScene::default();

    // First session: calibrate a 40° field of view and trim the compass.
    let mut first = SightingSystem::default();
    settle(&mut first, &scene, 140.0, 0.0);
    first.calibration_tap();
    settle(&mut first, &scene, 100.0, 0.0);
    first.calibration_tap();
    first.nudge_compass_adjustment(5);

    let stored = serde_json::to_string(&first.calibration_profile()).unwrap();

    // Next session restores the profile before any sensor data arrives.
    let mut second = SightingSystem::default();
    second.restore_profile(serde_json::from_str(&stored).unwrap());

    assert!(second.is_calibrated());
    assert_relative_eq!(second.hfov_degrees(), 40.0, epsilon = 1e-6);
    assert_relative_eq!(second.compass_adjustment_degrees(), 0.5, epsilon = 1e-9);

    // The restored calibration feeds straight into projection.
    settle(&mut second, &scene, 0.0, 0.0);
    let projector = second.projector(ScreenSize::new(800, 480));
    let peak = Peak::new(9, "Latrigg", 10.0, 0.0, 2.4, 368.0);
    let placement = projector.project(&peak).expect("in the calibrated fov");
    assert!(placement.ratio > 0.0);
}
