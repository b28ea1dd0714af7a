//! Ridgeline harness: a host stand-in for exercising the sighting core.
//!
//! Plays the role the Android application fills in production. The synth
//! module inverts the fusion pipeline to produce raw sensor readings for a
//! wanted attitude, the motion module scripts how that attitude evolves, and
//! the `sighting_demo` binary runs a whole calibration-and-sighting session
//! against them.

pub mod motion;
pub mod synth;

pub use motion::{Attitude, JitteredSweep, MotionScript, Stationary, SteadySweep};
pub use synth::{FieldModel, SensorPair, SensorScene, STANDARD_GRAVITY};

use ridgeline::SightingSystem;

/// Integer stability score the original display shows: dispersion scaled by
/// 10000 and truncated.
pub fn stability_gauge(dispersion: f64) -> i64 {
    (dispersion * 10000.0) as i64
}

/// Push one synthesized sensor pair into the system, accelerometer first,
/// the order the platform interleaves them in practice.
pub fn push_pair(system: &mut SightingSystem, pair: SensorPair) {
    system.push_accelerometer(pair.accelerometer);
    system.push_magnetometer(pair.magnetometer);
}
