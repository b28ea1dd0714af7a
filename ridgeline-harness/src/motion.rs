//! Scripted device motions for driving the sighting pipeline.
//!
//! Each script yields the attitude the simulated device should have at a
//! given step; the synthesis module turns those into sensor readings. Scripts
//! are deterministic, the jittered one through a seeded generator, so tests
//! and demo runs reproduce exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Attitude of the simulated device at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    /// True bearing of the view axis, degrees.
    pub azimuth_deg: f64,
    /// Pitch of the view axis, radians, positive below the horizontal.
    pub pitch_rad: f64,
}

/// A motion script the harness steps through.
pub trait MotionScript {
    /// Attitude at the given step, starting from zero.
    fn attitude(&mut self, step: usize) -> Attitude;
}

/// Device held still.
#[derive(Debug, Clone, Copy)]
pub struct Stationary {
    pub azimuth_deg: f64,
    pub pitch_rad: f64,
}

impl MotionScript for Stationary {
    fn attitude(&mut self, _step: usize) -> Attitude {
        Attitude {
            azimuth_deg: self.azimuth_deg,
            pitch_rad: self.pitch_rad,
        }
    }
}

/// Smooth pan at a constant rate, pitch held.
#[derive(Debug, Clone, Copy)]
pub struct SteadySweep {
    /// Bearing at step zero, degrees.
    pub start_deg: f64,
    /// Pan rate, degrees per step; negative pans west.
    pub rate_deg_per_step: f64,
    pub pitch_rad: f64,
}

impl MotionScript for SteadySweep {
    fn attitude(&mut self, step: usize) -> Attitude {
        Attitude {
            azimuth_deg: self.start_deg + self.rate_deg_per_step * step as f64,
            pitch_rad: self.pitch_rad,
        }
    }
}

/// A steady sweep with hand-shake noise on both angles.
#[derive(Debug, Clone)]
pub struct JitteredSweep {
    sweep: SteadySweep,
    bearing_jitter_deg: f64,
    pitch_jitter_rad: f64,
    rng: ChaCha8Rng,
}

impl JitteredSweep {
    /// Jitter the given sweep, uniform within `±bearing_jitter_deg` and
    /// `±pitch_jitter_rad`, reproducible from the seed.
    pub fn new(
        sweep: SteadySweep,
        bearing_jitter_deg: f64,
        pitch_jitter_rad: f64,
        seed: u64,
    ) -> Self {
        Self {
            sweep,
            bearing_jitter_deg,
            pitch_jitter_rad,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl MotionScript for JitteredSweep {
    fn attitude(&mut self, step: usize) -> Attitude {
        let clean = self.sweep.attitude(step);
        Attitude {
            azimuth_deg: clean.azimuth_deg
                + self
                    .rng
                    .gen_range(-self.bearing_jitter_deg..=self.bearing_jitter_deg),
            pitch_rad: clean.pitch_rad
                + self
                    .rng
                    .gen_range(-self.pitch_jitter_rad..=self.pitch_jitter_rad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steady_sweep_advances_linearly() {
        let mut sweep = SteadySweep {
            start_deg: 100.0,
            rate_deg_per_step: -0.5,
            pitch_rad: 0.02,
        };

        assert_relative_eq!(sweep.attitude(0).azimuth_deg, 100.0);
        assert_relative_eq!(sweep.attitude(10).azimuth_deg, 95.0);
        assert_relative_eq!(sweep.attitude(10).pitch_rad, 0.02);
    }

    #[test]
    fn test_jittered_sweep_is_reproducible_and_bounded() {
        let sweep = SteadySweep {
            start_deg: 45.0,
            rate_deg_per_step: 0.0,
            pitch_rad: 0.0,
        };
        let mut first = JitteredSweep::new(sweep, 2.0, 0.01, 7);
        let mut second = JitteredSweep::new(sweep, 2.0, 0.01, 7);

        for step in 0..50 {
            let a = first.attitude(step);
            let b = second.attitude(step);
            assert_relative_eq!(a.azimuth_deg, b.azimuth_deg);
            assert_relative_eq!(a.pitch_rad, b.pitch_rad);
            assert!((a.azimuth_deg - 45.0).abs() <= 2.0);
            assert!(a.pitch_rad.abs() <= 0.01);
        }
    }
}
