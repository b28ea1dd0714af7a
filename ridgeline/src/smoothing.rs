//! Circular-mean smoothing for noisy angle streams.
//!
//! Compass bearings live on a circle: naively averaging 359° and 1° lands near
//! 180° instead of near 0°. [`AngleWindow`] stores each sample as its
//! `(sin, cos)` components and reads the mean off the resultant vector with
//! `atan2`, which handles the 0°/360° seam without special cases. The variance
//! of the stored components doubles as a dispersion score: near zero while the
//! device is held steady, rising as the readings scatter.
//!
//! Two windows are used in practice, one for the compass bearing and one for
//! the tilt. Both live for the process lifetime and are mutated only through
//! [`AngleWindow::add_sample`].

/// Default number of samples in a smoothing window.
pub const DEFAULT_WINDOW_LEN: usize = 10;

/// Normalize an angle in degrees into `[0, 360)`.
///
/// # Examples
/// ```
/// use ridgeline::smoothing::wrap_degrees;
///
/// assert_eq!(wrap_degrees(365.0), 5.0);
/// assert_eq!(wrap_degrees(-5.0), 355.0);
/// assert_eq!(wrap_degrees(720.0), 0.0);
/// ```
pub fn wrap_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Sliding circular-mean filter over a fixed window of angle samples.
///
/// The window is a ring: once full, each new sample overwrites the oldest.
/// The mean is recomputed from the entire window on every insertion, O(N) in
/// the window length.
///
/// Slots start zeroed and take part in the statistics until they have been
/// written once. A zeroed `(sin, cos)` pair is a zero-length vector, so the
/// mean over a partially filled window still equals the circular mean of the
/// samples seen so far; the dispersion, however, reads high until the first
/// full pass. [`AngleWindow::is_warm`] reports when that startup transient has
/// passed, for callers that want to gate on it.
#[derive(Debug, Clone)]
pub struct AngleWindow {
    /// Sine component of each stored sample.
    sines: Vec<f64>,
    /// Cosine component of each stored sample.
    cosines: Vec<f64>,
    /// Next slot to overwrite.
    cursor: usize,
    /// Samples written so far, saturating at the window length.
    written: usize,
    /// Mean angle in radians, refreshed on every insertion.
    mean_rad: f64,
}

impl AngleWindow {
    /// Create a window of `len` slots, all zeroed.
    ///
    /// # Panics
    /// Panics if `len` is less than 2; the dispersion is a sample variance
    /// with denominator `len - 1`.
    pub fn new(len: usize) -> Self {
        assert!(len >= 2, "smoothing window needs at least 2 slots");
        Self {
            sines: vec![0.0; len],
            cosines: vec![0.0; len],
            cursor: 0,
            written: 0,
            mean_rad: 0.0,
        }
    }

    /// Number of slots in the window.
    pub fn capacity(&self) -> usize {
        self.sines.len()
    }

    /// True once every slot has been written at least once.
    pub fn is_warm(&self) -> bool {
        self.written >= self.capacity()
    }

    /// Record one angle sample in radians and refresh the mean.
    pub fn add_sample(&mut self, angle_rad: f64) {
        self.sines[self.cursor] = angle_rad.sin();
        self.cosines[self.cursor] = angle_rad.cos();
        self.cursor = (self.cursor + 1) % self.capacity();
        if self.written < self.capacity() {
            self.written += 1;
        }

        let n = self.capacity() as f64;
        let sin_avg = self.sines.iter().sum::<f64>() / n;
        let cos_avg = self.cosines.iter().sum::<f64>() / n;
        self.mean_rad = sin_avg.atan2(cos_avg);
    }

    /// Smoothed mean angle in radians, in `(-π, π]`.
    ///
    /// This is the raw reading used for tilt: no degree conversion, no offset.
    pub fn mean_radians(&self) -> f64 {
        self.mean_rad
    }

    /// Smoothed mean as a compass bearing in `[0, 360)` degrees.
    pub fn mean_degrees(&self) -> f64 {
        let degrees = self.mean_rad.to_degrees();
        if degrees < 0.0 {
            360.0 + degrees
        } else {
            degrees
        }
    }

    /// Mean bearing with a caller-supplied adjustment added, wrapped back into
    /// `[0, 360)`.
    ///
    /// The adjustment is the user's manual compass trim in degrees and may be
    /// negative.
    pub fn adjusted_degrees(&self, adjustment_deg: f64) -> f64 {
        wrap_degrees(self.mean_degrees() + adjustment_deg)
    }

    /// Spread of the stored samples: sample variance of the cosine components
    /// plus sample variance of the sine components, denominator `N - 1`.
    ///
    /// Steady input drives this toward zero; samples scattered around the
    /// circle push it toward ~1. Callers wanting the display-friendly integer
    /// score scale by 10000 themselves.
    pub fn dispersion(&self) -> f64 {
        component_variance(&self.cosines) + component_variance(&self.sines)
    }
}

fn component_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    sum_sq / (n - 1.0)
}
