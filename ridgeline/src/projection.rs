//! Peak bearing and elevation to screen position.
//!
//! The camera view is modelled as a flat angular frustum: a peak's horizontal
//! place on screen is its bearing offset from the view center as a fraction of
//! the horizontal field of view, and its vertical place is the elevation
//! offset as a fraction of the vertical field of view. Pixel coordinates
//! follow screen convention, x growing right and y growing down from the top
//! left.

use serde::{Deserialize, Serialize};

use crate::peak::Peak;

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width_px: u32,
    /// Height in pixels.
    pub height_px: u32,
}

impl ScreenSize {
    /// Screen of `width_px` by `height_px` pixels.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// Where a peak lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPlacement {
    /// Horizontal offset from screen center as a fraction of the screen
    /// width, roughly `[-0.5, 0.5]`; negative is left of center.
    pub ratio: f64,
    /// Horizontal pixel, 0 at the left edge.
    pub x_px: f64,
    /// Vertical pixel, 0 at the top edge.
    pub y_px: f64,
}

/// Projects peaks onto the screen for one smoothed attitude.
///
/// Cheap to build: construct one per redraw from the current smoothed bearing
/// and pitch, then call [`project`](Self::project) once per peak. Pure
/// arithmetic, no state.
#[derive(Debug, Clone, Copy)]
pub struct SkyProjector {
    /// Smoothed device bearing, degrees in `[0, 360)`.
    bearing_deg: f64,
    /// Smoothed device pitch, radians.
    pitch_rad: f64,
    /// Horizontal field of view, degrees.
    hfov_deg: f64,
    /// Vertical field of view, degrees.
    vfov_deg: f64,
    /// Target screen.
    screen: ScreenSize,
}

impl SkyProjector {
    /// Projector for one attitude, field of view and screen.
    pub fn new(
        bearing_deg: f64,
        pitch_rad: f64,
        hfov_deg: f64,
        vfov_deg: f64,
        screen: ScreenSize,
    ) -> Self {
        Self {
            bearing_deg,
            pitch_rad,
            hfov_deg,
            vfov_deg,
            screen,
        }
    }

    /// Screen position of one peak, or `None` when its bearing falls outside
    /// the horizontal field of view.
    pub fn project(&self, peak: &Peak) -> Option<ScreenPlacement> {
        let ratio = self.horizontal_ratio(peak.bearing_deg)?;

        let width = f64::from(self.screen.width_px);
        let height = f64::from(self.screen.height_px);
        let x_px = ratio * width + width / 2.0;

        let vratio_deg = (peak.elevation_rad - self.pitch_rad).to_degrees();
        let y_px = vratio_deg / self.vfov_deg * height + height / 2.0;

        Some(ScreenPlacement { ratio, x_px, y_px })
    }

    /// Project every peak in a slice, pairing each placement with its peak.
    ///
    /// Peaks outside the field of view are dropped; order is preserved.
    pub fn project_all<'a>(&self, peaks: &'a [Peak]) -> Vec<(&'a Peak, ScreenPlacement)> {
        peaks
            .iter()
            .filter_map(|peak| self.project(peak).map(|placement| (peak, placement)))
            .collect()
    }

    /// Fraction of the screen width from center at which a bearing sits, or
    /// `None` when it is outside the field of view.
    ///
    /// The bearing difference is taken three ways, shifting either side by a
    /// full turn, so a view straddling the 0°/360° seam still matches its
    /// peaks. A bearing exactly on the view edge does not count as visible.
    /// When more than one candidate falls inside the field of view, the last
    /// one wins.
    fn horizontal_ratio(&self, peak_bearing_deg: f64) -> Option<f64> {
        let offset = self.bearing_deg - peak_bearing_deg;
        let offset2 = self.bearing_deg - (360.0 + peak_bearing_deg);
        let offset3 = (360.0 + self.bearing_deg) - peak_bearing_deg;

        let mut ratio = None;
        if offset.abs() * 2.0 < self.hfov_deg {
            ratio = Some(-offset / self.hfov_deg);
        }
        if offset2.abs() * 2.0 < self.hfov_deg {
            ratio = Some(-offset2 / self.hfov_deg);
        }
        if offset3.abs() * 2.0 < self.hfov_deg {
            ratio = Some(-offset3 / self.hfov_deg);
        }
        ratio
    }
}
