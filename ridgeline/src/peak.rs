//! Peak records handed over by the host's hill database.

use serde::{Deserialize, Serialize};

/// One named peak near the observer.
///
/// Bearing and elevation are the true direction of the summit from the
/// observer's position; the host computes both from coordinates and altitude
/// before handing the record over, and has already filtered the set down to
/// peaks within its distance limit. Distance and height ride along for label
/// text; the projection itself never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Stable database identifier, echoed back so the host can map a touched
    /// label to its record.
    pub id: u32,
    /// Display name of the summit.
    pub name: String,
    /// True bearing from the observer, degrees clockwise from north.
    pub bearing_deg: f64,
    /// Visual elevation of the summit above the horizontal, radians.
    pub elevation_rad: f64,
    /// Distance from the observer, kilometres.
    pub distance_km: f64,
    /// Summit height above sea level, metres.
    pub height_m: f64,
}

impl Peak {
    /// Build a record in one call.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        bearing_deg: f64,
        elevation_rad: f64,
        distance_km: f64,
        height_m: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            bearing_deg,
            elevation_rad,
            distance_km,
            height_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_json() {
        let peak = Peak::new(31, "Helvellyn", 141.5, 0.021, 14.8, 950.0);

        let json = serde_json::to_string(&peak).unwrap();
        let restored: Peak = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, peak);
    }
}
