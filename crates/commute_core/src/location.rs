//! Optional device geolocation. Used for display only; the simulation never
//! depends on it.

use std::fmt;

use serde::Serialize;

use crate::geo::GeoPoint;

/// Source of the commuter's current position.
pub trait Geolocator: Send + Sync {
    /// `None` when the position is unavailable (denied, no fix, no sensor).
    fn current_position(&self) -> Option<GeoPoint>;
}

/// A geolocator that always reports the same answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocator(pub Option<GeoPoint>);

impl Geolocator for FixedGeolocator {
    fn current_position(&self) -> Option<GeoPoint> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LocationStatus {
    Known(GeoPoint),
    Unknown,
}

impl LocationStatus {
    pub fn locate(geolocator: &dyn Geolocator) -> Self {
        geolocator
            .current_position()
            .map_or(LocationStatus::Unknown, LocationStatus::Known)
    }

    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            LocationStatus::Known(point) => Some(*point),
            LocationStatus::Unknown => None,
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationStatus::Known(p) => write!(f, "{:.6}, {:.6}", p.lat, p.lng),
            LocationStatus::Unknown => f.write_str("unknown"),
        }
    }
}
