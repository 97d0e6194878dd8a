//! Geographic math: haversine distances, arrival estimates and path extents.
//!
//! All coordinates are decimal degrees. Interpolation happens in degree space,
//! which is accurate enough at city scale.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Assumed average city-traffic speed for arrival estimates.
/// A policy constant, not a measured value.
pub const AVERAGE_SPEED_KMH: f64 = 25.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Shift by raw degree offsets on each axis.
    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self::new(self.lat + dlat, self.lng + dlng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Great-circle distance in meters. NaN inputs propagate.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lng.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Minutes to cover the straight-line distance at [AVERAGE_SPEED_KMH].
pub fn estimate_arrival_minutes(current: GeoPoint, target: GeoPoint) -> f64 {
    let meters_per_minute = AVERAGE_SPEED_KMH * 1000.0 / 60.0;
    distance_meters(current, target) / meters_per_minute
}

/// Human-readable ETA: `"< 1 min"` below one minute, otherwise rounded minutes.
pub fn estimate_arrival_label(current: GeoPoint, target: GeoPoint) -> String {
    format_arrival_minutes(estimate_arrival_minutes(current, target))
}

pub(crate) fn format_arrival_minutes(minutes: f64) -> String {
    if minutes < 1.0 {
        "< 1 min".to_string()
    } else {
        format!("{} min", minutes.round() as u64)
    }
}

/// Linear interpolation of latitude and longitude independently.
pub fn lerp(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint::new(a.lat + (b.lat - a.lat) * t, a.lng + (b.lng - a.lng) * t)
}

/// Axis-aligned extent of a set of points, used for viewport fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            lat_min: first.lat,
            lat_max: first.lat,
            lng_min: first.lng,
            lng_max: first.lng,
        };
        Some(points[1..].iter().fold(init, |bb, p| Self {
            lat_min: bb.lat_min.min(p.lat),
            lat_max: bb.lat_max.max(p.lat),
            lng_min: bb.lng_min.min(p.lng),
            lng_max: bb.lng_max.max(p.lng),
        }))
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lat_min + self.lat_max) * 0.5,
            (self.lng_min + self.lng_max) * 0.5,
        )
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lng >= self.lng_min
            && point.lng <= self.lng_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAFT: GeoPoint = GeoPoint::new(14.564098, 120.994498);
    const QUIAPO: GeoPoint = GeoPoint::new(14.607594, 120.990500);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_meters(TAFT, TAFT), 0.0);
        assert_eq!(distance_meters(QUIAPO, QUIAPO), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(distance_meters(TAFT, QUIAPO), distance_meters(QUIAPO, TAFT));
    }

    #[test]
    fn distance_matches_known_value() {
        // ~4.85 km along the meridian.
        let d = distance_meters(TAFT, QUIAPO);
        assert!((d - 4_857.0).abs() < 25.0, "unexpected distance {d}");
    }

    #[test]
    fn nan_propagates() {
        let d = distance_meters(GeoPoint::new(f64::NAN, 0.0), TAFT);
        assert!(d.is_nan());
    }

    #[test]
    fn arrival_label_under_one_minute() {
        // 100 m at 25 km/h is ~14 s.
        let near = TAFT.offset(0.0009, 0.0);
        assert_eq!(estimate_arrival_label(TAFT, near), "< 1 min");
    }

    #[test]
    fn arrival_label_rounds_minutes() {
        // ~4.86 km at 25 km/h is ~11.7 min.
        assert_eq!(estimate_arrival_label(TAFT, QUIAPO), "12 min");
        assert_eq!(format_arrival_minutes(1.0), "1 min");
        assert_eq!(format_arrival_minutes(2.49), "2 min");
    }

    #[test]
    fn lerp_halfway() {
        let mid = lerp(TAFT, QUIAPO, 0.5);
        assert!((mid.lat - 14.585846).abs() < 1e-9);
        assert!((mid.lng - 120.992499).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_covers_points() {
        assert!(BoundingBox::from_points(&[]).is_none());
        let bb = BoundingBox::from_points(&[TAFT, QUIAPO]).expect("extent");
        assert_eq!(bb.lat_min, TAFT.lat);
        assert_eq!(bb.lat_max, QUIAPO.lat);
        assert_eq!(bb.lng_min, QUIAPO.lng);
        assert_eq!(bb.lng_max, TAFT.lng);
        assert!(bb.contains(bb.center()));
    }
}
