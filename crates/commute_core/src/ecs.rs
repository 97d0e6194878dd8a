use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Share of occupied seats at which a vehicle is shown as almost full.
pub const ALMOST_FULL_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiderId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    Van,
    Jeep,
    Bus,
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleKind::Van => "Van",
            VehicleKind::Jeep => "Jeep",
            VehicleKind::Bus => "Bus",
        };
        f.write_str(name)
    }
}

/// Display filter over vehicle kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleFilter {
    #[default]
    All,
    Only(VehicleKind),
}

impl VehicleFilter {
    pub fn matches(self, kind: VehicleKind) -> bool {
        match self {
            VehicleFilter::All => true,
            VehicleFilter::Only(wanted) => wanted == kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Active,
    AlmostFull,
    Full,
}

/// A simulated vehicle. `capacity` counts current occupants and never exceeds
/// `max_capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub capacity: u32,
    pub max_capacity: u32,
}

impl Vehicle {
    pub fn has_spare_capacity(&self) -> bool {
        self.capacity < self.max_capacity
    }

    pub fn spare_capacity(&self) -> u32 {
        self.max_capacity.saturating_sub(self.capacity)
    }

    /// Board one rider. Returns `false` and leaves the vehicle untouched when full.
    pub fn board(&mut self) -> bool {
        if !self.has_spare_capacity() {
            return false;
        }
        self.capacity += 1;
        true
    }

    pub fn status(&self) -> VehicleStatus {
        if !self.has_spare_capacity() {
            VehicleStatus::Full
        } else if self.capacity as f64 >= self.max_capacity as f64 * ALMOST_FULL_RATIO {
            VehicleStatus::AlmostFull
        } else {
            VehicleStatus::Active
        }
    }
}

/// A simulated prospective passenger waiting near the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Rider {
    pub id: RiderId,
    /// Simulation time (ms) when the rider appeared.
    pub spawned_at: u64,
}

/// Last computed position. For vehicles it is a cache of cursor + path and is
/// refreshed whenever either changes.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct GeoPosition(pub GeoPoint);

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(capacity: u32, max_capacity: u32) -> Vehicle {
        Vehicle {
            id: VehicleId(1),
            kind: VehicleKind::Jeep,
            capacity,
            max_capacity,
        }
    }

    #[test]
    fn board_stops_at_max_capacity() {
        let mut v = vehicle(0, 2);
        assert!(v.board());
        assert!(v.board());
        assert!(!v.board());
        assert_eq!(v.capacity, 2);
        assert_eq!(v.spare_capacity(), 0);
    }

    #[test]
    fn status_follows_occupancy() {
        assert_eq!(vehicle(0, 10).status(), VehicleStatus::Active);
        assert_eq!(vehicle(7, 10).status(), VehicleStatus::Active);
        assert_eq!(vehicle(8, 10).status(), VehicleStatus::AlmostFull);
        assert_eq!(vehicle(10, 10).status(), VehicleStatus::Full);
    }

    #[test]
    fn filter_matches_kinds() {
        assert!(VehicleFilter::All.matches(VehicleKind::Van));
        assert!(VehicleFilter::Only(VehicleKind::Van).matches(VehicleKind::Van));
        assert!(!VehicleFilter::Only(VehicleKind::Van).matches(VehicleKind::Jeep));
    }
}
