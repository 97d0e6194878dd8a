//! Telemetry and read-only snapshots for the display layer.

use bevy_ecs::prelude::{Resource, World};
use serde::Serialize;

use crate::animator::Direction;
use crate::ecs::{GeoPosition, Rider, RiderId, VehicleFilter, VehicleId, VehicleKind, VehicleStatus};
use crate::fleet::filter_by_type;
use crate::geo::{BoundingBox, GeoPoint};
use crate::route::{ResolvedPath, RouteKey};

/// One pickup, recorded when a rider boards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupRecord {
    pub at: u64,
    pub vehicle: VehicleId,
    pub rider: RiderId,
    pub distance_m: f64,
    /// Simulation time the rider spent waiting.
    pub waited_ms: u64,
}

/// Running counters for the session. Reset only when the session ends.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub pickups: Vec<PickupRecord>,
    pub riders_spawned: u64,
    pub route_changes: u64,
    pub stale_deliveries: u64,
    /// Riders dropped because the route changed before pickup.
    pub riders_discarded: u64,
}

impl SimTelemetry {
    pub fn pickups_by(&self, vehicle: VehicleId) -> usize {
        self.pickups.iter().filter(|p| p.vehicle == vehicle).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub capacity: u32,
    pub max_capacity: u32,
    pub status: VehicleStatus,
    pub cursor: f64,
    pub direction: Direction,
    /// `None` while the path is unresolved.
    pub position: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiderSnapshot {
    pub id: RiderId,
    pub position: GeoPoint,
    pub spawned_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimCounts {
    pub vehicles_active: usize,
    pub vehicles_almost_full: usize,
    pub vehicles_full: usize,
    pub occupied_seats: u32,
    pub total_seats: u32,
    pub riders_waiting: usize,
}

impl SimCounts {
    pub fn add_vehicle(&mut self, vehicle: &VehicleSnapshot) {
        match vehicle.status {
            VehicleStatus::Active => self.vehicles_active += 1,
            VehicleStatus::AlmostFull => self.vehicles_almost_full += 1,
            VehicleStatus::Full => self.vehicles_full += 1,
        }
        self.occupied_seats += vehicle.capacity;
        self.total_seats += vehicle.max_capacity;
    }
}

/// Snapshot of simulation state at a specific timestamp (simulation ms).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSnapshot {
    pub timestamp_ms: u64,
    pub route_key: Option<RouteKey>,
    pub counts: SimCounts,
    pub vehicles: Vec<VehicleSnapshot>,
    pub riders: Vec<RiderSnapshot>,
    pub extent: Option<BoundingBox>,
}

/// Waiting riders ordered by id.
pub fn rider_snapshots(world: &mut World) -> Vec<RiderSnapshot> {
    let mut query = world.query::<(&Rider, &GeoPosition)>();
    let mut riders: Vec<RiderSnapshot> = query
        .iter(world)
        .map(|(rider, position)| RiderSnapshot {
            id: rider.id,
            position: position.0,
            spawned_at: rider.spawned_at,
        })
        .collect();
    riders.sort_by_key(|r| r.id);
    riders
}

pub fn capture_snapshot(world: &mut World, timestamp_ms: u64) -> SimSnapshot {
    let vehicles = filter_by_type(world, VehicleFilter::All);
    let riders = rider_snapshots(world);
    let mut counts = SimCounts {
        riders_waiting: riders.len(),
        ..SimCounts::default()
    };
    for vehicle in &vehicles {
        counts.add_vehicle(vehicle);
    }
    let (route_key, extent) = world
        .get_resource::<ResolvedPath>()
        .map(|path| (path.route_key.clone(), path.extent()))
        .unwrap_or((None, None));
    SimSnapshot {
        timestamp_ms,
        route_key,
        counts,
        vehicles,
        riders,
        extent,
    }
}
