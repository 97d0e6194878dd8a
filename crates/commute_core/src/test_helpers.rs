//! Test helpers for common test setup and utilities.
//!
//! Shared fixtures so unit tests, integration tests and benches agree on the
//! same geography.

use bevy_ecs::prelude::{Entity, World};

use crate::animator::{Direction, PathAnimator};
use crate::config::{SimulationConfig, StartCursor, StartDirection};
use crate::ecs::{GeoPosition, Rider, RiderId, Vehicle, VehicleId, VehicleKind};
use crate::geo::GeoPoint;
use crate::route::{ResolvedPath, Route, RouteKey, Stop};
use crate::routing::StraightLineResolver;
use crate::simulation::build_world;

/// Taft Avenue at Vito Cruz.
pub const TEST_ORIGIN: GeoPoint = GeoPoint::new(14.564098, 120.994498);
/// Quiapo.
pub const TEST_DESTINATION: GeoPoint = GeoPoint::new(14.607594, 120.990500);

/// The two-point path used by most motion tests.
pub fn two_point_path() -> Vec<GeoPoint> {
    vec![TEST_ORIGIN, TEST_DESTINATION]
}

/// A straight north-south path of `len` points spaced roughly 110 m apart.
pub fn straight_path(len: usize) -> Vec<GeoPoint> {
    (0..len)
        .map(|i| TEST_ORIGIN.offset(i as f64 * 0.001, 0.0))
        .collect()
}

/// A two-stop route between the test origin and destination.
///
/// # Panics
///
/// Never in practice: the route always has two stops.
pub fn test_route() -> Route {
    Route::new(
        "Test Route",
        vec![
            Stop::new("Origin", TEST_ORIGIN),
            Stop::new("Destination", TEST_DESTINATION),
        ],
    )
    .expect("two stops form a valid route")
}

/// Deterministic config: fixed seed, fixed forward start direction.
pub fn test_config() -> SimulationConfig {
    SimulationConfig::default()
        .with_seed(7)
        .with_start(StartCursor::Origin, StartDirection::Fixed(Direction::Forward))
}

/// Create a world with every session resource and `path` already installed.
///
/// No vehicles are spawned; use [spawn_vehicle] or
/// [crate::fleet::initialize_fleet].
pub fn create_test_world(path: Vec<GeoPoint>) -> World {
    let mut world = World::new();
    build_world(
        &mut world,
        &test_config(),
        Box::new(StraightLineResolver::default()),
    );
    {
        let mut resolved = world.resource_mut::<ResolvedPath>();
        resolved.begin(RouteKey::from("Test Route"));
        resolved.install(path);
    }
    world
}

/// Spawn a vehicle parked at `position` with a forward animator at cursor 0.
pub fn spawn_vehicle(
    world: &mut World,
    id: u32,
    position: GeoPoint,
    capacity: u32,
    max_capacity: u32,
) -> Entity {
    world
        .spawn((
            Vehicle {
                id: VehicleId(id),
                kind: VehicleKind::Jeep,
                capacity,
                max_capacity,
            },
            PathAnimator::new(0.0, Direction::Forward),
            GeoPosition(position),
        ))
        .id()
}

/// Spawn a waiting rider at `position`.
pub fn spawn_rider(world: &mut World, id: u64, position: GeoPoint) -> Entity {
    world
        .spawn((
            Rider {
                id: RiderId(id),
                spawned_at: 0,
            },
            GeoPosition(position),
        ))
        .id()
}

/// A point `meters` due north of `from` (spherical approximation).
pub fn point_north_of(from: GeoPoint, meters: f64) -> GeoPoint {
    let dlat = (meters / crate::geo::EARTH_RADIUS_M).to_degrees();
    from.offset(dlat, 0.0)
}
