//! Vehicle fleet: creation on route change and per-tick path advance.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, With, World};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::animator::{Direction, PathAnimator};
use crate::config::{FleetConfig, MotionConfig, SimRng, StartCursor, StartDirection};
use crate::ecs::{GeoPosition, Vehicle, VehicleFilter, VehicleId, VehicleKind};
use crate::route::ResolvedPath;
use crate::telemetry::VehicleSnapshot;

/// Draw one vehicle and its starting motion state. `path_len` is zero while
/// the path is pending.
pub fn draw_vehicle<R: Rng>(
    rng: &mut R,
    config: &FleetConfig,
    id: VehicleId,
    path_len: usize,
) -> (Vehicle, PathAnimator) {
    let kind = config
        .kinds
        .choose(rng)
        .copied()
        .unwrap_or(VehicleKind::Van);
    let policy = config.capacity;
    let max_capacity = rng.gen_range(policy.min_max_capacity..=policy.max_max_capacity);
    let capacity = rng.gen_range(0..=policy.max_initial_occupancy.min(max_capacity));

    let cursor = match config.start_cursor {
        StartCursor::Random if path_len >= 2 => rng.gen_range(0.0..=(path_len - 1) as f64),
        _ => 0.0,
    };
    let direction = match config.start_direction {
        StartDirection::Fixed(direction) => direction,
        StartDirection::Random => {
            if rng.gen_bool(0.5) {
                Direction::Forward
            } else {
                Direction::Backward
            }
        }
    };

    (
        Vehicle {
            id,
            kind,
            capacity,
            max_capacity,
        },
        PathAnimator::new(cursor, direction),
    )
}

/// Replace the whole fleet with freshly drawn vehicles (ids `1..=size`).
/// Occupancy and motion state never carry over.
pub fn initialize_fleet(world: &mut World) {
    let existing: Vec<Entity> = world
        .query_filtered::<Entity, With<Vehicle>>()
        .iter(world)
        .collect();
    for entity in existing {
        world.despawn(entity);
    }

    let config = world.resource::<FleetConfig>().clone();
    let path = world.resource::<ResolvedPath>().points().to_vec();
    let drawn: Vec<(Vehicle, PathAnimator)> = {
        let mut rng = world.resource_mut::<SimRng>();
        (1..=config.size)
            .map(|i| draw_vehicle(&mut rng.0, &config, VehicleId(i as u32), path.len()))
            .collect()
    };

    for (vehicle, animator) in drawn {
        let position = animator.position(&path);
        let mut entity = world.spawn((vehicle, animator));
        if let Some(point) = position {
            entity.insert(GeoPosition(point));
        }
    }
    info!(vehicles = config.size, path_points = path.len(), "fleet initialized");
}

/// Clamp every cursor into the current path and refresh cached positions.
/// Called whenever the path is replaced.
pub fn retarget_fleet(world: &mut World) {
    let path = world.resource::<ResolvedPath>().points().to_vec();
    let mut query = world.query_filtered::<(Entity, &mut PathAnimator), With<Vehicle>>();
    let updates: Vec<(Entity, Option<crate::geo::GeoPoint>)> = query
        .iter_mut(world)
        .map(|(entity, mut animator)| {
            animator.clamp_to_path(path.len());
            (entity, animator.position(&path))
        })
        .collect();

    for (entity, position) in updates {
        let mut entity = world.entity_mut(entity);
        match position {
            Some(point) => {
                entity.insert(GeoPosition(point));
            }
            None => {
                entity.remove::<GeoPosition>();
            }
        }
    }
}

/// Advance every vehicle along the resolved path by the configured step.
pub fn advance_fleet_system(
    mut commands: Commands,
    path: Res<ResolvedPath>,
    motion: Res<MotionConfig>,
    mut vehicles: Query<(Entity, &mut PathAnimator, Option<&mut GeoPosition>), With<Vehicle>>,
) {
    if path.len() < 2 {
        return;
    }
    for (entity, mut animator, position) in vehicles.iter_mut() {
        let Some(point) = animator.advance(path.points(), motion.step_size) else {
            continue;
        };
        match position {
            Some(mut position) => position.0 = point,
            None => {
                commands.entity(entity).insert(GeoPosition(point));
            }
        }
    }
    debug!(step = motion.step_size, "fleet advanced");
}

/// Vehicles matching `filter`, ordered by id. Pure read.
pub fn filter_by_type(world: &mut World, filter: VehicleFilter) -> Vec<VehicleSnapshot> {
    let mut query = world.query::<(&Vehicle, &PathAnimator, Option<&GeoPosition>)>();
    let mut vehicles: Vec<VehicleSnapshot> = query
        .iter(world)
        .filter(|(vehicle, _, _)| filter.matches(vehicle.kind))
        .map(|(vehicle, animator, position)| VehicleSnapshot {
            id: vehicle.id,
            kind: vehicle.kind,
            capacity: vehicle.capacity,
            max_capacity: vehicle.max_capacity,
            status: vehicle.status(),
            cursor: animator.cursor,
            direction: animator.direction,
            position: position.map(|p| p.0),
        })
        .collect();
    vehicles.sort_by_key(|v| v.id);
    vehicles
}
