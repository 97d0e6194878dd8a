//! Pickup matching: board riders onto nearby vehicles with spare seats.
//!
//! Each tick is one transaction. A plan is computed against a snapshot of
//! vehicles and riders, then every rider removal and capacity increment in the
//! plan is applied together.
//!
//! # Matching order
//!
//! Vehicles are visited in ascending id order, riders in ascending id order.
//! A vehicle at max capacity is skipped. A rider within the radius boards the
//! first visited vehicle that still has a free seat, and is invisible to every
//! later vehicle in the same tick.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use tracing::debug;

use crate::clock::SimulationClock;
use crate::config::PickupConfig;
use crate::ecs::{GeoPosition, Rider, RiderId, Vehicle, VehicleId};
use crate::geo::{distance_meters, GeoPoint};
use crate::telemetry::{PickupRecord, SimTelemetry};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleCandidate {
    pub entity: Entity,
    pub id: VehicleId,
    pub position: GeoPoint,
    pub spare_seats: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitingRider {
    pub entity: Entity,
    pub id: RiderId,
    pub position: GeoPoint,
    pub spawned_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub vehicle: Entity,
    pub vehicle_id: VehicleId,
    pub rider: Entity,
    pub rider_id: RiderId,
    pub distance_m: f64,
    pub rider_spawned_at: u64,
}

/// Plan the pickups for one tick. Pure: the inputs are a snapshot.
pub fn plan_pickups(
    vehicles: &[VehicleCandidate],
    riders: &[WaitingRider],
    radius_m: f64,
) -> Vec<Pickup> {
    let mut vehicles = vehicles.to_vec();
    vehicles.sort_by_key(|v| v.id);
    let mut riders = riders.to_vec();
    riders.sort_by_key(|r| r.id);

    let mut taken = vec![false; riders.len()];
    let mut pickups = Vec::new();

    for vehicle in &vehicles {
        let mut spare = vehicle.spare_seats;
        if spare == 0 {
            continue;
        }
        for (rider, taken) in riders.iter().zip(taken.iter_mut()) {
            if spare == 0 {
                break;
            }
            if *taken {
                continue;
            }
            let distance_m = distance_meters(vehicle.position, rider.position);
            if distance_m <= radius_m {
                *taken = true;
                spare -= 1;
                pickups.push(Pickup {
                    vehicle: vehicle.entity,
                    vehicle_id: vehicle.id,
                    rider: rider.entity,
                    rider_id: rider.id,
                    distance_m,
                    rider_spawned_at: rider.spawned_at,
                });
            }
        }
    }
    pickups
}

pub fn pickup_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    config: Res<PickupConfig>,
    mut vehicles: Query<(Entity, &mut Vehicle, Option<&GeoPosition>)>,
    riders: Query<(Entity, &Rider, &GeoPosition)>,
    mut telemetry: Option<ResMut<SimTelemetry>>,
) {
    let candidates: Vec<VehicleCandidate> = vehicles
        .iter()
        .filter_map(|(entity, vehicle, position)| {
            let position = position?;
            vehicle.has_spare_capacity().then_some(VehicleCandidate {
                entity,
                id: vehicle.id,
                position: position.0,
                spare_seats: vehicle.spare_capacity(),
            })
        })
        .collect();
    if candidates.is_empty() {
        return;
    }
    let waiting: Vec<WaitingRider> = riders
        .iter()
        .map(|(entity, rider, position)| WaitingRider {
            entity,
            id: rider.id,
            position: position.0,
            spawned_at: rider.spawned_at,
        })
        .collect();

    let plan = plan_pickups(&candidates, &waiting, config.radius_m);
    if plan.is_empty() {
        return;
    }

    let now = clock.now();
    for pickup in &plan {
        let Ok((_, mut vehicle, _)) = vehicles.get_mut(pickup.vehicle) else {
            continue;
        };
        if !vehicle.board() {
            continue;
        }
        commands.entity(pickup.rider).despawn();
        if let Some(telemetry) = telemetry.as_mut() {
            telemetry.pickups.push(PickupRecord {
                at: now,
                vehicle: pickup.vehicle_id,
                rider: pickup.rider_id,
                distance_m: pickup.distance_m,
                waited_ms: now.saturating_sub(pickup.rider_spawned_at),
            });
        }
        debug!(
            vehicle = pickup.vehicle_id.0,
            rider = pickup.rider_id.0,
            distance_m = pickup.distance_m,
            "rider picked up"
        );
    }
}
