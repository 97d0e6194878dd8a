//! Rider spawner: places simulated riders at random points near the path.
//!
//! Each spawn tick picks a uniformly random path point and perturbs latitude
//! and longitude independently by up to [SpawnConfig::offset_deg]. Riders only
//! leave through pickup (or a route change).

use bevy_ecs::prelude::{Commands, Query, Res, ResMut, Resource, With};
use rand::Rng;
use tracing::debug;

use crate::clock::SimulationClock;
use crate::config::{SimRng, SpawnConfig};
use crate::ecs::{GeoPosition, Rider, RiderId};
use crate::geo::GeoPoint;
use crate::route::ResolvedPath;
use crate::telemetry::SimTelemetry;

/// Spawner state: monotonic rider ids survive route changes so an id is never reused.
#[derive(Debug, Default, Resource)]
pub struct RiderSpawner {
    next_id: u64,
    pub spawned_count: u64,
}

impl RiderSpawner {
    pub fn next_id(&mut self) -> RiderId {
        self.next_id += 1;
        RiderId(self.next_id)
    }
}

/// A random point within `offset_deg` of a random path point.
/// Returns `None` for an empty path.
pub fn sample_spawn_point<R: Rng>(rng: &mut R, path: &[GeoPoint], offset_deg: f64) -> Option<GeoPoint> {
    if path.is_empty() {
        return None;
    }
    let base = path[rng.gen_range(0..path.len())];
    let dlat = rng.gen_range(-offset_deg..=offset_deg);
    let dlng = rng.gen_range(-offset_deg..=offset_deg);
    Some(base.offset(dlat, dlng))
}

pub fn rider_spawner_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    path: Res<ResolvedPath>,
    config: Res<SpawnConfig>,
    mut spawner: ResMut<RiderSpawner>,
    mut rng: ResMut<SimRng>,
    riders: Query<(), With<Rider>>,
    telemetry: Option<ResMut<SimTelemetry>>,
) {
    if let Some(max) = config.max_waiting {
        if riders.iter().count() >= max {
            return;
        }
    }
    let Some(position) = sample_spawn_point(&mut rng.0, path.points(), config.offset_deg) else {
        return;
    };

    let id = spawner.next_id();
    spawner.spawned_count += 1;
    commands.spawn((
        Rider {
            id,
            spawned_at: clock.now(),
        },
        GeoPosition(position),
    ));
    if let Some(mut telemetry) = telemetry {
        telemetry.riders_spawned += 1;
    }
    debug!(rider = id.0, lat = position.lat, lng = position.lng, "rider spawned");
}
