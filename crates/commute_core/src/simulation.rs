//! Per-session simulation context.
//!
//! A [Simulation] owns one ECS world (vehicles, riders, resolved path, clock,
//! RNG, telemetry) and the schedule that drives it. Hosts select a route,
//! optionally deliver a resolved path later, and advance simulated time; every
//! read goes through snapshots.

use bevy_ecs::prelude::{Entity, Schedule, With, World};
use tracing::{debug, info, warn};

use crate::arrivals::{arrival_board, ArrivalEstimate};
use crate::clock::SimulationClock;
use crate::config::{SimRng, SimulationConfig, TickSchedule};
use crate::ecs::{GeoPosition, Rider, Vehicle, VehicleFilter, VehicleId};
use crate::error::ConfigError;
use crate::fleet::{filter_by_type, initialize_fleet, retarget_fleet};
use crate::geo::{estimate_arrival_label, BoundingBox, GeoPoint};
use crate::route::{ResolvedPath, Route};
use crate::routing::{
    CachedRouteResolver, RouteResolver, RouteResolverResource, StraightLineResolver,
    DEFAULT_ROUTE_CACHE_CAPACITY,
};
use crate::runner::{run_next_event, run_until, simulation_schedule, start_periodic_tasks};
use crate::spawner::RiderSpawner;
use crate::telemetry::{
    capture_snapshot, rider_snapshots, RiderSnapshot, SimSnapshot, SimTelemetry, VehicleSnapshot,
};

/// Identifies one route selection. A path delivered with a ticket from an
/// older selection is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    pub generation: u64,
    /// Whether the resolver produced a drivable path synchronously.
    pub resolved: bool,
}

/// Insert every resource a session needs. No route is active yet.
pub fn build_world(world: &mut World, config: &SimulationConfig, resolver: Box<dyn RouteResolver>) {
    world.insert_resource(SimulationClock::default());
    world.insert_resource(TickSchedule(config.periods));
    world.insert_resource(SimRng::seeded(config.seed));
    world.insert_resource(config.motion);
    world.insert_resource(config.fleet.clone());
    world.insert_resource(config.spawn);
    world.insert_resource(config.pickup);
    world.insert_resource(ResolvedPath::default());
    world.insert_resource(RiderSpawner::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(RouteResolverResource(resolver));
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
    route: Option<Route>,
}

impl Simulation {
    pub fn new(config: SimulationConfig, resolver: Box<dyn RouteResolver>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new();
        build_world(&mut world, &config, resolver);
        debug!(seed = config.seed, fleet = config.fleet.size, "simulation created");
        Ok(Self {
            world,
            schedule: simulation_schedule(),
            route: None,
        })
    }

    /// Straight-line paths behind an LRU cache.
    pub fn with_default_resolver(config: SimulationConfig) -> Result<Self, ConfigError> {
        let resolver = CachedRouteResolver::new(
            Box::new(StraightLineResolver::default()),
            DEFAULT_ROUTE_CACHE_CAPACITY,
        );
        Self::new(config, Box::new(resolver))
    }

    /// Make `route` the active route.
    ///
    /// Cancels every pending event, discards waiting riders, asks the resolver
    /// for a path and recreates the fleet at the start of it. If the resolver
    /// returns nothing the path stays pending and vehicles wait without a
    /// position until [Simulation::deliver_path] supplies one.
    pub fn select_route(&mut self, route: Route) -> ResolutionTicket {
        self.world.resource_mut::<SimulationClock>().begin_epoch();

        let riders: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<Rider>>()
            .iter(&self.world)
            .collect();
        for entity in &riders {
            self.world.despawn(*entity);
        }

        let generation = self
            .world
            .resource_mut::<ResolvedPath>()
            .begin(route.key().clone());
        let points = self.world.resource::<RouteResolverResource>().0.resolve(route.stops());
        let resolved = match points {
            Some(points) => self.world.resource_mut::<ResolvedPath>().install(points),
            None => false,
        };

        initialize_fleet(&mut self.world);
        start_periodic_tasks(&mut self.world);

        {
            let mut telemetry = self.world.resource_mut::<SimTelemetry>();
            telemetry.route_changes += 1;
            telemetry.riders_discarded += riders.len() as u64;
        }
        info!(
            route = %route.key(),
            generation,
            resolved,
            path_points = self.world.resource::<ResolvedPath>().len(),
            riders_discarded = riders.len(),
            "route selected"
        );
        self.route = Some(route);
        ResolutionTicket { generation, resolved }
    }

    /// Install a path resolved outside the simulation. Returns `false` when the
    /// ticket is stale or the path has fewer than two points; a short path
    /// leaves the route pending.
    pub fn deliver_path(&mut self, ticket: ResolutionTicket, points: Vec<GeoPoint>) -> bool {
        let current = self.world.resource::<ResolvedPath>().generation;
        if ticket.generation != current {
            warn!(
                ticket = ticket.generation,
                current, "discarding path for a superseded route selection"
            );
            self.world.resource_mut::<SimTelemetry>().stale_deliveries += 1;
            return false;
        }

        let count = points.len();
        let installed = self.world.resource_mut::<ResolvedPath>().install(points);
        retarget_fleet(&mut self.world);
        if installed {
            info!(generation = current, path_points = count, "path delivered");
        } else {
            warn!(generation = current, path_points = count, "delivered path is not drivable");
        }
        installed
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Process the next queued event. Returns `false` when nothing is queued
    /// (no route selected yet).
    pub fn step(&mut self) -> bool {
        run_next_event(&mut self.world, &mut self.schedule)
    }

    /// Process every event up to `end_ms` and move the clock there.
    pub fn run_until(&mut self, end_ms: u64) -> usize {
        run_until(&mut self.world, &mut self.schedule, end_ms)
    }

    pub fn run_for(&mut self, duration_ms: u64) -> usize {
        let end_ms = self.now().saturating_add(duration_ms);
        self.run_until(end_ms)
    }

    pub fn now(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn snapshot(&mut self) -> SimSnapshot {
        let now = self.now();
        capture_snapshot(&mut self.world, now)
    }

    pub fn vehicles(&mut self, filter: VehicleFilter) -> Vec<VehicleSnapshot> {
        filter_by_type(&mut self.world, filter)
    }

    pub fn riders(&mut self) -> Vec<RiderSnapshot> {
        rider_snapshots(&mut self.world)
    }

    /// Bounding box of the resolved path, for fitting a viewport.
    pub fn extent(&self) -> Option<BoundingBox> {
        self.world.resource::<ResolvedPath>().extent()
    }

    /// ETA label from a vehicle's current position to `target`. `None` for an
    /// unknown vehicle or one without a position yet.
    pub fn eta_label(&mut self, vehicle: VehicleId, target: GeoPoint) -> Option<String> {
        let position = self
            .world
            .query::<(&Vehicle, &GeoPosition)>()
            .iter(&self.world)
            .find(|(v, _)| v.id == vehicle)
            .map(|(_, position)| position.0)?;
        Some(estimate_arrival_label(position, target))
    }

    pub fn arrival_board(&mut self, commuter: GeoPoint, filter: VehicleFilter) -> Vec<ArrivalEstimate> {
        let vehicles = self.vehicles(filter);
        arrival_board(&vehicles, commuter, filter)
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.world.resource::<SimTelemetry>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
