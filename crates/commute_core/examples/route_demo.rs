//! Run every catalog route for a simulated minute and log what happens.
//!
//! Run with: cargo run -p commute_core --example route_demo

use commute_core::catalog;
use commute_core::config::SimulationConfig;
use commute_core::ecs::VehicleFilter;
use commute_core::location::{FixedGeolocator, Geolocator, LocationStatus};
use commute_core::simulation::Simulation;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt().init();

    let routes = match catalog::all_routes() {
        Ok(routes) => routes,
        Err(err) => {
            error!(%err, "catalog is invalid");
            return;
        }
    };
    let config = SimulationConfig::default().with_seed(123).with_fleet_size(4);
    let mut sim = match Simulation::with_default_resolver(config) {
        Ok(sim) => sim,
        Err(err) => {
            error!(%err, "invalid configuration");
            return;
        }
    };

    for route in routes {
        let commuter = route.origin().position;
        let geolocator: Box<dyn Geolocator> = Box::new(FixedGeolocator(Some(commuter)));
        sim.select_route(route);
        sim.run_for(60_000);

        let snapshot = sim.snapshot();
        info!(
            route = ?snapshot.route_key,
            t_ms = snapshot.timestamp_ms,
            waiting = snapshot.counts.riders_waiting,
            seats = snapshot.counts.occupied_seats,
            total_seats = snapshot.counts.total_seats,
            full = snapshot.counts.vehicles_full,
            "route finished"
        );

        let status = LocationStatus::locate(geolocator.as_ref());
        info!(location = %status, "commuter");
        if let Some(point) = status.point() {
            for arrival in sim.arrival_board(point, VehicleFilter::All) {
                info!(
                    vehicle = arrival.vehicle.0,
                    kind = %arrival.kind,
                    distance_m = arrival.distance_m.round(),
                    eta = %arrival.label,
                    seats_left = arrival.seats_left,
                    "arrival"
                );
            }
        }
    }

    let telemetry = sim.telemetry();
    println!("--- Route demo (seed 123, 4 vehicles, 60 s per route) ---");
    println!("Riders spawned: {}", telemetry.riders_spawned);
    println!("Pickups: {}", telemetry.pickups.len());
    println!("Riders discarded on route change: {}", telemetry.riders_discarded);
}
