mod support;

use commute_core::animator::Direction;
use commute_core::catalog;
use commute_core::config::{StartCursor, StartDirection};
use commute_core::ecs::VehicleFilter;
use commute_core::geo::GeoPoint;
use commute_core::test_helpers::{test_config, test_route};
use support::sim::{pending_sim, sim_with, straight_line_sim};

#[test]
fn route_change_resets_fleet_and_clears_riders() {
    // A tiny pickup radius keeps every spawned rider waiting.
    let mut sim = sim_with(test_config().with_pickup_radius_m(0.001));
    sim.select_route(test_route());
    sim.run_for(10_000);
    assert_eq!(sim.riders().len(), 5);
    assert!(sim
        .vehicles(VehicleFilter::All)
        .iter()
        .any(|v| v.cursor > 0.0));

    let route = catalog::katipunan_ave().expect("route");
    let origin = route.origin().position;
    sim.select_route(route);

    assert!(sim.riders().is_empty());
    let vehicles = sim.vehicles(VehicleFilter::All);
    let ids: Vec<u32> = vehicles.iter().map(|v| v.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    for vehicle in &vehicles {
        assert_eq!(vehicle.cursor, 0.0);
        assert_eq!(vehicle.direction, Direction::Forward);
        assert_eq!(vehicle.position, Some(origin));
    }
    assert_eq!(sim.telemetry().route_changes, 2);
    assert_eq!(sim.telemetry().riders_discarded, 5);
}

#[test]
fn route_change_cancels_pending_ticks() {
    let mut sim = straight_line_sim();
    sim.select_route(test_route());
    sim.run_for(250);
    let spawned = sim.telemetry().riders_spawned;

    sim.select_route(test_route());
    let now = sim.now();
    // Fresh epoch: the first spawn tick is a full period after the change.
    sim.run_until(now + 1_999);
    assert_eq!(sim.telemetry().riders_spawned, spawned);
    sim.run_until(now + 2_000);
    assert_eq!(sim.telemetry().riders_spawned, spawned + 1);
}

#[test]
fn pending_path_keeps_fleet_parked_until_delivery() {
    let mut sim = pending_sim();
    let route = test_route();
    let points: Vec<GeoPoint> = route.stops().iter().map(|s| s.position).collect();
    let ticket = sim.select_route(route);
    assert!(!ticket.resolved);

    sim.run_for(5_000);
    assert!(sim.riders().is_empty());
    assert!(sim.snapshot().extent.is_none());
    for vehicle in sim.vehicles(VehicleFilter::All) {
        assert_eq!(vehicle.cursor, 0.0);
        assert!(vehicle.position.is_none());
    }

    assert!(sim.deliver_path(ticket, points));
    sim.run_for(5_000);
    assert!(sim.telemetry().riders_spawned > 0);
    assert!(sim
        .vehicles(VehicleFilter::All)
        .iter()
        .all(|v| v.position.is_some() && v.cursor > 0.0));
}

#[test]
fn late_delivery_for_previous_route_is_ignored() {
    let mut sim = pending_sim();
    let stale = sim.select_route(test_route());
    let current = sim.select_route(catalog::taft_ave().expect("route"));

    let points = vec![GeoPoint::new(14.0, 121.0), GeoPoint::new(14.1, 121.0)];
    assert!(!sim.deliver_path(stale, points.clone()));
    assert!(sim.extent().is_none());
    assert_eq!(sim.telemetry().stale_deliveries, 1);

    assert!(sim.deliver_path(current, points));
    assert!(sim.extent().is_some());
}

#[test]
fn undrivable_delivery_leaves_route_pending() {
    let mut sim = pending_sim();
    let ticket = sim.select_route(test_route());
    assert!(!sim.deliver_path(ticket, vec![GeoPoint::new(14.0, 121.0)]));
    assert!(sim.extent().is_none());
    assert!(sim
        .vehicles(VehicleFilter::All)
        .iter()
        .all(|v| v.position.is_none()));
}

#[test]
fn random_start_spreads_fleet_along_path() {
    let config = test_config()
        .with_fleet_size(8)
        .with_start(StartCursor::Random, StartDirection::Random);
    let mut sim = sim_with(config);
    sim.select_route(catalog::edsa_cubao_makati().expect("route"));
    let vehicles = sim.vehicles(VehicleFilter::All);
    assert!(vehicles.iter().any(|v| v.cursor > 0.0));
    assert!(vehicles.iter().all(|v| v.position.is_some()));
}
