mod support;

use commute_core::animator::PathAnimator;
use commute_core::catalog;
use commute_core::ecs::{Rider, VehicleFilter, VehicleKind};
use commute_core::fleet::initialize_fleet;
use commute_core::location::{FixedGeolocator, LocationStatus};
use commute_core::runner::start_periodic_tasks;
use commute_core::test_helpers::{create_test_world, straight_path, test_config, TEST_ORIGIN};
use support::schedule::ScheduleRunner;
use support::sim::{sim_with, straight_line_sim};

#[test]
fn schedule_runner_drives_a_bare_world() {
    let mut world = create_test_world(straight_path(10));
    initialize_fleet(&mut world);
    start_periodic_tasks(&mut world);

    let mut runner = ScheduleRunner::new();
    assert!(runner.run_one(&mut world));
    // 20 advance + 4 pickup + 1 spawn ticks by 2 s, one already run
    assert_eq!(runner.run_until(&mut world, 2_000), 24);

    assert_eq!(world.query::<&Rider>().iter(&world).count(), 1);
    for animator in world.query::<&PathAnimator>().iter(&world) {
        assert!((animator.cursor - 1.0).abs() < 1e-9);
    }
}

#[test]
fn one_minute_on_a_catalog_route_keeps_invariants() {
    let config = test_config().with_fleet_size(5).with_pickup_radius_m(80.0);
    let mut sim = sim_with(config);
    sim.select_route(catalog::edsa_cubao_makati().expect("route"));
    let path_len = sim.world().resource::<commute_core::route::ResolvedPath>().len();

    let mut last_seats = 0;
    for second in 1..=60u64 {
        sim.run_until(second * 1_000);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.timestamp_ms, second * 1_000);
        for v in &snapshot.vehicles {
            assert!(v.cursor >= 0.0 && v.cursor <= (path_len - 1) as f64);
            assert!(v.capacity <= v.max_capacity);
        }
        // Occupancy only grows: nobody alights.
        assert!(snapshot.counts.occupied_seats >= last_seats);
        last_seats = snapshot.counts.occupied_seats;
    }

    let telemetry = sim.telemetry();
    assert_eq!(telemetry.riders_spawned, 30);
    let waiting = sim.riders().len() as u64;
    let telemetry = sim.telemetry();
    assert_eq!(telemetry.pickups.len() as u64 + waiting, telemetry.riders_spawned);
}

#[test]
fn same_seed_gives_same_session() {
    let run = || {
        let mut sim = straight_line_sim();
        sim.select_route(catalog::commonwealth_ave().expect("route"));
        sim.run_for(30_000);
        sim.snapshot()
    };
    assert_eq!(run(), run());
}

#[test]
fn arrival_board_lists_reachable_vehicles_by_eta() {
    let mut sim = sim_with(test_config().with_fleet_size(6));
    sim.select_route(catalog::taft_ave().expect("route"));
    sim.run_for(3_000);

    let commuter = LocationStatus::locate(&FixedGeolocator(Some(TEST_ORIGIN)));
    let point = commuter.point().expect("known location");
    let board = sim.arrival_board(point, VehicleFilter::All);
    assert!(!board.is_empty());
    for pair in board.windows(2) {
        assert!(pair[0].minutes <= pair[1].minutes);
    }
    for entry in &board {
        assert!(entry.seats_left > 0);
        assert!(entry.label.ends_with("min"));
    }

    let jeeps = sim.arrival_board(point, VehicleFilter::Only(VehicleKind::Jeep));
    assert!(jeeps.iter().all(|e| e.kind == VehicleKind::Jeep));
}
