use commute_core::config::SimulationConfig;
use commute_core::geo::GeoPoint;
use commute_core::route::Stop;
use commute_core::routing::{RouteResolver, StraightLineResolver};
use commute_core::simulation::Simulation;
use commute_core::test_helpers::test_config;

/// A resolver that never answers, leaving the path pending until delivered.
pub struct PendingResolver;

impl RouteResolver for PendingResolver {
    fn resolve(&self, _stops: &[Stop]) -> Option<Vec<GeoPoint>> {
        None
    }
}

/// Straight-line simulation with the shared deterministic test config.
pub fn straight_line_sim() -> Simulation {
    sim_with(test_config())
}

pub fn sim_with(config: SimulationConfig) -> Simulation {
    Simulation::new(config, Box::new(StraightLineResolver::default())).expect("valid config")
}

pub fn pending_sim() -> Simulation {
    Simulation::new(test_config(), Box::new(PendingResolver)).expect("valid config")
}
