pub mod animator;
pub mod arrivals;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod ecs;
pub mod error;
pub mod fleet;
pub mod geo;
pub mod location;
pub mod pickup;
pub mod route;
pub mod routing;
pub mod runner;
pub mod simulation;
pub mod spawner;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
