use thiserror::Error;

/// Rejected configuration. Raised at construction time so no route, vehicle or
/// simulation ever exists in a state that would produce undefined motion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Route {key} needs at least 2 stops, got {count}")]
    TooFewStops { key: String, count: usize },
    #[error("Fleet size must be at least 1")]
    EmptyFleet,
    #[error("Fleet needs at least one vehicle kind")]
    NoVehicleKinds,
    #[error("Max capacity must be within 1..={limit}, got {value}")]
    MaxCapacityOutOfRange { value: u32, limit: u32 },
    #[error("Capacity bounds are inverted: min {min} > max {max}")]
    InvertedCapacityBounds { min: u32, max: u32 },
    #[error("Initial occupancy {occupancy} exceeds the smallest max capacity {max_capacity}")]
    InitialOccupancyTooHigh { occupancy: u32, max_capacity: u32 },
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("Tick period for {task} must be non-zero")]
    ZeroPeriod { task: &'static str },
}
