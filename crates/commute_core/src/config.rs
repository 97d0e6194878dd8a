//! Simulation configuration: tick periods, fleet policy, spawn and pickup policy.
//!
//! Every value here is a named policy constant with a default; none is read
//! from files. [SimulationConfig::validate] rejects combinations that would
//! produce undefined motion.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::animator::Direction;
use crate::ecs::VehicleKind;
use crate::error::ConfigError;

/// Path advance period (simulation ms).
pub const DEFAULT_ADVANCE_PERIOD_MS: u64 = 100;
/// Rider spawn period (simulation ms).
pub const DEFAULT_SPAWN_PERIOD_MS: u64 = 2_000;
/// Pickup matching period (simulation ms).
pub const DEFAULT_PICKUP_PERIOD_MS: u64 = 500;

/// Cursor units moved per advance tick.
pub const DEFAULT_STEP_SIZE: f64 = 0.05;
/// Pickup proximity threshold.
pub const DEFAULT_PICKUP_RADIUS_M: f64 = 50.0;
/// Max random offset applied to each axis of a spawned rider (~33 m of latitude).
pub const DEFAULT_SPAWN_OFFSET_DEG: f64 = 0.0003;

pub const DEFAULT_FLEET_SIZE: usize = 3;
/// Upper bound for any vehicle's seat count.
pub const MAX_VEHICLE_CAPACITY: u32 = 50;
pub const DEFAULT_MIN_MAX_CAPACITY: u32 = 12;
pub const DEFAULT_MAX_MAX_CAPACITY: u32 = 20;
pub const DEFAULT_MAX_INITIAL_OCCUPANCY: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickPeriods {
    pub advance_ms: u64,
    pub spawn_ms: u64,
    pub pickup_ms: u64,
}

impl Default for TickPeriods {
    fn default() -> Self {
        Self {
            advance_ms: DEFAULT_ADVANCE_PERIOD_MS,
            spawn_ms: DEFAULT_SPAWN_PERIOD_MS,
            pickup_ms: DEFAULT_PICKUP_PERIOD_MS,
        }
    }
}

/// Bounds for drawing a vehicle's seat count and starting occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPolicy {
    pub min_max_capacity: u32,
    pub max_max_capacity: u32,
    pub max_initial_occupancy: u32,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            min_max_capacity: DEFAULT_MIN_MAX_CAPACITY,
            max_max_capacity: DEFAULT_MAX_MAX_CAPACITY,
            max_initial_occupancy: DEFAULT_MAX_INITIAL_OCCUPANCY,
        }
    }
}

impl CapacityPolicy {
    /// Every vehicle gets exactly `max_capacity` seats and starts with `occupancy`.
    pub fn fixed(max_capacity: u32, occupancy: u32) -> Self {
        Self {
            min_max_capacity: max_capacity,
            max_max_capacity: max_capacity,
            max_initial_occupancy: occupancy,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.min_max_capacity, self.max_max_capacity] {
            if value == 0 || value > MAX_VEHICLE_CAPACITY {
                return Err(ConfigError::MaxCapacityOutOfRange {
                    value,
                    limit: MAX_VEHICLE_CAPACITY,
                });
            }
        }
        if self.min_max_capacity > self.max_max_capacity {
            return Err(ConfigError::InvertedCapacityBounds {
                min: self.min_max_capacity,
                max: self.max_max_capacity,
            });
        }
        if self.max_initial_occupancy > self.min_max_capacity {
            return Err(ConfigError::InitialOccupancyTooHigh {
                occupancy: self.max_initial_occupancy,
                max_capacity: self.min_max_capacity,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum StartCursor {
    /// Every vehicle starts at the first path point.
    #[default]
    Origin,
    /// Uniformly random cursor along the path (origin while the path is pending).
    Random,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum StartDirection {
    Fixed(Direction),
    #[default]
    Random,
}

#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
pub struct FleetConfig {
    pub size: usize,
    pub kinds: Vec<VehicleKind>,
    pub capacity: CapacityPolicy,
    pub start_cursor: StartCursor,
    pub start_direction: StartDirection,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_FLEET_SIZE,
            kinds: vec![VehicleKind::Van, VehicleKind::Jeep],
            capacity: CapacityPolicy::default(),
            start_cursor: StartCursor::Origin,
            start_direction: StartDirection::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct MotionConfig {
    pub step_size: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub offset_deg: f64,
    /// Stop spawning while this many riders are waiting. `None` = unbounded.
    pub max_waiting: Option<usize>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            offset_deg: DEFAULT_SPAWN_OFFSET_DEG,
            max_waiting: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct PickupConfig {
    pub radius_m: f64,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_PICKUP_RADIUS_M,
        }
    }
}

/// Shared random source. Seeded from [SimulationConfig::seed] so a run is
/// reproducible; tests may insert their own.
#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Tick periods in effect for the periodic tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Resource)]
pub struct TickSchedule(pub TickPeriods);

/// Parameters for building a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    pub periods: TickPeriods,
    pub motion: MotionConfig,
    pub fleet: FleetConfig,
    pub spawn: SpawnConfig,
    pub pickup: PickupConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            periods: TickPeriods::default(),
            motion: MotionConfig::default(),
            fleet: FleetConfig::default(),
            spawn: SpawnConfig::default(),
            pickup: PickupConfig::default(),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("path advance", self.periods.advance_ms),
            ("rider spawn", self.periods.spawn_ms),
            ("pickup matching", self.periods.pickup_ms),
        ];
        for (task, period) in periods {
            if period == 0 {
                return Err(ConfigError::ZeroPeriod { task });
            }
        }
        positive("step size", self.motion.step_size)?;
        positive("pickup radius", self.pickup.radius_m)?;
        positive("spawn offset", self.spawn.offset_deg)?;
        if self.fleet.size == 0 {
            return Err(ConfigError::EmptyFleet);
        }
        if self.fleet.kinds.is_empty() {
            return Err(ConfigError::NoVehicleKinds);
        }
        self.fleet.capacity.validate()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fleet_size(mut self, size: usize) -> Self {
        self.fleet.size = size;
        self
    }

    pub fn with_capacity(mut self, capacity: CapacityPolicy) -> Self {
        self.fleet.capacity = capacity;
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<VehicleKind>) -> Self {
        self.fleet.kinds = kinds;
        self
    }

    pub fn with_start(mut self, cursor: StartCursor, direction: StartDirection) -> Self {
        self.fleet.start_cursor = cursor;
        self.fleet.start_direction = direction;
        self
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.motion.step_size = step_size;
        self
    }

    pub fn with_periods(mut self, periods: TickPeriods) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_pickup_radius_m(mut self, radius_m: f64) -> Self {
        self.pickup.radius_m = radius_m;
        self
    }

    pub fn with_spawn_offset_deg(mut self, offset_deg: f64) -> Self {
        self.spawn.offset_deg = offset_deg;
        self
    }

    pub fn with_max_waiting(mut self, max_waiting: Option<usize>) -> Self {
        self.spawn.max_waiting = max_waiting;
        self
    }
}
