use bevy_ecs::prelude::{Schedule, World};
use commute_core::pickup::pickup_system;
use commute_core::runner::{run_next_event, run_until, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule)
    }

    /// Run every event up to `end_ms`, returning the number of steps executed.
    pub fn run_until(&mut self, world: &mut World, end_ms: u64) -> usize {
        run_until(world, &mut self.schedule, end_ms)
    }
}

/// A schedule holding only the pickup system, for driving pickup ticks by hand.
pub fn pickup_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(pickup_system);
    schedule
}
