//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], discards it if it belongs to an
//! older route epoch, inserts it as [CurrentEvent], runs the schedule, and
//! queues the next occurrence of the same periodic task.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use tracing::trace;

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::config::{TickPeriods, TickSchedule};
use crate::fleet::advance_fleet_system;
use crate::pickup::pickup_system;
use crate::spawner::rider_spawner_system;

fn is_advance_path(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AdvancePath)
        .unwrap_or(false)
}

fn is_spawn_rider(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SpawnRider)
        .unwrap_or(false)
}

fn is_match_pickups(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::MatchPickups)
        .unwrap_or(false)
}

fn period_for(periods: &TickPeriods, kind: EventKind) -> u64 {
    match kind {
        EventKind::AdvancePath => periods.advance_ms,
        EventKind::SpawnRider => periods.spawn_ms,
        EventKind::MatchPickups => periods.pickup_ms,
    }
}

/// Builds the simulation schedule: one system per periodic task, each gated on
/// the current event so exactly one of them runs per step. Deferred commands
/// (spawned riders, despawned riders) are applied when the run finishes.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        advance_fleet_system.run_if(is_advance_path),
        rider_spawner_system.run_if(is_spawn_rider),
        pickup_system.run_if(is_match_pickups),
    ));
    schedule
}

/// Queue the first occurrence of every periodic task, one period from now.
pub fn start_periodic_tasks(world: &mut World) {
    let periods = world
        .get_resource::<TickSchedule>()
        .map(|s| s.0)
        .unwrap_or_default();
    let mut clock = world.resource_mut::<SimulationClock>();
    for kind in [
        EventKind::AdvancePath,
        EventKind::MatchPickups,
        EventKind::SpawnRider,
    ] {
        clock.schedule_in(period_for(&periods, kind), kind);
    }
}

/// Pops the next event of the current epoch, dropping stale ones on the way.
/// Events after `until` stay queued.
fn pop_current(world: &mut World, until: Option<u64>) -> Option<Event> {
    let mut clock = world.resource_mut::<SimulationClock>();
    loop {
        let next = clock.next_event_time()?;
        if until.is_some_and(|end| next > end) {
            return None;
        }
        let event = clock.pop_next()?;
        if clock.is_stale(&event) {
            trace!(kind = ?event.kind, epoch = event.epoch, "discarding stale event");
            continue;
        }
        return Some(event);
    }
}

fn step(world: &mut World, schedule: &mut Schedule, until: Option<u64>) -> bool {
    let Some(event) = pop_current(world, until) else {
        return false;
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);

    let periods = world
        .get_resource::<TickSchedule>()
        .map(|s| s.0)
        .unwrap_or_default();
    let mut clock = world.resource_mut::<SimulationClock>();
    if !clock.is_stale(&event) {
        clock.schedule_in(period_for(&periods, event.kind), event.kind);
    }
    true
}

/// Runs one simulation step. Returns `false` when no current-epoch event is queued.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    step(world, schedule, None)
}

/// Runs every event with a timestamp at or before `end_ms`, then moves the
/// clock to `end_ms`. Returns the number of steps executed.
pub fn run_until(world: &mut World, schedule: &mut Schedule, end_ms: u64) -> usize {
    let mut steps = 0;
    while step(world, schedule, Some(end_ms)) {
        steps += 1;
    }
    world.resource_mut::<SimulationClock>().advance_to(end_ms);
    steps
}
