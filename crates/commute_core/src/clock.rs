//! Simulation clock: a single min-heap event queue in simulation milliseconds.
//!
//! Every periodic task (path advance, rider spawn, pickup matching) is an event
//! in this one queue, so all mutation of vehicles and riders is serialized.
//! Events carry the route epoch they were scheduled under; bumping the epoch
//! on route change makes every older event stale.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    AdvancePath,
    MatchPickups,
    SpawnRider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub epoch: u64,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.kind.cmp(&self.kind))
            .then_with(|| other.epoch.cmp(&self.epoch))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event being processed by the current schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    epoch: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Queue a fully specified event, epoch included.
    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(event);
    }

    /// Schedule `kind` at absolute time `timestamp` under the current epoch.
    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(Event {
            timestamp: timestamp.max(self.now),
            kind,
            epoch: self.epoch,
        });
    }

    /// Schedule `kind` `delay_ms` after now.
    pub fn schedule_in(&mut self, delay_ms: u64, kind: EventKind) {
        self.schedule_at(self.now.saturating_add(delay_ms), kind);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    /// Move time forward without processing anything. Never moves backwards.
    pub fn advance_to(&mut self, timestamp: u64) {
        self.now = self.now.max(timestamp);
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn is_stale(&self, event: &Event) -> bool {
        event.epoch != self.epoch
    }

    /// Start a new epoch and drop everything queued under the old one.
    pub fn begin_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.events.clear();
        self.epoch
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10, EventKind::SpawnRider);
        clock.schedule_at(5, EventKind::AdvancePath);
        clock.schedule_at(20, EventKind::MatchPickups);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn same_timestamp_orders_by_kind() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(100, EventKind::SpawnRider);
        clock.schedule_at(100, EventKind::MatchPickups);
        clock.schedule_at(100, EventKind::AdvancePath);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| clock.pop_next())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::AdvancePath,
                EventKind::MatchPickups,
                EventKind::SpawnRider
            ]
        );
    }

    #[test]
    fn begin_epoch_clears_queue_and_marks_old_events_stale() {
        let mut clock = SimulationClock::default();
        clock.schedule_in(50, EventKind::AdvancePath);
        let old = clock.pop_next().expect("event");
        clock.schedule_in(50, EventKind::AdvancePath);

        assert_eq!(clock.begin_epoch(), 1);
        assert!(clock.is_empty());
        assert!(clock.is_stale(&old));

        clock.schedule_in(50, EventKind::AdvancePath);
        let fresh = clock.pop_next().expect("event");
        assert_eq!(fresh.timestamp, 100);
        assert!(!clock.is_stale(&fresh));
    }
}
