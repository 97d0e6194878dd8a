//! Arrival board: which vehicles can still take a commuter, and how soon.

use serde::Serialize;

use crate::ecs::{VehicleFilter, VehicleId, VehicleKind};
use crate::geo::{distance_meters, estimate_arrival_label, estimate_arrival_minutes, GeoPoint};
use crate::telemetry::VehicleSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalEstimate {
    pub vehicle: VehicleId,
    pub kind: VehicleKind,
    pub distance_m: f64,
    pub minutes: f64,
    pub label: String,
    pub seats_left: u32,
}

/// Vehicles matching `filter` that have a known position and a free seat,
/// nearest first (ties broken by id). At a constant assumed speed, nearest
/// is also earliest arrival.
pub fn arrival_board(
    vehicles: &[VehicleSnapshot],
    commuter: GeoPoint,
    filter: VehicleFilter,
) -> Vec<ArrivalEstimate> {
    let mut board: Vec<ArrivalEstimate> = vehicles
        .iter()
        .filter(|v| filter.matches(v.kind) && v.capacity < v.max_capacity)
        .filter_map(|v| {
            let position = v.position?;
            Some(ArrivalEstimate {
                vehicle: v.id,
                kind: v.kind,
                distance_m: distance_meters(position, commuter),
                minutes: estimate_arrival_minutes(position, commuter),
                label: estimate_arrival_label(position, commuter),
                seats_left: v.max_capacity - v.capacity,
            })
        })
        .collect();
    board.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.vehicle.cmp(&b.vehicle))
    });
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Direction;
    use crate::ecs::VehicleStatus;

    fn snapshot(id: u32, kind: VehicleKind, capacity: u32, position: Option<GeoPoint>) -> VehicleSnapshot {
        VehicleSnapshot {
            id: VehicleId(id),
            kind,
            capacity,
            max_capacity: 10,
            status: VehicleStatus::Active,
            cursor: 0.0,
            direction: Direction::Forward,
            position,
        }
    }

    #[test]
    fn board_sorts_by_distance_and_skips_full_or_unplaced() {
        let commuter = GeoPoint::new(14.60, 121.00);
        let vehicles = vec![
            snapshot(1, VehicleKind::Van, 0, Some(GeoPoint::new(14.62, 121.00))),
            snapshot(2, VehicleKind::Jeep, 0, Some(GeoPoint::new(14.601, 121.00))),
            snapshot(3, VehicleKind::Jeep, 10, Some(commuter)),
            snapshot(4, VehicleKind::Van, 0, None),
        ];

        let board = arrival_board(&vehicles, commuter, VehicleFilter::All);
        let ids: Vec<u32> = board.iter().map(|a| a.vehicle.0).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(board[0].label, "< 1 min");
        assert_eq!(board[0].seats_left, 10);

        let vans = arrival_board(&vehicles, commuter, VehicleFilter::Only(VehicleKind::Van));
        assert_eq!(vans.len(), 1);
        assert_eq!(vans[0].vehicle, VehicleId(1));
        // ~2.2 km at 25 km/h
        assert_eq!(vans[0].label, "5 min");
    }
}
