//! Path animator: a fractional cursor that bounces between the ends of a path.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::geo::{lerp, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Motion state of one vehicle. `cursor` is a fractional index into the path
/// and stays within `[0, len - 1]` after every update.
#[derive(Debug, Clone, Copy, PartialEq, Component, Serialize, Deserialize)]
pub struct PathAnimator {
    pub cursor: f64,
    pub direction: Direction,
}

impl PathAnimator {
    pub fn new(cursor: f64, direction: Direction) -> Self {
        Self { cursor, direction }
    }

    /// Move the cursor by `step` in the current direction and return the new
    /// position. Paths with fewer than two points are a no-op.
    ///
    /// Reaching or passing the end in the direction of travel clamps the cursor
    /// to that end and flips the direction; at most one flip per call.
    pub fn advance(&mut self, path: &[GeoPoint], step: f64) -> Option<GeoPoint> {
        if path.len() < 2 {
            return None;
        }
        if !step.is_finite() {
            return self.position(path);
        }
        let last = (path.len() - 1) as f64;
        self.cursor += step * self.direction.sign();

        match self.direction {
            Direction::Forward if self.cursor >= last => {
                self.cursor = last;
                self.direction = self.direction.flipped();
            }
            Direction::Backward if self.cursor <= 0.0 => {
                self.cursor = 0.0;
                self.direction = self.direction.flipped();
            }
            _ => {}
        }
        // A negative step can push past the trailing end; clamping wins.
        self.cursor = self.cursor.clamp(0.0, last);

        self.position(path)
    }

    /// Interpolated position for the current cursor.
    pub fn position(&self, path: &[GeoPoint]) -> Option<GeoPoint> {
        interpolate(path, self.cursor)
    }

    /// Pull the cursor back into range after the path was replaced.
    pub fn clamp_to_path(&mut self, len: usize) {
        let last = len.saturating_sub(1) as f64;
        if !self.cursor.is_finite() {
            self.cursor = 0.0;
        }
        self.cursor = self.cursor.clamp(0.0, last);
    }
}

/// Position at fractional index `cursor`, interpolating latitude and longitude
/// independently between the two surrounding points.
pub fn interpolate(path: &[GeoPoint], cursor: f64) -> Option<GeoPoint> {
    if path.is_empty() {
        return None;
    }
    let last = path.len() - 1;
    let cursor = cursor.clamp(0.0, last as f64);
    let lower = cursor.floor() as usize;
    let upper = (cursor.ceil() as usize).min(last);
    if lower == upper {
        return Some(path[lower]);
    }
    Some(lerp(path[lower], path[upper], cursor - lower as f64))
}
