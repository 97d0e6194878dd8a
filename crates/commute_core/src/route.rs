//! Routes, stops and the resolved path vehicles travel along.

use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geo::{BoundingBox, GeoPoint};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteKey(pub String);

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A named point on a route. Its ordinal is its index in [Route::stops].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub position: GeoPoint,
    pub description: Option<String>,
}

impl Stop {
    pub fn new(name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            name: name.into(),
            position,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered, fixed sequence of at least two stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    key: RouteKey,
    stops: Vec<Stop>,
}

impl Route {
    pub fn new(key: impl Into<RouteKey>, stops: Vec<Stop>) -> Result<Self, ConfigError> {
        let key = key.into();
        if stops.len() < 2 {
            return Err(ConfigError::TooFewStops {
                key: key.0,
                count: stops.len(),
            });
        }
        Ok(Self { key, stops })
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn origin(&self) -> &Stop {
        &self.stops[0]
    }

    pub fn destination(&self) -> &Stop {
        &self.stops[self.stops.len() - 1]
    }
}

impl From<String> for RouteKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Dense polyline for the active route.
///
/// Empty while resolution is pending or after it failed. `generation` counts
/// route selections so late deliveries for an older selection can be told apart.
#[derive(Debug, Clone, Default, Resource)]
pub struct ResolvedPath {
    pub route_key: Option<RouteKey>,
    pub generation: u64,
    points: Vec<GeoPoint>,
}

impl ResolvedPath {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    /// Start a new selection: drop the old points and bump the generation.
    pub(crate) fn begin(&mut self, key: RouteKey) -> u64 {
        self.route_key = Some(key);
        self.generation += 1;
        self.points.clear();
        self.generation
    }

    /// Install points for the current generation. Paths with fewer than two
    /// points are not drivable and leave the path empty.
    pub(crate) fn install(&mut self, points: Vec<GeoPoint>) -> bool {
        if points.len() < 2 {
            self.points.clear();
            return false;
        }
        self.points = points;
        true
    }
}
