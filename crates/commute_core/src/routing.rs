//! Pluggable route resolvers: turn an ordered list of stops into a dense path.
//!
//! The turn-by-turn routing service is an external collaborator. It is reached
//! through the [`RouteResolver`] trait; two implementations ship here:
//!
//! - **`StraightLineResolver`**: densifies each leg between consecutive stops. Zero dependencies.
//! - **`CachedRouteResolver`**: LRU cache around any other resolver.
//!
//! A resolver that cannot answer synchronously returns `None`; the host then
//! delivers the path later through [`crate::simulation::Simulation::deliver_path`].

use std::num::NonZeroUsize;
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;
use lru::LruCache;
use tracing::debug;

use crate::geo::{lerp, GeoPoint};
use crate::route::Stop;

/// Default number of interpolated points per leg, endpoints excluded.
pub const DEFAULT_POINTS_PER_LEG: usize = 8;

/// Default cache capacity for [`CachedRouteResolver`].
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 256;

/// Trait for routing backends. Implementations must be `Send + Sync` so the
/// resolver can be stored as a shared ECS resource.
pub trait RouteResolver: Send + Sync {
    /// Resolve stops into an ordered path of at least two points.
    /// Returns `None` when the path is pending or cannot be produced.
    fn resolve(&self, stops: &[Stop]) -> Option<Vec<GeoPoint>>;
}

/// ECS resource wrapping a boxed route resolver.
#[derive(Resource)]
pub struct RouteResolverResource(pub Box<dyn RouteResolver>);

/// Connects consecutive stops with straight segments, inserting
/// `points_per_leg` evenly spaced points inside each leg.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineResolver {
    pub points_per_leg: usize,
}

impl Default for StraightLineResolver {
    fn default() -> Self {
        Self {
            points_per_leg: DEFAULT_POINTS_PER_LEG,
        }
    }
}

impl RouteResolver for StraightLineResolver {
    fn resolve(&self, stops: &[Stop]) -> Option<Vec<GeoPoint>> {
        if stops.len() < 2 {
            return None;
        }
        let segments = self.points_per_leg + 1;
        let mut points = Vec::with_capacity((stops.len() - 1) * segments + 1);
        points.push(stops[0].position);
        for leg in stops.windows(2) {
            let (from, to) = (leg[0].position, leg[1].position);
            for i in 1..=segments {
                points.push(lerp(from, to, i as f64 / segments as f64));
            }
        }
        Some(points)
    }
}

/// Cache key: raw bit patterns of every stop coordinate, in order.
type StopsKey = Vec<(u64, u64)>;

fn stops_key(stops: &[Stop]) -> StopsKey {
    stops
        .iter()
        .map(|s| (s.position.lat.to_bits(), s.position.lng.to_bits()))
        .collect()
}

/// LRU-cached wrapper around any [`RouteResolver`].
///
/// Only successful resolutions are cached; a pending answer is asked again next time.
pub struct CachedRouteResolver {
    inner: Box<dyn RouteResolver>,
    cache: Mutex<LruCache<StopsKey, Vec<GeoPoint>>>,
}

impl CachedRouteResolver {
    pub fn new(inner: Box<dyn RouteResolver>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl RouteResolver for CachedRouteResolver {
    fn resolve(&self, stops: &[Stop]) -> Option<Vec<GeoPoint>> {
        let key = stops_key(stops);

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                debug!(stops = stops.len(), "route cache hit");
                return Some(cached.clone());
            }
        }

        let result = self.inner.resolve(stops)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, result.clone());
        }
        Some(result)
    }
}
