//! Geolocation core for GeoPulse
//!
//! Resolves place names to coordinates through a pluggable resolver,
//! deduplicates repeated lookups with an in-memory TTL cache, and derives
//! bounding boxes around resolved points.

pub mod bbox;
pub mod cache;
pub mod resolver;
pub mod types;

pub use bbox::{bounding_box, DEFAULT_DELTA};
pub use cache::CoordinateCache;
pub use resolver::{LlmResolver, LlmResolverConfig, Resolve, TableResolver};
pub use types::{BoundingBox, Coordinates, GeoError, ResolveError};
