//! HTTP adapter for the GeoPulse geolocation core.
//!
//! Thin axum layer over [`geopulse_geo::CoordinateCache`]: one endpoint for
//! coordinate lookups, one for derived bounding boxes, JSON error bodies.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;
