use std::sync::Arc;

use geopulse_geo::{CoordinateCache, Resolve};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CoordinateCache>,
    pub resolver: Arc<dyn Resolve>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self {
            cache: Arc::new(CoordinateCache::new()),
            resolver,
        }
    }
}
