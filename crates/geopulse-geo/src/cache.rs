//! Request-deduplicating coordinate cache.
//!
//! Keys are `(identity, normalized place)` pairs. Entries stay valid for a
//! fixed freshness window and expire lazily on lookup; a miss or expiry
//! triggers exactly one resolver call per key at a time, with concurrent
//! callers for the same key waiting on and reusing the winner's result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::resolver::Resolve;
use crate::types::{Coordinates, GeoError};

/// Freshness window for cached coordinates.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    identity: Option<String>,
    place: String,
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    coordinates: Coordinates,
    created_at: Instant,
}

/// One slot per key. Holding the slot lock across the resolver call is what
/// gives single-flight: a second caller for the same cold key blocks here
/// until the first has written (or failed to write) the entry.
type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

/// In-memory coordinate cache with per-key single-flight resolution.
#[derive(Debug)]
pub struct CoordinateCache {
    ttl: Duration,
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl Default for CoordinateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateCache {
    /// Create a cache with the default 300 second freshness window.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom freshness window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Look up coordinates for a place, consulting the cache first.
    ///
    /// Returns the coordinates and whether they came from the cache. The
    /// place name is normalized (trimmed, lowercased) before keying, so
    /// `" Paris "` and `"paris"` share a slot. Identity-less lookups all use
    /// the same `None` identity.
    ///
    /// # Errors
    ///
    /// `GeoError::InvalidInput` if the place is empty after normalization;
    /// `GeoError::Resolution` if the resolver fails. A failed resolution
    /// leaves the slot exactly as it was: a stale entry is kept, and no
    /// empty entry is ever written.
    pub async fn lookup<R: Resolve + ?Sized>(
        &self,
        identity: Option<&str>,
        place: &str,
        resolver: &R,
    ) -> Result<(Coordinates, bool), GeoError> {
        let place = normalize_place(place)?;
        let slot = self.slot(identity, &place);

        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref() {
            if cached.created_at.elapsed() < self.ttl {
                tracing::debug!(%place, "coordinate cache hit");
                return Ok((cached.coordinates, true));
            }
            tracing::debug!(%place, "coordinate cache entry expired");
        }

        let coordinates = resolver.resolve(&place).await.map_err(|e| {
            tracing::warn!(%place, error = %e, "coordinate resolution failed");
            GeoError::Resolution(e)
        })?;

        // Overwrite, never merge. Stale entries are superseded here or
        // ignored above; they are never explicitly deleted.
        *entry = Some(CacheEntry {
            coordinates,
            created_at: Instant::now(),
        });
        tracing::info!(
            %place,
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "resolved and cached coordinates"
        );
        Ok((coordinates, false))
    }

    /// Get or create the slot for a key. The map lock is synchronous and
    /// held only for the insertion, so lookups for different keys never
    /// block each other.
    fn slot(&self, identity: Option<&str>, place: &str) -> Slot {
        let key = CacheKey {
            identity: identity.map(str::to_owned),
            place: place.to_owned(),
        };
        self.slots.lock().entry(key).or_default().clone()
    }
}

/// Normalize a place name: trim surrounding whitespace and lowercase.
///
/// # Errors
///
/// `GeoError::InvalidInput` if nothing remains after trimming.
pub fn normalize_place(place: &str) -> Result<String, GeoError> {
    let normalized = place.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(GeoError::InvalidInput);
    }
    Ok(normalized)
}
