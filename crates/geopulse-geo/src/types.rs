use serde::{Deserialize, Serialize};

/// A resolved geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values outside the valid ranges
    /// (latitude ±90°, longitude ±180°).
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, ResolveError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(ResolveError::OutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A box around a point, expanded by a fixed delta in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// Half the great-circle distance between opposite corners.
    pub radius_km: f64,
}

/// Lookup errors. Both kinds are terminal for the single request and leave
/// cache state for other keys untouched.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("place name is required")]
    InvalidInput,
    #[error("failed to resolve coordinates: {0}")]
    Resolution(#[from] ResolveError),
}

/// Resolver adapter errors.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("resolver returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unparseable resolver reply: {0}")]
    Parse(String),
    #[error("coordinates out of range: lat {latitude}, lon {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
    #[error("no coordinates for place: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accepts_valid_range() {
        let c = Coordinates::checked(13.08, 80.27).unwrap();
        assert_eq!(c.latitude, 13.08);
        assert_eq!(c.longitude, 80.27);
    }

    #[test]
    fn test_checked_rejects_out_of_range_latitude() {
        assert!(Coordinates::checked(91.0, 0.0).is_err());
        assert!(Coordinates::checked(-90.5, 0.0).is_err());
    }

    #[test]
    fn test_checked_rejects_out_of_range_longitude() {
        assert!(Coordinates::checked(0.0, 180.5).is_err());
        assert!(Coordinates::checked(0.0, -181.0).is_err());
    }

    #[test]
    fn test_checked_rejects_non_finite() {
        assert!(Coordinates::checked(f64::NAN, 0.0).is_err());
        assert!(Coordinates::checked(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinates_serialization() {
        let c = Coordinates {
            latitude: 13.08,
            longitude: 80.27,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"latitude":13.08,"longitude":80.27}"#);
    }
}
