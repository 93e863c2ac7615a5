//! Route handlers: thin adapters over the coordinate cache.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use geopulse_geo::{bounding_box, BoundingBox, DEFAULT_DELTA};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/coordinates", post(lookup_coordinates))
        .route("/coordinates/bounding-box", get(lookup_bounding_box))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CoordinatesRequest {
    identity: Option<String>,
    place: Option<String>,
}

#[derive(Debug, Serialize)]
struct CoordinatesResponse {
    /// `[latitude, longitude]`
    coordinates: [f64; 2],
    cached: bool,
}

async fn lookup_coordinates(
    State(state): State<AppState>,
    Json(request): Json<CoordinatesRequest>,
) -> ApiResult<Json<CoordinatesResponse>> {
    let place = request.place.as_deref().unwrap_or_default();
    let (coordinates, cached) = state
        .cache
        .lookup(request.identity.as_deref(), place, state.resolver.as_ref())
        .await?;

    Ok(Json(CoordinatesResponse {
        coordinates: [coordinates.latitude, coordinates.longitude],
        cached,
    }))
}

#[derive(Debug, Deserialize)]
struct BoundingBoxQuery {
    place: Option<String>,
    delta: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Bounds {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

#[derive(Debug, Serialize)]
struct BoundingBoxResponse {
    coordinates: Bounds,
    radius_km: f64,
}

impl From<BoundingBox> for BoundingBoxResponse {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            coordinates: Bounds {
                lat_min: bbox.lat_min,
                lat_max: bbox.lat_max,
                lon_min: bbox.lon_min,
                lon_max: bbox.lon_max,
            },
            radius_km: bbox.radius_km,
        }
    }
}

async fn lookup_bounding_box(
    State(state): State<AppState>,
    Query(query): Query<BoundingBoxQuery>,
) -> ApiResult<Json<BoundingBoxResponse>> {
    let delta = query.delta.unwrap_or(DEFAULT_DELTA);
    if !delta.is_finite() || delta <= 0.0 {
        return Err(ApiError::bad_request("Delta must be a positive number"));
    }

    let place = query.place.as_deref().unwrap_or_default();
    let (coordinates, _) = state
        .cache
        .lookup(None, place, state.resolver.as_ref())
        .await?;

    Ok(Json(bounding_box(coordinates, delta).into()))
}
