//! End-to-end tests for the HTTP adapter: a real listener on an ephemeral
//! port, a static table resolver behind the cache, reqwest as the client.

use std::sync::Arc;

use geopulse_geo::{Coordinates, TableResolver};
use geopulse_server::{routes, AppState};

async fn spawn_server() -> String {
    let mut table = TableResolver::new();
    table.insert(
        "chennai",
        Coordinates {
            latitude: 13.08,
            longitude: 80.27,
        },
    );
    table.insert(
        "paris",
        Coordinates {
            latitude: 48.86,
            longitude: 2.35,
        },
    );

    let state = AppState::new(Arc::new(table));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_lookup_then_cached_lookup() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let first: serde_json::Value = client
        .post(format!("{base}/coordinates"))
        .json(&serde_json::json!({"place": "Chennai"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first["coordinates"], serde_json::json!([13.08, 80.27]));
    assert_eq!(first["cached"], serde_json::json!(false));

    // Different casing and padding still hits the same slot.
    let second: serde_json::Value = client
        .post(format!("{base}/coordinates"))
        .json(&serde_json::json!({"place": " chennai "}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(second["coordinates"], first["coordinates"]);
    assert_eq!(second["cached"], serde_json::json!(true));
}

#[tokio::test]
async fn test_identity_scopes_cache_slots() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let alice: serde_json::Value = client
        .post(format!("{base}/coordinates"))
        .json(&serde_json::json!({"identity": "alice", "place": "paris"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(alice["cached"], serde_json::json!(false));

    let bob: serde_json::Value = client
        .post(format!("{base}/coordinates"))
        .json(&serde_json::json!({"identity": "bob", "place": "paris"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bob["cached"], serde_json::json!(false));
}

#[tokio::test]
async fn test_missing_place_is_bad_request() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/coordinates"))
        .json(&serde_json::json!({"identity": "alice"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], serde_json::json!("Place is required"));
}

#[tokio::test]
async fn test_unresolvable_place_is_bad_gateway() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/coordinates"))
        .json(&serde_json::json!({"place": "atlantis"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        serde_json::json!("Failed to retrieve coordinates")
    );
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_bounding_box_endpoint() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(format!("{base}/coordinates/bounding-box"))
        .query(&[("place", "Chennai")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["coordinates"],
        serde_json::json!({
            "lat_min": 12.98,
            "lat_max": 13.18,
            "lon_min": 80.17,
            "lon_max": 80.37,
        })
    );
    assert!(body["radius_km"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_bounding_box_rejects_non_positive_delta() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/coordinates/bounding-box"))
        .query(&[("place", "chennai"), ("delta", "0")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_bounding_box_missing_place_is_bad_request() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/coordinates/bounding-box"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}
