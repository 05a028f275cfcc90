// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk ledger endpoint tests: save, history, filters and pagination.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{body_json, get, post_json};

async fn save(app: &axum::Router, walk: Value) -> Value {
    let response = app
        .clone()
        .oneshot(post_json("/api/save-walk", walk))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn history(app: &axum::Router, query: &str) -> Value {
    let response = app
        .clone()
        .oneshot(get(&format!("/api/walk-history{}", query)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn walk(distance: f64, timestamp: &str) -> Value {
    json!({
        "lat": 37.7749,
        "lon": -122.4194,
        "distance": distance,
        "duration": 1800,
        "timestamp": timestamp,
    })
}

#[tokio::test]
async fn test_saved_walk_is_listed_first() {
    let (app, _state) = common::create_test_app();

    save(&app, walk(2.0, "2024-03-01T08:00:00Z")).await;
    let saved = save(
        &app,
        json!({
            "lat": 37.7749,
            "lon": -122.4194,
            "distance": 3.5,
            "duration": 1800,
            "temperature": 18.5,
            "condition": "Clear",
            "dog_parks_visited": ["Duboce Park", {"name": "Fort Funston", "type": "dog_park"}],
            "route": [[37.7749, -122.4194], [37.78, -122.41], [37.7749, -122.4194]]
        }),
    )
    .await;
    assert!(saved["message"].is_string());

    let body = history(&app, "").await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 1);

    let first = &body["items"][0];
    assert_eq!(first["id"], saved["id"]);
    assert_eq!(first["difficulty"], "medium");
    assert_eq!(first["duration"], 1800);
    assert_eq!(
        first["dog_parks_visited"],
        json!(["Duboce Park", "Fort Funston"])
    );
    assert_eq!(first["route"].as_array().unwrap().len(), 3);
    assert!(first["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_get_walk_by_id() {
    let (app, _state) = common::create_test_app();

    let saved = save(&app, walk(4.5, "2024-04-02T07:30:00Z")).await;
    let id = saved["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/walks/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["distance"], 4.5);
    assert_eq!(body["difficulty"], "hard");

    let response = app
        .oneshot(get(&format!("/api/walks/{}", id + 1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_oversized_route_is_rejected() {
    let (app, _state) = common::create_test_app();

    let mut body = walk(3.0, "2024-04-02T07:30:00Z");
    body["route"] = json!(vec![[37.7749, -122.4194]; 5001]);
    let response = app
        .clone()
        .oneshot(post_json("/api/save-walk", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = history(&app, "").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_difficulty_defaults_from_distance() {
    let (app, _state) = common::create_test_app();

    save(&app, walk(3.5, "2024-05-01T10:00:00Z")).await;

    let body = history(&app, "").await;
    let item = &body["items"][0];
    assert_eq!(item["difficulty"], "medium");
    assert!(item["route"].is_null());
}

#[tokio::test]
async fn test_distance_filter_is_inclusive() {
    let (app, _state) = common::create_test_app();

    for distance in [2.0, 3.0, 4.2, 5.0, 6.0] {
        save(&app, walk(distance, "2024-05-01T10:00:00Z")).await;
    }

    let body = history(&app, "?min_distance=3&max_distance=5").await;
    assert_eq!(body["total"], 3);
    for item in body["items"].as_array().unwrap() {
        let d = item["distance"].as_f64().unwrap();
        assert!((3.0..=5.0).contains(&d), "distance {} out of range", d);
    }
}

#[tokio::test]
async fn test_date_filter_covers_whole_day() {
    let (app, _state) = common::create_test_app();

    save(&app, walk(1.0, "2023-12-31T23:59:59Z")).await;
    save(&app, walk(2.0, "2024-01-01T00:00:00Z")).await;
    save(&app, walk(3.0, "2024-01-01T23:59:59Z")).await;
    save(&app, walk(4.0, "2024-01-02T00:00:00Z")).await;

    let body = history(&app, "?start_date=2024-01-01&end_date=2024-01-01").await;
    assert_eq!(body["total"], 2);
    let distances: Vec<f64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["distance"].as_f64().unwrap())
        .collect();
    assert_eq!(distances, vec![3.0, 2.0]);
}

#[tokio::test]
async fn test_pagination() {
    let (app, _state) = common::create_test_app();

    for day in 1..=5 {
        save(&app, walk(1.0 + day as f64, &format!("2024-06-0{}T09:00:00Z", day))).await;
    }

    let body = history(&app, "?page=2&per_page=2").await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["total"], 5);
    let distances: Vec<f64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["distance"].as_f64().unwrap())
        .collect();
    assert_eq!(distances, vec![4.0, 3.0]);

    let beyond = history(&app, "?page=9&per_page=2").await;
    assert!(beyond["items"].as_array().unwrap().is_empty());
    assert_eq!(beyond["total"], 5);
}

#[tokio::test]
async fn test_empty_history() {
    let (app, _state) = common::create_test_app();
    let body = history(&app, "").await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["pages"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_storage_error() {
    let (app, _state) = common::create_offline_test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/save-walk", walk(3.0, "2024-01-01T00:00:00Z")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "storage_error");

    let response = app.oneshot(get("/api/walk-history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_weather_without_api_key_is_upstream_error() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/weather",
            json!({"lat": 37.7749, "lon": -122.4194}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "upstream_error");
}
