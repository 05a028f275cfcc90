// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route generation endpoint tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use walk_planner::config::Config;

mod common;
use common::{body_json, get, post_json};

#[tokio::test]
async fn test_health() {
    let (app, _state) = common::create_test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_generate_route() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/generate-route",
            json!({"lat": 37.7749, "lon": -122.4194, "distance": 3.0, "duration": 30}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let route = body["route"].as_array().unwrap();
    assert_eq!(route.len(), state.config.route_steps + 1);
    assert_eq!(route[0], json!([37.7749, -122.4194]));
    for point in route {
        let lat = point[0].as_f64().unwrap();
        let lon = point[1].as_f64().unwrap();
        assert!((-90.0..=90.0).contains(&lat));
        assert!((-180.0..=180.0).contains(&lon));
    }

    assert_eq!(body["routes"].as_array().unwrap().len(), 3);
    assert_eq!(body["distances"].as_array().unwrap().len(), 3);
    assert_eq!(body["polylines"].as_array().unwrap().len(), 3);
    assert_eq!(body["geometry"]["type"], "LineString");
    assert_eq!(body["difficulty"], "medium");
    assert_eq!(body["duration"], 1800);
    // No API key configured in tests
    assert!(body["weather"].is_null());
}

#[tokio::test]
async fn test_generate_route_with_many_steps() {
    let config = Config {
        route_steps: 5000,
        ..Config::default()
    };
    let (app, _state) = common::create_test_app_with_config(config);

    let response = app
        .oneshot(post_json(
            "/api/generate-route",
            json!({"lat": 37.7749, "lon": -122.4194, "distance": 3.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_variant_lengths_track_request() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/generate-route",
            json!({"lat": 45.0, "lon": 7.0, "distance": 5.0}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;

    let distances: Vec<f64> = body["distances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_f64().unwrap())
        .collect();
    for (measured, target) in distances.iter().zip([4.5, 5.0, 5.5]) {
        assert!(
            (measured - target).abs() / target < 0.05,
            "measured {} vs target {}",
            measured,
            target
        );
    }
    assert!(body["duration"].is_null());
}

#[tokio::test]
async fn test_generate_route_missing_params() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(post_json("/api/generate-route", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_generate_route_out_of_range() {
    let cases = [
        json!({"lat": 91.0, "lon": 0.0, "distance": 3.0}),
        json!({"lat": 0.0, "lon": -181.0, "distance": 3.0}),
        json!({"lat": 0.0, "lon": 0.0, "distance": 0.1}),
        json!({"lat": 0.0, "lon": 0.0, "distance": 25.0}),
        json!({"lat": 0.0, "lon": 0.0, "distance": 3.0, "duration": -5}),
    ];

    for case in cases {
        let (app, _state) = common::create_test_app();
        let response = app
            .oneshot(post_json("/api/generate-route", case.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "case {}", case);
    }
}

#[tokio::test]
async fn test_generate_route_malformed_json() {
    let (app, _state) = common::create_test_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/generate-route")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"lat\": 37.7"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}
