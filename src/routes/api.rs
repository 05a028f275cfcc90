// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes: route generation, walk ledger, weather and dog spots.

use crate::db::WalkFilter;
use crate::error::{AppError, Result};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::models::{Coordinate, Difficulty, DogSpot, NewWalk, Route, WalkRecord, WeatherSnapshot};
use crate::services::{RouteSynthesizer, RouteVariant};
use crate::time_utils::{end_of_day_exclusive, format_utc_rfc3339, parse_date, start_of_day};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/generate-route", post(generate_route))
        .route("/api/save-walk", post(save_walk))
        .route("/api/walk-history", get(walk_history))
        .route("/api/walks/{id}", get(get_walk))
        .route("/api/weather", post(get_weather))
        .route("/api/dog-spots", post(get_dog_spots))
}

// ─── Route Generation ────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRouteRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub lon: f64,
    /// Requested loop length in kilometers
    #[validate(range(min = 0.5, max = 10.0, message = "distance must be between 0.5 and 10 km"))]
    pub distance: f64,
    /// Planned walk time in minutes
    #[validate(range(min = 0.0, max = 1440.0, message = "duration must be between 0 and 1440 minutes"))]
    pub duration: Option<f64>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct GenerateRouteResponse {
    /// Primary route as `[lat, lon]` pairs
    pub route: Vec<[f64; 2]>,
    /// Every variant, shortest target first
    pub routes: Vec<Vec<[f64; 2]>>,
    /// Measured great-circle length of each variant, km
    pub distances: Vec<f64>,
    /// Encoded polyline of each variant
    pub polylines: Vec<String>,
    /// Primary route as a GeoJSON LineString
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub geometry: geojson::Geometry,
    pub weather: Option<WeatherSnapshot>,
    pub difficulty: Difficulty,
    /// Planned duration in seconds
    pub duration: Option<u32>,
}

/// Synthesize the variants with a thread-local RNG. Kept synchronous so the
/// RNG never lives across an await point.
fn plan_variants(
    synthesizer: &RouteSynthesizer,
    origin: Coordinate,
    distance_km: f64,
) -> Vec<RouteVariant> {
    let mut rng = rand::thread_rng();
    synthesizer.synthesize_variants(origin, distance_km, &mut rng)
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

fn minutes_to_secs(minutes: f64) -> u32 {
    (minutes * 60.0).round() as u32
}

/// Generate walking loops around a starting point.
async fn generate_route(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<GenerateRouteRequest>,
) -> Result<Json<GenerateRouteResponse>> {
    let origin = Coordinate::new(req.lat, req.lon)?;

    let variants = plan_variants(&state.synthesizer, origin, req.distance);
    let primary = variants
        .iter()
        .min_by(|a, b| {
            (a.target_km - req.distance)
                .abs()
                .total_cmp(&(b.target_km - req.distance).abs())
        })
        .map(|v| v.route.clone())
        .ok_or_else(|| {
            AppError::GenerationFailure(format!(
                "no route could be generated for {} km",
                req.distance
            ))
        })?;

    let polylines = variants
        .iter()
        .map(|v| v.route.encode_polyline())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("polyline encoding failed: {}", e)))?;

    let weather = match state.weather_service.current(origin).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::debug!(error = %e, "Weather unavailable for generated route");
            None
        }
    };

    let duration = req.duration.map(minutes_to_secs);

    tracing::info!(
        lat = origin.lat(),
        lon = origin.lon(),
        distance_km = req.distance,
        variants = variants.len(),
        has_weather = weather.is_some(),
        "Routes generated"
    );

    Ok(Json(GenerateRouteResponse {
        route: primary.to_pairs(),
        routes: variants.iter().map(|v| v.route.to_pairs()).collect(),
        distances: variants
            .iter()
            .map(|v| round_km(v.route.length_km()))
            .collect(),
        polylines,
        geometry: primary.to_geojson(),
        weather,
        difficulty: Difficulty::from_distance_km(req.distance),
        duration,
    }))
}

// ─── Walk Ledger ─────────────────────────────────────────────

/// A visited dog park, either a bare name or a spot object with a name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ParkEntry {
    Name(String),
    Spot { name: String },
}

impl ParkEntry {
    fn into_name(self) -> String {
        match self {
            ParkEntry::Name(name) | ParkEntry::Spot { name } => name,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveWalkRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub lon: f64,
    /// Kilometers
    pub distance: f64,
    /// Seconds
    pub duration: u32,
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub dog_parks_visited: Vec<ParkEntry>,
    pub difficulty: Option<String>,
    /// `[lat, lon]` pairs
    pub route: Option<Vec<[f64; 2]>>,
}

impl TryFrom<SaveWalkRequest> for NewWalk {
    type Error = AppError;

    fn try_from(req: SaveWalkRequest) -> Result<Self> {
        let origin = Coordinate::new(req.lat, req.lon)?;
        let difficulty = req
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()
            .map_err(|e| AppError::Validation(format!("difficulty: {}", e)))?;
        let route = req.route.as_deref().map(Route::from_pairs).transpose()?;

        let mut walk = NewWalk::new(origin, req.distance, req.duration);
        walk.timestamp = req.timestamp;
        walk.temperature = req.temperature;
        walk.condition = req.condition;
        walk.description = req.description;
        walk.dog_parks_visited = req
            .dog_parks_visited
            .into_iter()
            .map(ParkEntry::into_name)
            .collect();
        walk.difficulty = difficulty;
        walk.route = route;
        Ok(walk)
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct SaveWalkResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub message: String,
}

/// Record a completed walk.
async fn save_walk(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SaveWalkRequest>,
) -> Result<(StatusCode, Json<SaveWalkResponse>)> {
    let walk = NewWalk::try_from(req)?;
    let id = state.ledger.save(walk).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveWalkResponse {
            id,
            message: "Walk saved".to_string(),
        }),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct WalkHistoryQuery {
    /// `YYYY-MM-DD`, inclusive
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive of the whole day
    pub end_date: Option<String>,
    #[validate(range(min = 0.0, message = "min_distance must not be negative"))]
    pub min_distance: Option<f64>,
    #[validate(range(min = 0.0, message = "max_distance must not be negative"))]
    pub max_distance: Option<f64>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    10
}

/// Parse an optional date parameter; blank counts as absent.
fn parse_date_param(name: &str, raw: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_date(s).map(Some).ok_or_else(|| {
            AppError::Validation(format!("{}: must be a date in YYYY-MM-DD format", name))
        }),
    }
}

impl WalkHistoryQuery {
    fn to_filter(&self) -> Result<WalkFilter> {
        let start = parse_date_param("start_date", self.start_date.as_deref())?;
        let end = parse_date_param("end_date", self.end_date.as_deref())?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::Validation(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_distance, self.max_distance) {
            if min > max {
                return Err(AppError::Validation(
                    "min_distance must not exceed max_distance".to_string(),
                ));
            }
        }

        Ok(WalkFilter {
            start: start.map(start_of_day),
            end: end.and_then(end_of_day_exclusive),
            min_distance_km: self.min_distance,
            max_distance_km: self.max_distance,
        })
    }
}

/// Walk as rendered in history.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct WalkResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    pub distance: f64,
    pub duration: Option<u32>,
    pub timestamp: String,
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub dog_parks_visited: Vec<String>,
    pub difficulty: Difficulty,
    pub route: Option<Vec<[f64; 2]>>,
}

impl From<WalkRecord> for WalkResponse {
    fn from(record: WalkRecord) -> Self {
        Self {
            id: record.id,
            lat: record.origin.lat(),
            lon: record.origin.lon(),
            distance: record.distance_km,
            duration: record.duration_secs,
            timestamp: format_utc_rfc3339(record.timestamp),
            temperature: record.temperature,
            condition: record.condition,
            description: record.description,
            dog_parks_visited: record.dog_parks_visited,
            difficulty: record.difficulty,
            route: record.route.map(|r| r.to_pairs()),
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct WalkHistoryResponse {
    pub page: u32,
    pub pages: u32,
    pub total: u32,
    pub items: Vec<WalkResponse>,
}

/// Paginated walk history, newest first.
async fn walk_history(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<WalkHistoryQuery>,
) -> Result<Json<WalkHistoryResponse>> {
    let filter = params.to_filter()?;
    let page = state
        .ledger
        .query(&filter, params.page, params.per_page)
        .await?;

    Ok(Json(WalkHistoryResponse {
        page: page.page,
        pages: page.pages,
        total: page.total,
        items: page.items.into_iter().map(WalkResponse::from).collect(),
    }))
}

/// A single saved walk.
async fn get_walk(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WalkResponse>> {
    let record = state.ledger.get(id).await?;
    Ok(Json(WalkResponse::from(record)))
}

// ─── Weather & Dog Spots ─────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub lon: f64,
}

/// Current weather and walk recommendation at a location.
async fn get_weather(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LocationRequest>,
) -> Result<Json<WeatherSnapshot>> {
    let at = Coordinate::new(req.lat, req.lon)?;
    let snapshot = state.weather_service.current(at).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize, Validate)]
pub struct DogSpotsRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub lon: f64,
    /// Search radius in meters
    #[validate(range(min = 100, max = 5000, message = "radius must be between 100 and 5000 m"))]
    pub radius: Option<u32>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct DogSpotsResponse {
    pub spots: Vec<DogSpot>,
}

/// Dog parks, parks and drinking water near a location.
async fn get_dog_spots(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<DogSpotsRequest>,
) -> Result<Json<DogSpotsResponse>> {
    let around = Coordinate::new(req.lat, req.lon)?;
    let radius_m = req.radius.unwrap_or(state.config.places_radius_m);
    let spots = state.places_service.nearby(around, radius_m).await?;
    Ok(Json(DogSpotsResponse { spots }))
}
