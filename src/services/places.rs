// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dog-friendly place search via the OpenStreetMap Overpass API.

use crate::error::AppError;
use crate::models::{Coordinate, DogSpot};
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// OSM tags searched for, as (key, value).
const SPOT_TAGS: &[(&str, &str)] = &[
    ("leisure", "dog_park"),
    ("leisure", "park"),
    ("amenity", "drinking_water"),
];

/// Overpass server-side timeout, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Searches for dog parks, parks and drinking water near a coordinate.
#[derive(Clone)]
pub struct PlacesService {
    http: reqwest::Client,
    overpass_url: String,
}

impl PlacesService {
    pub fn new(overpass_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            overpass_url: overpass_url.into(),
        }
    }

    /// Spots within `radius_m` meters of `around`.
    pub async fn nearby(
        &self,
        around: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<DogSpot>, AppError> {
        let query = build_query(around, radius_m);

        let response = self
            .http
            .post(&self.overpass_url)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Place search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!("Overpass rate limit hit (429)");
            }
            return Err(AppError::Upstream(format!(
                "Place search HTTP {}: {}",
                status, body
            )));
        }

        let body: OverpassResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Place search JSON parse error: {}", e)))?;

        let spots = body.into_spots();
        tracing::debug!(
            lat = around.lat(),
            lon = around.lon(),
            radius_m,
            count = spots.len(),
            "Found dog spots"
        );
        Ok(spots)
    }
}

/// Build an Overpass QL query for every tag in `SPOT_TAGS`.
fn build_query(around: Coordinate, radius_m: u32) -> String {
    let clauses: String = SPOT_TAGS
        .iter()
        .map(|(key, value)| {
            format!(
                "node[\"{}\"=\"{}\"](around:{},{},{});",
                key,
                value,
                radius_m,
                around.lat(),
                around.lon()
            )
        })
        .collect();
    format!(
        "[out:json][timeout:{}];({});out body;",
        QUERY_TIMEOUT_SECS, clauses
    )
}

/// Overpass JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassResponse {
    /// Convert elements to spots, in response order. Elements without a
    /// position (ways/relations without center) are skipped.
    pub fn into_spots(self) -> Vec<DogSpot> {
        self.elements
            .into_iter()
            .filter_map(|el| {
                let (lat, lon) = (el.lat?, el.lon?);
                let kind = el
                    .tags
                    .get("leisure")
                    .or_else(|| el.tags.get("amenity"))
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                let name = el
                    .tags
                    .get("name")
                    .cloned()
                    .unwrap_or_else(|| "Unnamed".to_string());
                Some(DogSpot {
                    name,
                    kind,
                    lat,
                    lon,
                })
            })
            .collect()
    }
}
