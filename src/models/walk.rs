// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk record model for storage and the save path.

use crate::models::route::MAX_ROUTE_POINTS;
use crate::models::{Coordinate, Route};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Walks up to this distance (km) are easy.
pub const EASY_MAX_KM: f64 = 2.0;
/// Walks up to this distance (km) are medium; longer ones are hard.
pub const MEDIUM_MAX_KM: f64 = 4.0;

pub const MAX_PARK_NAME_LEN: usize = 100;

/// Coarse, distance-derived walk difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_distance_km(distance_km: f64) -> Self {
        if distance_km <= EASY_MAX_KM {
            Difficulty::Easy
        } else if distance_km <= MEDIUM_MAX_KM {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// Case-insensitive; "moderate" is the legacy label for medium.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "moderate" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                s
            )),
        }
    }
}

/// Stored walk record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkRecord {
    /// Ledger-assigned ID (also used as document ID)
    pub id: u64,
    /// Starting point
    pub origin: Coordinate,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Duration in seconds (absent on older records)
    #[serde(default)]
    pub duration_secs: Option<u32>,
    /// Creation time
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Weather snapshot: temperature in °C
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Weather snapshot: short condition label ("Clear", "Rain", ...)
    #[serde(default)]
    pub condition: Option<String>,
    /// Weather snapshot: free text description
    #[serde(default)]
    pub description: Option<String>,
    /// Points of interest visited, in visit order
    #[serde(default)]
    pub dog_parks_visited: Vec<String>,
    pub difficulty: Difficulty,
    /// Walked or generated route
    #[serde(default)]
    pub route: Option<Route>,
}

/// A walk ready to be saved. The ledger validates it and assigns the ID.
#[derive(Debug, Clone, Validate)]
pub struct NewWalk {
    pub origin: Coordinate,
    #[validate(
        range(min = 0.5, max = 50.0, message = "distance must be between 0.5 and 50 km"),
        custom(function = "validate_finite")
    )]
    pub distance_km: f64,
    #[validate(range(max = 86400, message = "duration must be at most 24 hours"))]
    pub duration_secs: u32,
    /// Defaults to now when absent.
    pub timestamp: Option<DateTime<Utc>>,
    #[validate(
        range(min = -100.0, max = 100.0, message = "temperature must be between -100 and 100 °C"),
        custom(function = "validate_finite")
    )]
    pub temperature: Option<f64>,
    #[validate(length(max = 50, message = "condition must be at most 50 characters"))]
    pub condition: Option<String>,
    #[validate(length(max = 200, message = "description must be at most 200 characters"))]
    pub description: Option<String>,
    #[validate(
        length(max = 50, message = "at most 50 dog parks per walk"),
        custom(function = "validate_park_names")
    )]
    pub dog_parks_visited: Vec<String>,
    /// Derived from the distance when absent.
    pub difficulty: Option<Difficulty>,
    #[validate(custom(function = "validate_route_size"))]
    pub route: Option<Route>,
}

impl NewWalk {
    /// Minimal walk with the required fields only.
    pub fn new(origin: Coordinate, distance_km: f64, duration_secs: u32) -> Self {
        Self {
            origin,
            distance_km,
            duration_secs,
            timestamp: None,
            temperature: None,
            condition: None,
            description: None,
            dog_parks_visited: Vec::new(),
            difficulty: None,
            route: None,
        }
    }

    /// Finalize into a record, filling defaults. The ID is assigned by the store.
    pub(crate) fn into_record(self, now: DateTime<Utc>) -> WalkRecord {
        WalkRecord {
            id: 0,
            origin: self.origin,
            distance_km: self.distance_km,
            duration_secs: Some(self.duration_secs),
            timestamp: self.timestamp.unwrap_or(now),
            temperature: self.temperature,
            condition: self.condition,
            description: self.description,
            dog_parks_visited: self.dog_parks_visited,
            difficulty: self
                .difficulty
                .unwrap_or_else(|| Difficulty::from_distance_km(self.distance_km)),
            route: self.route,
        }
    }
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite").with_message("must be a finite number".into()))
    }
}

fn validate_route_size(route: &Route) -> Result<(), ValidationError> {
    if route.len() > MAX_ROUTE_POINTS {
        return Err(ValidationError::new("route_too_long")
            .with_message(format!("route must have at most {MAX_ROUTE_POINTS} points").into()));
    }
    Ok(())
}

fn validate_park_names(names: &[String]) -> Result<(), ValidationError> {
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("empty_park_name")
                .with_message("dog park names must not be empty".into()));
        }
        if trimmed.chars().count() > MAX_PARK_NAME_LEN {
            return Err(ValidationError::new("park_name_too_long")
                .with_message("dog park names must be at most 100 characters".into()));
        }
    }
    Ok(())
}
