// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather snapshot and walk recommendation.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Comfortable walking range for dogs (°C).
const GOOD_MIN_CELSIUS: f64 = 5.0;
const GOOD_MAX_CELSIUS: f64 = 25.0;
/// Outside this range a walk is not recommended (°C).
const POOR_MIN_CELSIUS: f64 = -5.0;
const POOR_MAX_CELSIUS: f64 = 35.0;

/// OpenWeather condition groups that rule out a walk.
const SEVERE_CONDITIONS: &[&str] = &["thunderstorm", "snow", "tornado", "squall"];
/// Condition groups that downgrade an otherwise good walk.
const WET_CONDITIONS: &[&str] = &["rain", "drizzle"];

/// Current weather at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct WeatherSnapshot {
    /// Temperature in °C
    pub temperature: f64,
    /// Condition group (e.g. "Clear", "Rain")
    pub condition: String,
    /// Human readable description (e.g. "light rain")
    pub description: String,
    /// Provider icon code (e.g. "01d")
    pub icon: Option<String>,
    pub recommendation: Recommendation,
}

impl WeatherSnapshot {
    pub fn new(
        temperature: f64,
        condition: String,
        description: String,
        icon: Option<String>,
    ) -> Self {
        let recommendation = Recommendation::assess(temperature, &condition);
        Self {
            temperature,
            condition,
            description,
            icon,
            recommendation,
        }
    }
}

/// Whether the current weather suits a dog walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub enum Recommendation {
    Good,
    Fair,
    Poor,
}

impl Recommendation {
    pub fn assess(temperature: f64, condition: &str) -> Self {
        let condition = condition.to_ascii_lowercase();

        if SEVERE_CONDITIONS.contains(&condition.as_str())
            || !(POOR_MIN_CELSIUS..=POOR_MAX_CELSIUS).contains(&temperature)
        {
            return Recommendation::Poor;
        }

        if (GOOD_MIN_CELSIUS..=GOOD_MAX_CELSIUS).contains(&temperature)
            && !WET_CONDITIONS.contains(&condition.as_str())
        {
            Recommendation::Good
        } else {
            Recommendation::Fair
        }
    }
}
