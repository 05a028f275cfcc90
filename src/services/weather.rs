// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenWeather client for current conditions at a walk's origin.

use crate::error::AppError;
use crate::models::{Coordinate, WeatherSnapshot};
use serde::Deserialize;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current-weather lookups. Without an API key every lookup fails with
/// `AppError::Upstream`, which callers treat as "no weather".
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherService {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current weather (metric units) at `at`.
    pub async fn current(&self, at: Coordinate) -> Result<WeatherSnapshot, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("Weather API key not configured".to_string()))?;

        let url = format!("{}/weather", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", at.lat().to_string()),
                ("lon", at.lon().to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Weather request failed: {}", e)))?;

        let body: OpenWeatherResponse = check_response_json(response).await?;
        let snapshot = body.into_snapshot()?;

        tracing::debug!(
            lat = at.lat(),
            lon = at.lon(),
            temperature = snapshot.temperature,
            condition = %snapshot.condition,
            "Fetched weather"
        );
        Ok(snapshot)
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Weather API rate limit hit (429)");
            return Err(AppError::Upstream("Weather API rate limited".to_string()));
        }

        return Err(AppError::Upstream(format!(
            "Weather API HTTP {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Weather JSON parse error: {}", e)))
}

/// Subset of the OpenWeather current-weather response.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherResponse {
    pub main: OpenWeatherMain,
    #[serde(default)]
    pub weather: Vec<OpenWeatherCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
}

impl OpenWeatherResponse {
    /// Convert to a snapshot using the first reported condition.
    pub fn into_snapshot(self) -> Result<WeatherSnapshot, AppError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream("Weather response has no conditions".to_string()))?;

        Ok(WeatherSnapshot::new(
            self.main.temp,
            condition.main,
            condition.description,
            condition.icon,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recommendation;

    #[test]
    fn test_parse_current_weather() {
        let json = r#"{
            "main": {"temp": 18.5, "humidity": 60},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "name": "San Francisco"
        }"#;
        let parsed: OpenWeatherResponse = serde_json::from_str(json).unwrap();
        let snapshot = parsed.into_snapshot().unwrap();

        assert_eq!(snapshot.temperature, 18.5);
        assert_eq!(snapshot.condition, "Clear");
        assert_eq!(snapshot.description, "clear sky");
        assert_eq!(snapshot.icon.as_deref(), Some("01d"));
        assert_eq!(snapshot.recommendation, Recommendation::Good);
    }

    #[test]
    fn test_missing_conditions_is_upstream_error() {
        let parsed: OpenWeatherResponse =
            serde_json::from_str(r#"{"main": {"temp": 10.0}, "weather": []}"#).unwrap();
        assert!(matches!(
            parsed.into_snapshot(),
            Err(AppError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_fails_without_network() {
        let service = WeatherService::new(DEFAULT_OPENWEATHER_BASE_URL, None);
        assert!(!service.is_configured());
        let err = service
            .current(Coordinate::new(37.7749, -122.4194).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
