// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and carried in `AppState`.

use crate::services::places::DEFAULT_OVERPASS_URL;
use crate::services::synthesizer::DEFAULT_STEPS;
use crate::services::weather::DEFAULT_OPENWEATHER_BASE_URL;
use std::env;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PLACES_RADIUS_M: u32 = 1000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// GCP project ID. When unset, walks are kept in memory.
    pub gcp_project_id: Option<String>,
    /// OpenWeather API key. When unset, weather lookups report an upstream error.
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub overpass_url: String,
    /// Segments per synthesized route
    pub route_steps: usize,
    /// Default dog-spot search radius in meters
    pub places_radius_m: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            gcp_project_id: None,
            openweather_api_key: None,
            openweather_base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            route_steps: DEFAULT_STEPS,
            places_radius_m: DEFAULT_PLACES_RADIUS_M,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let route_steps = parse_var("ROUTE_STEPS", DEFAULT_STEPS)?;
        if route_steps == 0 {
            return Err(ConfigError::Invalid {
                name: "ROUTE_STEPS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port: parse_var("PORT", DEFAULT_PORT)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            gcp_project_id: optional_var("GCP_PROJECT_ID"),
            openweather_api_key: optional_var("OPENWEATHER_API_KEY"),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
            overpass_url: env::var("OVERPASS_URL")
                .unwrap_or_else(|_| DEFAULT_OVERPASS_URL.to_string()),
            route_steps,
            places_radius_m: parse_var("PLACES_RADIUS_M", DEFAULT_PLACES_RADIUS_M)?,
        })
    }
}

/// Non-empty trimmed value, or `None`.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
