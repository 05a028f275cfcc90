// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk Planner: dog-walk loop generation and walk history.
//!
//! This crate provides the backend API that synthesizes walking loops
//! around a starting point, annotates them with weather and nearby
//! dog-friendly spots, and keeps a ledger of completed walks.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::WalkDb;
use services::{
    LongitudeScale, PlacesService, RouteSynthesizer, SynthesisOptions, WalkLedger, WeatherService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub ledger: WalkLedger,
    pub synthesizer: RouteSynthesizer,
    pub weather_service: WeatherService,
    pub places_service: PlacesService,
}

impl AppState {
    /// Wire every service from `config` on top of the given store.
    pub fn new(config: Config, db: WalkDb) -> Self {
        let synthesizer = RouteSynthesizer::new(SynthesisOptions {
            steps: config.route_steps,
            longitude_scale: LongitudeScale::RunningLatitude,
            ..SynthesisOptions::default()
        });
        let weather_service = WeatherService::new(
            config.openweather_base_url.clone(),
            config.openweather_api_key.clone(),
        );
        let places_service = PlacesService::new(config.overpass_url.clone());

        Self {
            config,
            ledger: WalkLedger::new(db),
            synthesizer,
            weather_service,
            places_service,
        }
    }
}
