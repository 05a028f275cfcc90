// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod ledger;
pub mod places;
pub mod synthesizer;
pub mod weather;

pub use ledger::{WalkLedger, WalkPage};
pub use places::PlacesService;
pub use synthesizer::{
    synthesize, LongitudeScale, RouteError, RouteSynthesizer, RouteVariant, SynthesisOptions,
};
pub use weather::WeatherService;
