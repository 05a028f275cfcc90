// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map-free walking loop synthesis.
//!
//! A route is a random walk: start on a uniform random bearing, then for
//! each segment turn by a bounded random amount and step a fixed distance.
//! Positions are projected with a flat-Earth approximation, which is
//! accurate to well under a percent for walks of a few kilometers.
//!
//! The randomness source is injected so callers can pin it with a seeded
//! RNG; production code uses `rand::thread_rng()`.

use crate::models::{Coordinate, Route};
use rand::Rng;

/// Kilometers per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.0;
/// Default number of segments in a synthesized route.
pub const DEFAULT_STEPS: usize = 10;
/// Default maximum heading change per segment, in degrees.
pub const DEFAULT_MAX_TURN_DEG: f64 = 45.0;
/// Distance multipliers for the route choices offered per request.
pub const VARIANT_SCALES: [f64; 3] = [0.9, 1.0, 1.1];

/// Keeps the longitude scale finite at the poles.
const MIN_COS_LATITUDE: f64 = 1e-6;

/// Which latitude sets the kilometers-per-degree of longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongitudeScale {
    /// Latitude of the point being extended (compounds as the walk drifts).
    #[default]
    RunningLatitude,
    /// Latitude of the route origin for every segment.
    OriginLatitude,
}

/// Tuning for route synthesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisOptions {
    pub steps: usize,
    pub max_turn_deg: f64,
    pub longitude_scale: LongitudeScale,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            max_turn_deg: DEFAULT_MAX_TURN_DEG,
            longitude_scale: LongitudeScale::default(),
        }
    }
}

/// Errors from route synthesis. Nothing is produced on error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("distance must be a positive number of kilometers, got {0}")]
    InvalidDistance(f64),

    #[error("steps must be at least 1")]
    InvalidSteps,

    #[error("max turn must be within [0, 180] degrees, got {0}")]
    InvalidTurn(f64),
}

/// Synthesize one route of `steps` segments totalling `distance_km`.
///
/// Returns `steps + 1` coordinates starting exactly at `origin`.
pub fn synthesize<R: Rng + ?Sized>(
    origin: Coordinate,
    distance_km: f64,
    steps: usize,
    rng: &mut R,
) -> Result<Route, RouteError> {
    RouteSynthesizer::new(SynthesisOptions {
        steps,
        ..SynthesisOptions::default()
    })
    .synthesize(origin, distance_km, rng)
}

/// Route synthesizer carrying its tuning options.
#[derive(Debug, Clone, Default)]
pub struct RouteSynthesizer {
    options: SynthesisOptions,
}

impl RouteSynthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        origin: Coordinate,
        distance_km: f64,
        rng: &mut R,
    ) -> Result<Route, RouteError> {
        let SynthesisOptions {
            steps,
            max_turn_deg,
            longitude_scale,
        } = self.options;

        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(RouteError::InvalidDistance(distance_km));
        }
        if steps == 0 {
            return Err(RouteError::InvalidSteps);
        }
        if !(0.0..=180.0).contains(&max_turn_deg) {
            return Err(RouteError::InvalidTurn(max_turn_deg));
        }

        let segment_km = distance_km / steps as f64;
        let mut bearing: f64 = rng.gen_range(0.0..360.0);
        let mut current = origin;
        let mut points = Vec::with_capacity(steps + 1);
        points.push(origin);

        for _ in 0..steps {
            let turn: f64 = rng.gen_range(-max_turn_deg..=max_turn_deg);
            bearing = (bearing + turn).rem_euclid(360.0);

            let scale_lat = match longitude_scale {
                LongitudeScale::RunningLatitude => current.lat(),
                LongitudeScale::OriginLatitude => origin.lat(),
            };
            let (sin_b, cos_b) = bearing.to_radians().sin_cos();
            let dlat = segment_km * cos_b / KM_PER_DEGREE;
            let cos_lat = scale_lat.to_radians().cos().max(MIN_COS_LATITUDE);
            let dlon = segment_km * sin_b / (KM_PER_DEGREE * cos_lat);

            current = Coordinate::normalized(current.lat() + dlat, current.lon() + dlon);
            points.push(current);
        }

        // steps >= 1 gives at least two points
        Route::new(points).map_err(|_| RouteError::InvalidSteps)
    }

    /// Synthesize the route choices for a request (0.9×, 1.0×, 1.1× the
    /// requested distance). Failed variants are skipped; the result may be
    /// empty only if every variant failed.
    pub fn synthesize_variants<R: Rng + ?Sized>(
        &self,
        origin: Coordinate,
        distance_km: f64,
        rng: &mut R,
    ) -> Vec<RouteVariant> {
        VARIANT_SCALES
            .iter()
            .filter_map(|&scale| {
                let target_km = distance_km * scale;
                match self.synthesize(origin, target_km, rng) {
                    Ok(route) => Some(RouteVariant { target_km, route }),
                    Err(e) => {
                        tracing::warn!(error = %e, target_km, "Skipping route variant");
                        None
                    }
                }
            })
            .collect()
    }
}

/// One synthesized route choice and the distance it was built for.
#[derive(Debug, Clone)]
pub struct RouteVariant {
    pub target_km: f64,
    pub route: Route,
}
