// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walking route model and geometry conversions.

use crate::models::Coordinate;
use geo::{Distance, Haversine, LineString};
use serde::{Deserialize, Serialize};

/// Minimum number of points in a route.
pub const MIN_ROUTE_POINTS: usize = 2;
/// Maximum number of points accepted in a stored route.
pub const MAX_ROUTE_POINTS: usize = 5000;

/// An ordered, immutable sequence of coordinates (at least two).
///
/// `MAX_ROUTE_POINTS` bounds routes accepted from clients and stores, not
/// routes built in-process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Route(Vec<Coordinate>);

impl Route {
    pub fn new(points: Vec<Coordinate>) -> Result<Self, RouteShapeError> {
        if points.len() < MIN_ROUTE_POINTS {
            return Err(RouteShapeError::TooShort(points.len()));
        }
        Ok(Self(points))
    }

    /// Build a route from `[lat, lon]` pairs as sent by clients.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self, RouteShapeError> {
        if pairs.len() > MAX_ROUTE_POINTS {
            return Err(RouteShapeError::TooLong(pairs.len()));
        }
        let points = pairs
            .iter()
            .enumerate()
            .map(|(i, [lat, lon])| {
                Coordinate::new(*lat, *lon).map_err(|e| RouteShapeError::Point(i, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn origin(&self) -> Coordinate {
        self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Great-circle length along the route, in kilometers.
    pub fn length_km(&self) -> f64 {
        self.0
            .windows(2)
            .map(|w| {
                let a: geo::Point<f64> = w[0].into();
                let b: geo::Point<f64> = w[1].into();
                Haversine.distance(a, b)
            })
            .sum::<f64>()
            / 1000.0
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::from(
            self.0
                .iter()
                .map(|&c| geo::Coord::from(c))
                .collect::<Vec<_>>(),
        )
    }

    /// Google encoded polyline at precision 5 (the format map SDKs expect).
    pub fn encode_polyline(&self) -> Result<String, RouteShapeError> {
        polyline::encode_coordinates(self.to_line_string(), 5)
            .map_err(|e| RouteShapeError::Polyline(e.to_string()))
    }

    /// GeoJSON `LineString` geometry (positions are `[lon, lat]`).
    pub fn to_geojson(&self) -> geojson::Geometry {
        let positions = self.0.iter().map(|c| vec![c.lon(), c.lat()]).collect();
        geojson::Geometry::new(geojson::Value::LineString(positions))
    }

    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(|c| c.to_pair()).collect()
    }
}

impl TryFrom<Vec<Coordinate>> for Route {
    type Error = RouteShapeError;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Route::new(points)
    }
}

impl From<Route> for Vec<Coordinate> {
    fn from(route: Route) -> Self {
        route.0
    }
}

/// Errors for malformed routes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteShapeError {
    #[error("route needs at least {MIN_ROUTE_POINTS} points, got {0}")]
    TooShort(usize),

    #[error("route has {0} points, limit is {MAX_ROUTE_POINTS}")]
    TooLong(usize),

    #[error("route point {0}: {1}")]
    Point(usize, String),

    #[error("failed to encode polyline: {0}")]
    Polyline(String),
}
