// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod coordinate;
pub mod place;
pub mod route;
pub mod walk;
pub mod weather;

pub use coordinate::{Coordinate, CoordinateError};
pub use place::DogSpot;
pub use route::{Route, RouteShapeError};
pub use walk::{Difficulty, NewWalk, WalkRecord};
pub use weather::{Recommendation, WeatherSnapshot};
