// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! History filters and ordering shared by every store backend.

use crate::models::WalkRecord;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// AND-combined filters over walk history. All bounds are optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkFilter {
    /// Inclusive lower bound on `timestamp`.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `timestamp`.
    pub end: Option<DateTime<Utc>>,
    /// Inclusive lower bound on distance (km).
    pub min_distance_km: Option<f64>,
    /// Inclusive upper bound on distance (km).
    pub max_distance_km: Option<f64>,
}

impl WalkFilter {
    pub fn matches_time(&self, record: &WalkRecord) -> bool {
        self.start.map_or(true, |start| record.timestamp >= start)
            && self.end.map_or(true, |end| record.timestamp < end)
    }

    pub fn matches_distance(&self, record: &WalkRecord) -> bool {
        self.min_distance_km
            .map_or(true, |min| record.distance_km >= min)
            && self
                .max_distance_km
                .map_or(true, |max| record.distance_km <= max)
    }

    pub fn matches(&self, record: &WalkRecord) -> bool {
        self.matches_time(record) && self.matches_distance(record)
    }
}

/// Most recent first; ties broken by ID, highest first.
pub fn newest_first(a: &WalkRecord, b: &WalkRecord) -> Ordering {
    b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id))
}
