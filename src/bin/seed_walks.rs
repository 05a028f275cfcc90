// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reset the Firestore walk ledger and fill it with sample walks.
//!
//! Usage: GCP_PROJECT_ID=<project> cargo run --bin seed_walks [count]

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walk_planner::config::{Config, ConfigError};
use walk_planner::db::{FirestoreDb, WalkDb};
use walk_planner::models::{Coordinate, Difficulty, NewWalk};
use walk_planner::services::{synthesize, WalkLedger};

const DEFAULT_COUNT: u32 = 11;
const CONDITIONS: &[&str] = &["Sunny", "Cloudy", "Rainy"];
const PARK_SETS: &[&[&str]] = &[&["Park A"], &["Park B"], &["Park A", "Park C"]];
const DIFFICULTIES: &[Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("walk_planner=info".parse().unwrap())
                .add_directive("seed_walks=info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let count = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<u32>()?,
        None => DEFAULT_COUNT,
    };

    let config = Config::from_env()?;
    let project_id = config
        .gcp_project_id
        .as_deref()
        .ok_or(ConfigError::Missing("GCP_PROJECT_ID"))?;

    let ledger = WalkLedger::new(WalkDb::Firestore(FirestoreDb::new(project_id).await?));

    let removed = ledger.clear().await?;
    tracing::info!(removed, "Cleared existing walks");

    let now = Utc::now();
    for i in 0..count {
        let walk = sample_walk(now - Duration::days(i64::from(i)), config.route_steps)?;
        ledger.save(walk).await?;
    }

    tracing::info!(count, "Seeded walks");
    Ok(())
}

/// One plausible walk around San Francisco at `timestamp`.
fn sample_walk(
    timestamp: chrono::DateTime<Utc>,
    steps: usize,
) -> Result<NewWalk, Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();

    let origin = Coordinate::new(
        37.77 + rng.gen_range(-0.01..=0.01),
        -122.42 + rng.gen_range(-0.01..=0.01),
    )?;
    let distance_km = (rng.gen_range(1.0..=5.0_f64) * 100.0).round() / 100.0;

    let mut walk = NewWalk::new(origin, distance_km, rng.gen_range(1200..=5400));
    walk.timestamp = Some(timestamp);
    walk.temperature = Some(f64::from(rng.gen_range(15..=30_i32)));
    walk.condition = CONDITIONS.choose(&mut rng).map(|c| c.to_string());
    walk.dog_parks_visited = PARK_SETS
        .choose(&mut rng)
        .map(|parks| parks.iter().map(|p| p.to_string()).collect())
        .unwrap_or_default();
    walk.difficulty = DIFFICULTIES.choose(&mut rng).copied();
    walk.route = Some(synthesize(origin, distance_km, steps, &mut rng)?);
    Ok(walk)
}
