// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk ledger: validated saves and paginated history queries.

use crate::db::{WalkDb, WalkFilter};
use crate::error::{AppError, Result};
use crate::models::{NewWalk, WalkRecord};
use chrono::Utc;
use validator::Validate;

/// One page of walk history.
#[derive(Debug, Clone)]
pub struct WalkPage {
    pub items: Vec<WalkRecord>,
    /// 1-indexed page number that was requested
    pub page: u32,
    /// Total number of pages (0 when there are no matches)
    pub pages: u32,
    /// Total number of matching walks
    pub total: u32,
}

/// Store and query walk records.
#[derive(Clone)]
pub struct WalkLedger {
    db: WalkDb,
}

impl WalkLedger {
    pub fn new(db: WalkDb) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &WalkDb {
        &self.db
    }

    /// Validate and persist a walk. Returns the assigned ID.
    ///
    /// Validation failures write nothing. Storage failures leave no partial
    /// record behind and surface as `AppError::Database`.
    pub async fn save(&self, walk: NewWalk) -> Result<u64> {
        walk.validate()?;

        let record = walk.into_record(Utc::now());
        let distance_km = record.distance_km;
        let difficulty = record.difficulty;

        let id = self.db.insert_walk(record).await?;

        tracing::info!(
            walk_id = id,
            distance_km,
            %difficulty,
            backend = self.db.backend_name(),
            "Walk saved"
        );
        Ok(id)
    }

    /// Look up a single walk by ID.
    pub async fn get(&self, id: u64) -> Result<WalkRecord> {
        self.db
            .get_walk(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("walk {id}")))
    }

    /// Fetch one page of walks matching `filter`, newest first.
    ///
    /// Pages are 1-indexed. A page past the end yields an empty list.
    pub async fn query(&self, filter: &WalkFilter, page: u32, per_page: u32) -> Result<WalkPage> {
        if page < 1 {
            return Err(AppError::Validation(
                "page: must be greater than 0".to_string(),
            ));
        }
        if per_page < 1 {
            return Err(AppError::Validation(
                "per_page: must be greater than 0".to_string(),
            ));
        }

        let matches = self.db.query_walks(filter).await?;
        let total = matches.len();
        let pages = total.div_ceil(per_page as usize);

        // Use checked multiplication to prevent overflow on huge page numbers
        let start = (page as usize - 1).checked_mul(per_page as usize);
        let items = match start {
            Some(start) if start < total => matches
                .into_iter()
                .skip(start)
                .take(per_page as usize)
                .collect(),
            _ => Vec::new(),
        };

        tracing::debug!(
            ?filter,
            page,
            per_page,
            total,
            returned = items.len(),
            "Walk history queried"
        );

        Ok(WalkPage {
            items,
            page,
            pages: pages as u32,
            total: total as u32,
        })
    }

    /// Delete every walk (administrative reseed only).
    pub async fn clear(&self) -> Result<usize> {
        let count = self.db.clear_walks().await?;
        tracing::warn!(count, "Walk ledger cleared");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FirestoreDb, MemoryDb};
    use crate::models::{Coordinate, Difficulty};
    use chrono::{TimeZone, Utc};

    fn ledger() -> WalkLedger {
        WalkLedger::new(WalkDb::Memory(MemoryDb::new()))
    }

    fn walk(distance_km: f64) -> NewWalk {
        NewWalk::new(Coordinate::new(37.7749, -122.4194).unwrap(), distance_km, 1800)
    }

    #[tokio::test]
    async fn test_save_then_query_returns_it_first() {
        let ledger = ledger();
        let mut older = walk(2.0);
        older.timestamp = Some(Utc::now() - chrono::Duration::days(1));
        ledger.save(older).await.unwrap();

        let id = ledger.save(walk(3.5)).await.unwrap();

        let page = ledger.query(&WalkFilter::default(), 1, 10).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, id);
        assert_eq!(page.items[0].difficulty, Difficulty::Medium);
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let ledger = ledger();
        let a = ledger.save(walk(1.0)).await.unwrap();
        let b = ledger.save(walk(1.0)).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let ledger = ledger();
        let id = ledger.save(walk(2.5)).await.unwrap();
        let found = ledger.get(id).await.unwrap();
        assert_eq!(found.distance_km, 2.5);

        let err = ledger.get(id + 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_invalid_walk_writes_nothing() {
        let ledger = ledger();
        let err = ledger.save(walk(0.1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("distance_km")));

        let page = ledger.query(&WalkFilter::default(), 1, 10).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_validation() {
        let ledger = WalkLedger::new(WalkDb::Firestore(FirestoreDb::new_mock()));
        let err = ledger.save(walk(3.0)).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_pagination() {
        let ledger = ledger();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        for i in 0..5 {
            let mut w = walk(1.0 + i as f64);
            w.timestamp = Some(base + chrono::Duration::hours(i));
            ledger.save(w).await.unwrap();
        }

        let first = ledger.query(&WalkFilter::default(), 1, 2).await.unwrap();
        assert_eq!(first.pages, 3);
        assert_eq!(first.total, 5);
        let distances: Vec<f64> = first.items.iter().map(|w| w.distance_km).collect();
        assert_eq!(distances, vec![5.0, 4.0]);

        let last = ledger.query(&WalkFilter::default(), 3, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].distance_km, 1.0);

        let beyond = ledger.query(&WalkFilter::default(), 4, 2).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn test_huge_page_number_is_empty() {
        let ledger = ledger();
        ledger.save(walk(1.0)).await.unwrap();
        let page = ledger
            .query(&WalkFilter::default(), u32::MAX, 100)
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let err = ledger()
            .query(&WalkFilter::default(), 0, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_empty_ledger_has_zero_pages() {
        let page = ledger()
            .query(&WalkFilter::default(), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.pages, 0);
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_clear() {
        let ledger = ledger();
        ledger.save(walk(1.0)).await.unwrap();
        ledger.save(walk(2.0)).await.unwrap();
        assert_eq!(ledger.clear().await.unwrap(), 2);
        let page = ledger.query(&WalkFilter::default(), 1, 10).await.unwrap();
        assert_eq!(page.total, 0);
    }
}
