// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process walk store for local development and tests.

use crate::db::filter::{newest_first, WalkFilter};
use crate::error::AppError;
use crate::models::WalkRecord;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Walk store backed by a concurrent map. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    walks: Arc<DashMap<u64, WalkRecord>>,
    last_id: Arc<AtomicU64>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a walk, assigning the next ID.
    pub fn insert_walk(&self, mut record: WalkRecord) -> Result<u64, AppError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        record.id = id;
        self.walks.insert(id, record);
        Ok(id)
    }

    pub fn get_walk(&self, id: u64) -> Option<WalkRecord> {
        self.walks.get(&id).map(|r| r.clone())
    }

    /// All walks matching `filter`, newest first.
    pub fn query_walks(&self, filter: &WalkFilter) -> Result<Vec<WalkRecord>, AppError> {
        let mut walks: Vec<WalkRecord> = self
            .walks
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        walks.sort_by(newest_first);
        Ok(walks)
    }

    /// Delete every walk. IDs keep increasing afterwards.
    pub fn clear_walks(&self) -> usize {
        let mut removed = 0;
        self.walks.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }
}
