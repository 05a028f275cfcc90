// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, or an in-process store for development).

pub mod filter;
pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use filter::WalkFilter;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::WalkRecord;

/// Collection names as constants.
pub mod collections {
    pub const WALKS: &str = "walks";
}

/// Walk store backend.
#[derive(Clone)]
pub enum WalkDb {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl WalkDb {
    pub fn backend_name(&self) -> &'static str {
        match self {
            WalkDb::Firestore(_) => "firestore",
            WalkDb::Memory(_) => "memory",
        }
    }

    /// Insert a new walk; the store assigns and returns its ID.
    pub async fn insert_walk(&self, record: WalkRecord) -> Result<u64, AppError> {
        match self {
            WalkDb::Firestore(db) => db.insert_walk(record).await,
            WalkDb::Memory(db) => db.insert_walk(record),
        }
    }

    pub async fn get_walk(&self, id: u64) -> Result<Option<WalkRecord>, AppError> {
        match self {
            WalkDb::Firestore(db) => db.get_walk(id).await,
            WalkDb::Memory(db) => Ok(db.get_walk(id)),
        }
    }

    /// All walks matching `filter`, newest first (ties: highest ID first).
    pub async fn query_walks(&self, filter: &WalkFilter) -> Result<Vec<WalkRecord>, AppError> {
        match self {
            WalkDb::Firestore(db) => db.query_walks(filter).await,
            WalkDb::Memory(db) => db.query_walks(filter),
        }
    }

    /// Delete every walk. Returns the number deleted.
    pub async fn clear_walks(&self) -> Result<usize, AppError> {
        match self {
            WalkDb::Firestore(db) => db.clear_walks().await,
            WalkDb::Memory(db) => Ok(db.clear_walks()),
        }
    }
}
