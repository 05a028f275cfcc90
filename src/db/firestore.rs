// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed walk operations.
//!
//! Walks live in one collection keyed by their numeric ID. Records are
//! written once with create-if-absent semantics and never updated.

use crate::db::collections;
use crate::db::filter::{newest_first, WalkFilter};
use crate::error::AppError;
use crate::models::WalkRecord;
use firestore::errors::FirestoreError;
use firestore::FirestoreTimestamp;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;
/// Attempts to claim a fresh ID when concurrent saves collide.
const MAX_INSERT_ATTEMPTS: usize = 5;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Walk Operations ─────────────────────────────────────────

    /// Get a walk by ID.
    pub async fn get_walk(&self, id: u64) -> Result<Option<WalkRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WALKS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Highest walk ID currently stored (0 when empty).
    async fn max_walk_id(&self) -> Result<u64, AppError> {
        let latest: Vec<WalkRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WALKS)
            .order_by([("id", firestore::FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(latest.first().map(|w| w.id).unwrap_or(0))
    }

    /// Insert a walk under the next free ID.
    ///
    /// The insert is a single create-if-absent document write, so it either
    /// lands completely or not at all. If a concurrent save claimed the same
    /// ID the write is rejected and retried with a fresh one.
    pub async fn insert_walk(&self, mut record: WalkRecord) -> Result<u64, AppError> {
        let client = self.get_client()?;

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let id = self.max_walk_id().await? + 1;
            record.id = id;

            let result: Result<WalkRecord, FirestoreError> = client
                .fluent()
                .insert()
                .into(collections::WALKS)
                .document_id(id.to_string())
                .object(&record)
                .execute()
                .await;

            match result {
                Ok(_) => {
                    tracing::debug!(walk_id = id, attempt, "Walk inserted");
                    return Ok(id);
                }
                Err(FirestoreError::DataConflictError(_)) => {
                    tracing::warn!(walk_id = id, attempt, "Walk ID already taken, retrying");
                }
                Err(e) => return Err(AppError::Database(e.to_string())),
            }
        }

        Err(AppError::Database(format!(
            "Could not claim a walk ID after {} attempts",
            MAX_INSERT_ATTEMPTS
        )))
    }

    /// All walks matching `filter`, newest first.
    ///
    /// The date range and ordering run in Firestore. Distance bounds are
    /// applied here, since Firestore wants a composite index per pair of
    /// range-filtered fields.
    pub async fn query_walks(&self, filter: &WalkFilter) -> Result<Vec<WalkRecord>, AppError> {
        let start = filter.start;
        let end = filter.end;

        let mut walks: Vec<WalkRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WALKS)
            .filter(move |q| {
                q.for_all([
                    start.and_then(|s| {
                        q.field("timestamp")
                            .greater_than_or_equal(FirestoreTimestamp(s))
                    }),
                    end.and_then(|e| q.field("timestamp").less_than(FirestoreTimestamp(e))),
                ])
            })
            .order_by([
                ("timestamp", firestore::FirestoreQueryDirection::Descending),
                ("id", firestore::FirestoreQueryDirection::Descending),
            ])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        walks.retain(|w| filter.matches_distance(w));
        walks.sort_by(newest_first);
        Ok(walks)
    }

    /// Delete every walk. Returns the number of documents deleted.
    pub async fn clear_walks(&self) -> Result<usize, AppError> {
        let walks: Vec<WalkRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WALKS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = walks.len();
        self.batch_delete(&walks, collections::WALKS, |w: &WalkRecord| {
            w.id.to_string()
        })
        .await?;

        tracing::info!(count, "Cleared walks");
        Ok(count)
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}
