//! In-memory result store.
//!
//! Useful for tests and for running the server without a database file.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use crate::db::{GameResult, NewGameResult, ResultStore, StoreError};

/// Thread-safe result store backed by a `Vec`.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResultStore {
    results: Arc<RwLock<Vec<GameResult>>>,
}

impl InMemoryResultStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored results.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        let results = self
            .results
            .read()
            .map_err(|_| StoreError::lock_poisoned("read"))?;
        Ok(results.len())
    }

    /// Returns `true` when nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    #[instrument(skip(self, result), fields(player = %result.player(), difficulty = %result.difficulty()))]
    async fn save(&self, result: NewGameResult) -> Result<GameResult, StoreError> {
        let mut results = self
            .results
            .write()
            .map_err(|_| StoreError::lock_poisoned("write"))?;

        let id = i32::try_from(results.len() + 1)
            .map_err(|_| StoreError::new("Result id space exhausted"))?;
        let saved = GameResult::new(
            id,
            result.player().clone(),
            result.difficulty().clone(),
            *result.points(),
            Utc::now().naive_utc(),
        );
        results.push(saved.clone());

        debug!(result_id = id, "Game result stored in memory");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn top_by_difficulty(
        &self,
        difficulty: &str,
        limit: usize,
    ) -> Result<Vec<GameResult>, StoreError> {
        let results = self
            .results
            .read()
            .map_err(|_| StoreError::lock_poisoned("read"))?;

        let mut matching: Vec<GameResult> = results
            .iter()
            .filter(|r| r.difficulty() == difficulty)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.points().total_cmp(a.points()).then(a.id().cmp(b.id())));
        matching.truncate(limit);

        debug!(count = matching.len(), "Ranking computed in memory");
        Ok(matching)
    }
}
