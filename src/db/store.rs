//! The persistence seam used by the HTTP handlers.

use async_trait::async_trait;

use crate::db::{GameResult, NewGameResult, StoreError};

/// Maximum number of results returned by a ranking query.
pub const RANKING_LIMIT: usize = 5;

/// Durable storage for game results.
///
/// Implementations own their connection handling. Handlers hold an
/// `Arc<dyn ResultStore>` and never retry; every error is reported to the
/// caller of the request that hit it.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Appends one result and returns it with its store-assigned metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached or rejects the write.
    async fn save(&self, result: NewGameResult) -> Result<GameResult, StoreError>;

    /// Returns at most `limit` results for `difficulty`, highest points first.
    ///
    /// Equal points keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached or the query fails.
    async fn top_by_difficulty(
        &self,
        difficulty: &str,
        limit: usize,
    ) -> Result<Vec<GameResult>, StoreError>;
}
