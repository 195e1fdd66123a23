//! SQLite-backed result store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{GameResult, NewGameResult, ResultStore, StoreError, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds SQLite waits on a locked database before failing a statement.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Result store persisting to an SQLite database.
///
/// Holds only the connection string; every operation establishes its own
/// connection, so an unreachable database fails individual requests without
/// poisoning the store. The schema is brought up to date on the first
/// successful connection, so a store that could not reach its database at
/// startup recovers once the database becomes available.
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    database_url: String,
    schema_ready: Arc<Mutex<bool>>,
}

impl SqliteResultStore {
    /// Creates a store for the database at `database_url`.
    ///
    /// Use `":memory:"` only for throwaway checks; each connection gets its
    /// own empty database.
    #[instrument(skip(database_url))]
    pub fn new(database_url: impl Into<String>) -> Self {
        let database_url = database_url.into();
        info!(database_url = %database_url, "Creating SqliteResultStore");
        Self {
            database_url,
            schema_ready: Arc::new(Mutex::new(false)),
        }
    }

    /// Opens a raw connection without touching the schema.
    #[instrument(skip(self))]
    fn open(&self) -> Result<SqliteConnection, StoreError> {
        debug!(database_url = %self.database_url, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.database_url).map_err(|e| {
            StoreError::new(format!(
                "Failed to connect to '{}': {}",
                self.database_url, e
            ))
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }

    /// Establishes a connection whose schema is known to be current.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        let mut conn = self.open()?;
        let mut ready = self
            .schema_ready
            .lock()
            .map_err(|_| StoreError::lock_poisoned("schema"))?;
        if !*ready {
            let applied = conn.run_pending_migrations(MIGRATIONS)?;
            info!(count = applied.len(), "Schema prepared on first connection");
            *ready = true;
        }
        Ok(conn)
    }

    /// Applies pending schema migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database is unreachable or a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, StoreError> {
        let mut conn = self.open()?;
        let mut ready = self
            .schema_ready
            .lock()
            .map_err(|_| StoreError::lock_poisoned("schema"))?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        *ready = true;

        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Inserts one result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self, result), fields(player = %result.player(), difficulty = %result.difficulty()))]
    pub fn insert(&self, result: &NewGameResult) -> Result<GameResult, StoreError> {
        debug!(points = result.points(), "Inserting game result");
        let mut conn = self.connection()?;

        let saved = diesel::insert_into(schema::game_results::table)
            .values(result)
            .returning(GameResult::as_returning())
            .get_result(&mut conn)?;

        info!(result_id = saved.id(), "Game result saved");
        Ok(saved)
    }

    /// Loads the best results for a difficulty, highest points first.
    ///
    /// Ties are broken by id, which follows insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn top_results(
        &self,
        difficulty: &str,
        limit: usize,
    ) -> Result<Vec<GameResult>, StoreError> {
        debug!("Loading ranking");
        let mut conn = self.connection()?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let results = schema::game_results::table
            .filter(schema::game_results::difficulty.eq(difficulty))
            .order((
                schema::game_results::points.desc(),
                schema::game_results::id.asc(),
            ))
            .limit(limit)
            .select(GameResult::as_select())
            .load(&mut conn)?;

        info!(count = results.len(), "Ranking loaded");
        Ok(results)
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn save(&self, result: NewGameResult) -> Result<GameResult, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.insert(&result)).await?
    }

    async fn top_by_difficulty(
        &self,
        difficulty: &str,
        limit: usize,
    ) -> Result<Vec<GameResult>, StoreError> {
        let store = self.clone();
        let difficulty = difficulty.to_string();
        tokio::task::spawn_blocking(move || store.top_results(&difficulty, limit)).await?
    }
}
