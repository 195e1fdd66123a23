//! Game results library - score persistence and per-difficulty rankings
//!
//! Accepts a player's name, a difficulty label and a point total, stores
//! them, and serves the top five results for any difficulty.
//!
//! # Architecture
//!
//! - **Server**: axum router exposing the status, save and ranking endpoints
//! - **Store**: [`ResultStore`] trait with SQLite and in-memory backends
//! - **Config**: environment-driven [`ServerConfig`]
//!
//! # Example
//!
//! ```no_run
//! use game_results::{AppState, SqliteResultStore, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = SqliteResultStore::new("game_results.db");
//! store.run_migrations()?;
//!
//! let app = router(AppState::new(store));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod error;
mod requests;
mod server;

// Crate-level exports - Configuration
pub use config::{
    ConfigError, DEFAULT_DATABASE_URL, DEFAULT_FRONT_ORIGIN, DEFAULT_HOST, DEFAULT_PORT,
    ServerConfig,
};

// Crate-level exports - Persistence
pub use db::{
    GameResult, InMemoryResultStore, MIGRATIONS, NewGameResult, RANKING_LIMIT, ResultStore,
    SqliteResultStore, StoreError,
};

// Crate-level exports - HTTP surface
pub use error::{ApiError, SERVER_ERROR_MESSAGE};
pub use requests::{MISSING_DIFFICULTY, MISSING_RESULT_FIELDS, RankingQuery, SaveResultRequest};
pub use server::{AppState, MessageResponse, SAVED_MESSAGE, STATUS_MESSAGE, cors_layer, router};
