//! Persistence layer for submitted game results.

mod error;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::StoreError;
pub use memory::InMemoryResultStore;
pub use models::{GameResult, NewGameResult};
pub use repository::{MIGRATIONS, SqliteResultStore};
pub use store::{RANKING_LIMIT, ResultStore};
