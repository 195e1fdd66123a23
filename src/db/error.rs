//! Errors raised by result stores.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure to save or rank game results, with the call site that raised it.
///
/// `message` is what handlers relay to clients as the error detail; the
/// location only shows up in logs.
#[derive(Debug, Clone, Display, Error)]
#[display("Result store error: {} ({}:{})", message, file, line)]
pub struct StoreError {
    /// What the store reported.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A store lock was poisoned by a panicking writer.
    #[track_caller]
    pub fn lock_poisoned(lock: &str) -> Self {
        Self::new(format!("Result store {} lock poisoned", lock))
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

// Migration harness errors arrive boxed.
impl From<Box<dyn std::error::Error + Send + Sync>> for StoreError {
    #[track_caller]
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(format!("Migration failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Store task failed: {}", err))
    }
}
