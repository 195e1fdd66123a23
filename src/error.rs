//! HTTP-facing error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{error, warn};

use crate::db::StoreError;

/// Message returned with every internal error.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Error returned by a request handler.
///
/// Failures are scoped to the request that produced them.
#[derive(Debug, Clone, Display, Error)]
pub enum ApiError {
    /// The client omitted or malformed a required field.
    #[display("Bad request: {message}")]
    BadRequest {
        /// Human-readable description of what is missing.
        message: String,
    },
    /// The store failed while serving the request.
    #[display("Internal error: {message}: {detail}")]
    Internal {
        /// Human-readable summary.
        message: String,
        /// Error text relayed from the store.
        detail: String,
    },
}

impl ApiError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal {
            message: SERVER_ERROR_MESSAGE.to_string(),
            detail: err.message,
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest { message } => {
                warn!(message = %message, "Rejecting request");
                ErrorBody {
                    message,
                    error: None,
                }
            }
            Self::Internal { message, detail } => {
                error!(detail = %detail, "Request failed in store");
                ErrorBody {
                    message,
                    error: Some(detail),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
