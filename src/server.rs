//! HTTP routes for saving results and querying rankings.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, Request};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, instrument};

use crate::db::{GameResult, NewGameResult, RANKING_LIMIT, ResultStore};
use crate::error::ApiError;
use crate::requests::{RankingQuery, SaveResultRequest};

/// Message returned by the status endpoint.
pub const STATUS_MESSAGE: &str = "API running";

/// Message returned after a result is saved.
pub const SAVED_MESSAGE: &str = "Score saved successfully";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ResultStore>,
}

impl AppState {
    /// Wraps a store for use by the router.
    pub fn new(store: impl ResultStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Plain `{ "message": ... }` response body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Builds the API router over the given state.
///
/// Request logging is included; CORS is added separately with [`cors_layer`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/api/game/ranking", get(ranking))
        .route("/api/game/save-result", post(save_result))
        .with_state(state)
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
}

/// Allows the frontend at `origin` to call the API from a browser.
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

/// Liveness probe.
#[instrument]
async fn status() -> Json<MessageResponse> {
    Json(MessageResponse::new(STATUS_MESSAGE))
}

/// Returns the top results for a difficulty.
#[instrument(skip(state))]
async fn ranking(
    State(state): State<AppState>,
    query: Result<Query<RankingQuery>, QueryRejection>,
) -> Result<Json<Vec<GameResult>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        debug!(rejection = %rejection.body_text(), "Unreadable ranking query");
        ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
    })?;
    let difficulty = query.into_difficulty()?;
    debug!(difficulty = %difficulty, "Querying ranking");

    let results = state
        .store
        .top_by_difficulty(&difficulty, RANKING_LIMIT)
        .await?;

    info!(difficulty = %difficulty, count = results.len(), "Ranking served");
    Ok(Json(results))
}

/// Validates and persists one result.
#[instrument(skip(state, body))]
async fn save_result(
    State(state): State<AppState>,
    body: Result<Json<SaveResultRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        debug!(rejection = %rejection.body_text(), "Unreadable save-result body");
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let result = NewGameResult::try_from(req)?;

    let saved = state.store.save(result).await?;

    info!(
        result_id = saved.id(),
        player = %saved.player(),
        difficulty = %saved.difficulty(),
        points = saved.points(),
        "Result saved"
    );
    Ok(Json(MessageResponse::new(SAVED_MESSAGE)))
}
