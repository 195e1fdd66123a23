//! Request payloads and their validation.

use serde::Deserialize;
use tracing::instrument;

use crate::db::NewGameResult;
use crate::error::ApiError;

/// Message returned when a save request lacks a field.
pub const MISSING_RESULT_FIELDS: &str = "Missing data, cannot save the score.";

/// Message returned when a ranking request lacks a difficulty.
pub const MISSING_DIFFICULTY: &str = "Missing difficulty, cannot filter the ranking.";

/// Body of `POST /api/game/save-result`.
///
/// Every field is optional so that a missing one is reported as a bad
/// request instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveResultRequest {
    /// Display name of the player.
    pub player: Option<String>,
    /// Difficulty label the score was obtained on.
    pub difficulty: Option<String>,
    /// Points scored. Zero is a valid score.
    pub points: Option<f64>,
}

impl TryFrom<SaveResultRequest> for NewGameResult {
    type Error = ApiError;

    #[instrument(skip(req))]
    fn try_from(req: SaveResultRequest) -> Result<Self, Self::Error> {
        let player =
            non_empty(req.player).ok_or_else(|| ApiError::bad_request(MISSING_RESULT_FIELDS))?;
        let difficulty = non_empty(req.difficulty)
            .ok_or_else(|| ApiError::bad_request(MISSING_RESULT_FIELDS))?;
        // Presence only: a score of 0 must pass.
        let points = req
            .points
            .ok_or_else(|| ApiError::bad_request(MISSING_RESULT_FIELDS))?;

        Ok(NewGameResult::new(player, difficulty, points))
    }
}

/// Query string of `GET /api/game/ranking`.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingQuery {
    /// Difficulty to filter by.
    pub difficulty: Option<String>,
}

impl RankingQuery {
    /// Returns the requested difficulty, rejecting an absent or empty value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] if no difficulty was given.
    pub fn into_difficulty(self) -> Result<String, ApiError> {
        non_empty(self.difficulty).ok_or_else(|| ApiError::bad_request(MISSING_DIFFICULTY))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
