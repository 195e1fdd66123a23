//! Database models for game results.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema;

/// A persisted game result.
///
/// `id` and `created_at` are assigned by the store on insert; the remaining
/// fields are exactly what the player submitted.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Getters, Serialize, new)]
#[diesel(table_name = schema::game_results)]
pub struct GameResult {
    id: i32,
    player: String,
    difficulty: String,
    points: f64,
    created_at: NaiveDateTime,
}

/// Insertable game result, already validated.
#[derive(Debug, Clone, PartialEq, Insertable, Getters, new)]
#[diesel(table_name = schema::game_results)]
pub struct NewGameResult {
    player: String,
    difficulty: String,
    points: f64,
}
