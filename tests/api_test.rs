//! Tests for the HTTP endpoints.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use game_results::{
    AppState, GameResult, InMemoryResultStore, MISSING_DIFFICULTY, MISSING_RESULT_FIELDS,
    NewGameResult, ResultStore, SAVED_MESSAGE, SERVER_ERROR_MESSAGE, STATUS_MESSAGE,
    SqliteResultStore, StoreError, cors_layer, router,
};

/// Store double whose every operation fails.
struct FailingStore;

#[async_trait]
impl ResultStore for FailingStore {
    async fn save(&self, _result: NewGameResult) -> Result<GameResult, StoreError> {
        Err(StoreError::new("connection refused"))
    }

    async fn top_by_difficulty(
        &self,
        _difficulty: &str,
        _limit: usize,
    ) -> Result<Vec<GameResult>, StoreError> {
        Err(StoreError::new("connection refused"))
    }
}

fn app_with(store: &InMemoryResultStore) -> Router {
    router(AppState::new(store.clone()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Body read failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn save_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/game/save-result")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Valid request")
}

fn ranking_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/game/ranking{}", query))
        .body(Body::empty())
        .expect("Valid request")
}

fn points_of(body: &Value) -> Vec<f64> {
    body.as_array()
        .expect("Ranking is an array")
        .iter()
        .map(|r| r["points"].as_f64().expect("Numeric points"))
        .collect()
}

#[tokio::test]
async fn test_status_endpoint() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let request = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("Valid request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": STATUS_MESSAGE }));
}

#[tokio::test]
async fn test_save_result_adds_one_record() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let (status, body) = send(
        &app,
        save_request(json!({ "player": "Ada", "difficulty": "hard", "points": 50 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": SAVED_MESSAGE }));
    assert_eq!(store.len().expect("Len failed"), 1);

    let saved = store
        .top_by_difficulty("hard", 5)
        .await
        .expect("Query failed");
    assert_eq!(saved[0].player(), "Ada");
    assert_eq!(saved[0].difficulty(), "hard");
    assert_eq!(*saved[0].points(), 50.0);
}

#[tokio::test]
async fn test_save_result_accepts_zero_points() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let (status, _) = send(
        &app,
        save_request(json!({ "player": "Ada", "difficulty": "easy", "points": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.len().expect("Len failed"), 1);
}

#[tokio::test]
async fn test_save_result_missing_fields_is_bad_request() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let bodies = [
        json!({ "player": "Bob" }),
        json!({ "difficulty": "hard", "points": 10 }),
        json!({ "player": "", "difficulty": "hard", "points": 10 }),
        json!({ "player": "Bob", "difficulty": "", "points": 10 }),
        json!({ "player": "Bob", "difficulty": "hard" }),
        json!({}),
    ];
    for body in bodies {
        let (status, response) = send(&app, save_request(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["message"], MISSING_RESULT_FIELDS);
        assert!(response.get("error").is_none());
    }

    assert!(store.is_empty().expect("Len failed"));
}

#[tokio::test]
async fn test_save_result_malformed_body_is_bad_request() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let request = Request::builder()
        .method("POST")
        .uri("/api/game/save-result")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("Valid request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = send(
        &app,
        save_request(json!({ "player": "Ada", "difficulty": "hard", "points": "many" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.is_empty().expect("Len failed"));
}

#[tokio::test]
async fn test_ranking_requires_difficulty() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    for query in ["", "?difficulty="] {
        let (status, body) = send(&app, ranking_request(query)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], MISSING_DIFFICULTY);
    }
}

#[tokio::test]
async fn test_ranking_unreadable_query_is_json_bad_request() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let response = app
        .clone()
        .oneshot(ranking_request("?difficulty=a&difficulty=b"))
        .await
        .expect("Router is infallible");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("Content type present"),
        "application/json"
    );

    let (status, body) = send(&app, ranking_request("?difficulty=a&difficulty=b")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("JSON message")
            .starts_with("Invalid query string")
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_ranking_unknown_difficulty_is_empty() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let (status, body) = send(&app, ranking_request("?difficulty=nonexistent")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_ranking_scenario_top_five_descending() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    let (status, _) = send(
        &app,
        save_request(json!({ "player": "Ada", "difficulty": "hard", "points": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for points in [10, 20, 30, 40] {
        let (status, _) = send(
            &app,
            save_request(json!({ "player": "Other", "difficulty": "hard", "points": points })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, ranking_request("?difficulty=hard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(points_of(&body), vec![50.0, 40.0, 30.0, 20.0, 10.0]);
    assert_eq!(body[0]["player"], "Ada");
    assert_eq!(body[0]["difficulty"], "hard");
    assert!(body[0]["id"].is_number());
    assert!(body[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_ranking_limits_and_filters() {
    let store = InMemoryResultStore::new();
    let app = app_with(&store);

    for points in 1..=8 {
        send(
            &app,
            save_request(json!({ "player": "P", "difficulty": "normal", "points": points })),
        )
        .await;
    }
    send(
        &app,
        save_request(json!({ "player": "Q", "difficulty": "easy", "points": 1000 })),
    )
    .await;

    let (status, body) = send(&app, ranking_request("?difficulty=normal")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(points_of(&body), vec![8.0, 7.0, 6.0, 5.0, 4.0]);
    assert!(
        body.as_array()
            .expect("Ranking is an array")
            .iter()
            .all(|r| r["difficulty"] == "normal")
    );
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = router(AppState::new(FailingStore));

    let (status, body) = send(&app, ranking_request("?difficulty=hard")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], SERVER_ERROR_MESSAGE);
    assert_eq!(body["error"], "connection refused");

    let (status, body) = send(
        &app,
        save_request(json!({ "player": "Ada", "difficulty": "hard", "points": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "connection refused");
}

#[tokio::test]
async fn test_validation_runs_before_store() {
    let app = router(AppState::new(FailingStore));

    let (status, _) = send(&app, save_request(json!({ "player": "Bob" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sqlite_backed_round_trip() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = SqliteResultStore::new(db_file.path().to_str().expect("Invalid path"));
    store.run_migrations().expect("Migrations failed");
    let app = router(AppState::new(store));

    for (player, points) in [("Ada", 12.25), ("Bob", 99.5), ("Cy", 0.0)] {
        let (status, _) = send(
            &app,
            save_request(json!({ "player": player, "difficulty": "hard", "points": points })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, ranking_request("?difficulty=hard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(points_of(&body), vec![99.5, 12.25, 0.0]);
}

#[tokio::test]
async fn test_cors_allows_front_origin() {
    let store = InMemoryResultStore::new();
    let origin = "http://localhost:4200";
    let app = app_with(&store).layer(cors_layer(
        origin.parse().expect("Valid header value"),
    ));

    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .expect("Valid request");
    let response = app.oneshot(request).await.expect("Router is infallible");

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("CORS header present"),
        origin
    );
}
