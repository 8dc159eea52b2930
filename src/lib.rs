pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod handlers;
pub mod service;
pub mod state;
pub mod validate;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use crate::config::{Config, DatabaseConfig, StoreBackend};
use data::{InMemorySessionStore, RedisSessionStore, SessionStore};
use error::AppError;
use handlers::rest;
use service::Arcade;
use state::{AppState, SharedState};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

pub fn build_store(database: &DatabaseConfig) -> Result<Arc<dyn SessionStore>, AppError> {
    match database.backend {
        StoreBackend::Redis => {
            let client = redis::Client::open(database.redis_url.as_str())?;
            Ok(Arc::new(RedisSessionStore::new(client)))
        }
        StoreBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
    }
}

pub fn create_app(config: Config) -> Result<Router, AppError> {
    let store = build_store(&config.database)?;
    let state = Arc::new(AppState {
        arcade: Arcade::new(store, &config.games),
        config: Arc::new(config),
    });
    Ok(router(state))
}

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/games/{kind}", post(rest::create_game_handler))
        .route("/games/{kind}/sessions", get(rest::list_sessions_handler))
        .route(
            "/games/{kind}/sessions/{id}",
            get(rest::get_game_handler).delete(rest::delete_game_handler),
        )
        .route("/games/{kind}/sessions/{id}/moves", post(rest::move_handler))
        .route("/games/{kind}/highscores", get(rest::high_scores_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GamesConfig, LoggingConfig, ServerConfig};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            server: ServerConfig { addr: "0.0.0.0:0".to_string() },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                redis_url: "redis://127.0.0.1:6379/".to_string(),
            },
            logging: LoggingConfig { level: "info".to_string() },
            games: GamesConfig::default(),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_app_initialization() {
        let app = create_app(test_config()).unwrap();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[test]
    fn test_build_store_rejects_bad_redis_url() {
        let mut database = test_config().database;
        database.backend = StoreBackend::Redis;
        database.redis_url = "not a url".to_string();

        assert!(matches!(build_store(&database), Err(AppError::Redis(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_gets_sentinel_reply() {
        let app = create_app(test_config()).unwrap();

        let response = app
            .oneshot(post_json("/games/connect-four", json!({ "game_id": 1.5, "user_id": "a" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await, json!({ "session_id": 0 }));
    }

    #[tokio::test]
    async fn test_malformed_json_gets_sentinel_reply() {
        let app = create_app(test_config()).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/games/mancala")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await, json!({ "session_id": 0 }));
    }

    #[tokio::test]
    async fn test_unknown_game_slug_gets_sentinel_reply() {
        let app = create_app(test_config()).unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/games/chess", json!({ "game_id": 1, "user_id": "a", "opponent_id": "b" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await, json!({ "session_id": 0 }));

        let response = app
            .oneshot(Request::builder().uri("/games/chess/highscores").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await, json!({ "session_id": 0 }));
    }

    #[tokio::test]
    async fn test_create_move_and_read_over_http() {
        let app = create_app(test_config()).unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/games/connect-four",
                json!({ "game_id": 1, "user_id": "a", "opponent_id": "b" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await;
        assert_eq!(created["game"], "connect-four");
        let id = created["session_id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/games/connect-four/sessions/{}/moves", id),
                json!({ "player_num": "a", "column": 4 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["outcome"]["kind"], "continue");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/games/connect-four/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["move_counter"], 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = create_app(test_config()).unwrap();
        let uri = format!("/games/mancala/sessions/{}", crate::game::SessionId::new());

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_over_http_echoes_id() {
        let app = create_app(test_config()).unwrap();
        let id = crate::game::SessionId::new();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/games/mastermind/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "session_id": id.to_string() }));
    }
}
