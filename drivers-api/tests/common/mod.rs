/// Common test utilities for integration tests
///
/// Every `TestContext` owns a fresh in-memory database with migrations
/// applied, and a router built on top of it.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use drivers_api::app::{build_router, AppState};
use drivers_api::config::{ApiConfig, Config, DatabaseConfig};
use drivers_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig as PoolConfig},
};
use sqlx::SqlitePool;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with an empty, migrated database
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_pool(PoolConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), test_config());
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request through the router and returns status and JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                panic!("Response was not JSON: {}", String::from_utf8_lossy(&body))
            })
        };

        (status, json)
    }

    /// POSTs a JSON value to `/api/drivers/create`
    pub async fn create_driver(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(json_post("/api/drivers/create", body.to_string())).await
    }

    /// GETs the driver list
    pub async fn list_drivers(&self) -> (StatusCode, serde_json::Value) {
        self.send(get("/api/drivers/")).await
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            seed: false,
        },
    }
}

pub fn json_post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
