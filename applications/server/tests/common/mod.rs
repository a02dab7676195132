//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use openmusic_core::SchemaRegistry;
use openmusic_server::{
    create_router,
    jobs::{ExportQueue, ExportSink, PlaylistExport},
    services::{AuthService, FileStorage},
    state::AppState,
};
use openmusic_storage::Database;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const PUBLIC_URL: &str = "http://localhost:5000";

/// Export sink that keeps deliveries in memory
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<(String, PlaylistExport)>>,
}

#[async_trait]
impl ExportSink for RecordingSink {
    async fn deliver(
        &self,
        target_email: &str,
        export: &PlaylistExport,
    ) -> openmusic_server::Result<()> {
        self.delivered
            .lock()
            .await
            .push((target_email.to_string(), export.clone()));
        Ok(())
    }
}

/// A fully wired router over a throw-away database and upload directory
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub file_storage: Arc<FileStorage>,
    pub export_queue: Arc<ExportQueue>,
    pub sink: Arc<RecordingSink>,
    pub temp_dir: TempDir,
}

/// Create a test database with migrations applied, as a real SQLite file
pub async fn create_test_database(temp_dir: &TempDir) -> Arc<Database> {
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&format!("sqlite://{}", db_path.display()))
        .await
        .expect("Failed to create test database");
    Arc::new(db)
}

pub fn create_test_auth_service() -> AuthService {
    AuthService::new(
        "test-access-key".to_string(),
        "test-refresh-key".to_string(),
        1800,
        1,
    )
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Export workers are not started, so jobs stay queued
    pub async fn without_export_workers() -> Self {
        Self::build(false).await
    }

    async fn build(start_workers: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = create_test_database(&temp_dir).await;

        let file_storage = FileStorage::new(temp_dir.path().join("upload"), PUBLIC_URL);
        file_storage.initialize().await.unwrap();
        let file_storage = Arc::new(file_storage);

        let auth_service = Arc::new(create_test_auth_service());

        let sink = Arc::new(RecordingSink::default());
        let export_queue = Arc::new(ExportQueue::new(
            Arc::clone(&db),
            Arc::clone(&sink) as Arc<dyn ExportSink>,
            1,
        ));
        if start_workers {
            Arc::clone(&export_queue).start();
        }

        let app_state = AppState::new(
            Arc::clone(&db),
            Arc::clone(&auth_service),
            Arc::clone(&file_storage),
            Arc::new(SchemaRegistry::standard()),
            Arc::clone(&export_queue),
        );

        Self {
            router: create_router(app_state),
            db,
            auth_service,
            file_storage,
            export_queue,
            sink,
            temp_dir,
        }
    }

    /// Send a request and return status plus parsed JSON body (`Null` if empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: &Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Register a user through the API and return its id
    pub async fn register(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/users",
                None,
                &serde_json::json!({
                    "username": username,
                    "password": password,
                    "fullname": format!("{username} fullname"),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["userId"].as_str().unwrap().to_string()
    }

    /// Log in through the API and return `(access, refresh)` tokens
    pub async fn login(&self, username: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .json(
                Method::POST,
                "/authentications",
                None,
                &serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["accessToken"].as_str().unwrap().to_string(),
            body["data"]["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    /// Register and log in; returns `(user_id, access_token)`
    pub async fn user_with_token(&self, username: &str) -> (String, String) {
        let user_id = self.register(username, "secret-password").await;
        let (access, _) = self.login(username, "secret-password").await;
        (user_id, access)
    }
}

/// Test user credentials
pub mod fixtures {
    pub const TEST_USERNAME: &str = "testuser";
    pub const TEST_PASSWORD: &str = "TestPassword123!";
}
