#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use lms_backend::api::router;
use lms_backend::auth::generate_jwt;
use lms_backend::error::AppError;
use lms_backend::mux::VideoClient;
use lms_backend::mux::dto::{Asset, PlaybackId};
use lms_backend::state::AppState;

pub const JWT_SECRET: &str = "test-secret";

/// Video client double that records provider calls in order. Created
/// assets are numbered: the first create returns `asset-1`/`playback-1`.
pub struct RecordingVideoClient {
    calls: Mutex<Vec<String>>,
    counter: AtomicUsize,
}

impl RecordingVideoClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoClient for RecordingVideoClient {
    async fn create_asset(&self, input_url: &str) -> Result<Asset, AppError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls
            .lock()
            .unwrap()
            .push(format!("create:{}", input_url));

        Ok(Asset {
            id: format!("asset-{}", n),
            playback_ids: vec![PlaybackId {
                id: format!("playback-{}", n),
                policy: Some("public".to_string()),
            }],
            status: Some("preparing".to_string()),
        })
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("delete:{}", asset_id));
        Ok(())
    }
}

pub async fn setup_test_db() -> SqlitePool {
    // Single connection so every query sees the same in-memory db.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn make_test_app() -> (Router, SqlitePool, Arc<RecordingVideoClient>) {
    let pool = setup_test_db().await;
    let recorder = Arc::new(RecordingVideoClient::new());
    let video: Arc<dyn VideoClient> = recorder.clone();

    let state = AppState {
        db: pool.clone(),
        video,
        jwt_secret: JWT_SECRET.to_string(),
    };

    (router(state), pool, recorder)
}

pub fn bearer(user_id: &str) -> String {
    let token = generate_jwt(user_id, JWT_SECRET).expect("Failed to sign token");
    format!("Bearer {}", token)
}
