use std::sync::Arc;

use sqlx::SqlitePool;

use crate::mux::VideoClient;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub video: Arc<dyn VideoClient>,
    pub jwt_secret: String,
}
