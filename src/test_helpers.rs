use std::sync::Arc;

use axum::Router;

use crate::{config::AppConfig, db::connection, routes, state::AppState};

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// State backed by a fresh in-memory SQLite database with the schema synced.
pub async fn test_state() -> Arc<AppState> {
    let mut cfg = AppConfig::default();
    cfg.database.url = MEMORY_DATABASE_URL.to_string();
    let db = connection::connect(&cfg.database)
        .await
        .expect("connect to in-memory sqlite");
    AppState::new(cfg, db)
}

pub async fn test_app() -> Router {
    routes::app(test_state().await)
}
