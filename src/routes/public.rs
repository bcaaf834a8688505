use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Todo API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "todos": "/todos/",
            "health": "/health",
        },
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
