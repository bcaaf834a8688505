use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

pub mod public;
pub mod todos;

/// Prefix under which the todo routes are mounted a second time.
pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(todos::router(state.clone()))
        .nest(API_PREFIX, todos::router(state))
}

/// Routes wrapped in the middleware stack used by the server.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
