//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(add_timer_handler))
        .route("/timers/:id", patch(edit_timer_handler).delete(delete_timer_handler))
        .route("/timers/:id/toggle", post(toggle_timer_handler))
        .route("/timers/:id/restart", post(restart_timer_handler))
        .route("/timers/:id/dismiss", post(dismiss_alert_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
