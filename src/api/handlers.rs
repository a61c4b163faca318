//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::{
    state::{AppState, TimerId},
    validation::{validate_timer_form, validate_timer_update, TimerForm, TimerUpdateForm},
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, StatusResponse, TimerListResponse,
};

/// Handle GET /timers - List all timers
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerListResponse>, ApiError> {
    let timers = state.timers()?;
    Ok(Json(timers.into()))
}

/// Handle POST /timers - Validate the form and add a timer
pub async fn add_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TimerForm>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let input = validate_timer_form(&form)?;
    let timer = state.add_timer(input)?;
    info!("Add endpoint called - timer {} created", timer.id());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("created", "Timer added successfully!", timer)),
    ))
}

/// Handle PATCH /timers/:id - Validate the partial form and edit a timer
pub async fn edit_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<TimerUpdateForm>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = TimerId::from(id);
    let update = validate_timer_update(&form)?;

    match state.edit_timer(&id, update)? {
        Some(timer) => Ok(Json(ApiResponse::new("updated", "Timer updated successfully!", timer))),
        None => Err(ApiError::NotFound(id)),
    }
}

/// Handle DELETE /timers/:id - Delete a timer
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TimerId::from(id);
    if state.delete_timer(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

/// Handle POST /timers/:id/toggle - Start or pause a timer
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = TimerId::from(id);
    let timer = state.toggle_timer(&id)?.ok_or(ApiError::NotFound(id))?;

    let (status, message) = if timer.is_running() {
        ("running", "Timer started")
    } else if timer.is_completed() {
        ("completed", "Timer has ended, restart it to run again")
    } else {
        ("paused", "Timer paused")
    };
    Ok(Json(ApiResponse::new(status, message, timer)))
}

/// Handle POST /timers/:id/restart - Reset a timer to its full duration
pub async fn restart_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = TimerId::from(id);
    let timer = state.restart_timer(&id)?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(ApiResponse::new("restarted", "Timer restarted", timer)))
}

/// Handle POST /timers/:id/dismiss - Silence the alert of a completed timer
pub async fn dismiss_alert_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TimerId::from(id);
    if state.timer(&id)?.is_none() {
        return Err(ApiError::NotFound(id));
    }

    state.dismiss_alert(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /status - Return timer counts and server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let counts = state.timer_counts()?;
    let storage_key = state.storage_key()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timers_total: counts.total,
        timers_running: counts.running,
        timers_completed: counts.completed,
        alerts_active: counts.alerting,
        storage_key,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
