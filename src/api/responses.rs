//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::{
    error::{TimerError, ValidationError},
    state::{Timer, TimerId},
    utils::format_time,
};

/// A timer plus the values a UI derives from it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    /// Remaining time as `HH:MM:SS`
    pub display: String,
    /// Remaining fraction of the duration, 0 to 100
    pub progress: f64,
    pub completed: bool,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        Self {
            display: format_time(timer.remaining_time()),
            progress: timer.progress(),
            completed: timer.is_completed(),
            timer,
        }
    }
}

/// Response for operations acting on a single timer
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn new(status: &str, message: impl Into<String>, timer: Timer) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }
}

/// Response for GET /timers
#[derive(Debug, Clone, Serialize)]
pub struct TimerListResponse {
    pub count: usize,
    pub timers: Vec<TimerView>,
}

impl From<Vec<Timer>> for TimerListResponse {
    fn from(timers: Vec<Timer>) -> Self {
        Self {
            count: timers.len(),
            timers: timers.into_iter().map(TimerView::from).collect(),
        }
    }
}

/// Status response with timer counts and server metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timers_total: usize,
    pub timers_running: usize,
    pub timers_completed: usize,
    pub alerts_active: usize,
    pub storage_key: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body returned with every error status
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Errors surfaced by the HTTP layer
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(TimerId),
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        match e {
            TimerError::InvalidDuration => ApiError::Validation(e.to_string()),
            TimerError::LockPoisoned(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Timer {} not found", id)),
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = ErrorResponse {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
