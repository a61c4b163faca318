//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by timer registry operations
#[derive(Error, Debug)]
pub enum TimerError {
    /// A timer was created or edited with a zero duration
    #[error("timer duration must be greater than zero")]
    InvalidDuration,

    /// The registry lock was poisoned by a panicking holder
    #[error("failed to lock timer registry: {0}")]
    LockPoisoned(String),
}

/// Caller-side validation failures, worded for display to the end user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be less than 50 characters")]
    TitleTooLong,

    #[error("Please set a time greater than 0")]
    DurationRequired,
}

/// Key-value store failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize timers: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Completion alert failures
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("failed to spawn alert command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("alert command exited with {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error("alert output failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = TimerError> = std::result::Result<T, E>;
