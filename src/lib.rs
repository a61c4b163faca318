//! Timer Board - named countdown timers with persisted state
//!
//! This library provides the timer registry and its countdown engine, local
//! persistence, completion alerts, and the HTTP surface a UI talks to.

pub mod alert;
pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{TimerError, ValidationError};
pub use state::{AppState, Timer, TimerId, TimerRegistry};
pub use storage::TimerStorage;
pub use utils::signals::shutdown_signal;
