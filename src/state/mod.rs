//! State management module
//!
//! This module contains the timer entity, the registry that owns the timer
//! collection, and the shared application state wrapped around it.

pub mod app_state;
pub mod registry;
pub mod timer;

// Re-export main types
pub use app_state::{AlertEvent, AppState, TimerCounts};
pub use registry::{TimerCompleted, TimerRegistry};
pub use timer::{NewTimer, TickOutcome, Timer, TimerId, TimerUpdate};
