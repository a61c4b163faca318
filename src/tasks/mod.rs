//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alert_dispatch;
pub mod tick_scheduler;

// Re-export main functions
pub use alert_dispatch::alert_dispatch_task;
pub use tick_scheduler::{TickHandle, TickScheduler, DEFAULT_TICK_INTERVAL};
