//! Alert that only writes a log line

use async_trait::async_trait;
use tracing::info;

use super::AlertDispatcher;
use crate::{
    error::AlertError,
    state::{TimerCompleted, TimerId},
};

/// Logs each completion at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

#[async_trait]
impl AlertDispatcher for LogAlert {
    fn name(&self) -> &str {
        "log"
    }

    async fn dispatch(&self, event: &TimerCompleted) -> Result<(), AlertError> {
        info!(
            timer_id = %event.id,
            title = %event.title,
            completed_at = %event.completed_at,
            "Timer \"{}\" has ended!",
            event.title
        );
        Ok(())
    }

    async fn stop(&self, id: &TimerId) -> Result<(), AlertError> {
        info!(timer_id = %id, "Alert dismissed");
        Ok(())
    }
}
