//! Alert that runs a user-supplied shell command

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::AlertDispatcher;
use crate::{error::AlertError, state::TimerCompleted};

/// Runs `sh -c <command>` with `TIMER_ID` and `TIMER_TITLE` in the environment
#[derive(Debug, Clone)]
pub struct CommandAlert {
    command: String,
}

impl CommandAlert {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

#[async_trait]
impl AlertDispatcher for CommandAlert {
    fn name(&self) -> &str {
        "command"
    }

    async fn dispatch(&self, event: &TimerCompleted) -> Result<(), AlertError> {
        debug!("Running alert command for timer {}: {}", event.id, self.command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("TIMER_ID", event.id.as_str())
            .env("TIMER_TITLE", &event.title)
            .output()
            .await
            .map_err(AlertError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AlertError::CommandFailed {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        info!("Alert command finished for timer {}", event.id);
        Ok(())
    }
}
