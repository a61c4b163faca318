//! Timer entity and its lifecycle transitions

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TimerError};

/// Opaque timer identifier, stable for the lifetime of the timer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TimerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TimerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Input for creating a timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimer {
    pub title: String,
    pub description: String,
    /// Countdown length in seconds
    pub duration: u64,
}

/// Partial update applied by an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u64>,
}

/// What a single tick did to one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running or already at zero
    Idle,
    /// Counted down one second
    Advanced,
    /// Counted down to zero and stopped
    Completed,
}

/// A named countdown timer.
///
/// Fields are only mutated through the transition methods below, which keep
/// `remaining_time <= duration` and never leave a timer running at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    id: TimerId,
    title: String,
    description: String,
    duration: u64,
    remaining_time: u64,
    is_running: bool,
    created_at: i64,
}

impl Timer {
    /// Create a stopped timer with the full duration remaining
    pub fn new(id: TimerId, input: NewTimer, created_at: i64) -> Result<Self> {
        if input.duration == 0 {
            return Err(TimerError::InvalidDuration);
        }

        Ok(Self {
            id,
            title: input.title,
            description: input.description,
            duration: input.duration,
            remaining_time: input.duration,
            is_running: false,
            created_at,
        })
    }

    /// Rebuild a timer from persisted fields, clamping anything out of range.
    ///
    /// Returns `None` for a zero duration, which no live timer can have.
    pub(crate) fn restore(
        id: TimerId,
        title: String,
        description: String,
        duration: u64,
        remaining_time: u64,
        is_running: bool,
        created_at: i64,
    ) -> Option<Self> {
        if duration == 0 {
            return None;
        }

        let remaining_time = remaining_time.min(duration);
        Some(Self {
            id,
            title,
            description,
            duration,
            remaining_time,
            is_running: is_running && remaining_time > 0,
            created_at,
        })
    }

    pub fn id(&self) -> &TimerId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// A timer that has counted all the way down
    pub fn is_completed(&self) -> bool {
        self.remaining_time == 0
    }

    /// Remaining fraction of the duration, as a percentage
    pub fn progress(&self) -> f64 {
        self.remaining_time as f64 / self.duration as f64 * 100.0
    }

    /// Flip between running and paused.
    ///
    /// A completed timer stays stopped; it has to be restarted first.
    /// Returns whether anything changed.
    pub(crate) fn toggle(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.is_running = !self.is_running;
        true
    }

    pub(crate) fn restart(&mut self) {
        self.remaining_time = self.duration;
        self.is_running = false;
    }

    /// Apply an edit. Any edit restarts the countdown from the resulting duration.
    pub(crate) fn apply(&mut self, update: TimerUpdate) -> Result<()> {
        if update.duration == Some(0) {
            return Err(TimerError::InvalidDuration);
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        self.restart();
        Ok(())
    }

    pub(crate) fn tick(&mut self) -> TickOutcome {
        if !self.is_running || self.remaining_time == 0 {
            return TickOutcome::Idle;
        }

        self.remaining_time -= 1;
        if self.remaining_time == 0 {
            self.is_running = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced
        }
    }
}
