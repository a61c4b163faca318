//! Authoritative timer collection and its mutation operations

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::timer::{NewTimer, TickOutcome, Timer, TimerId, TimerUpdate};
use crate::error::Result;
use crate::storage::TimerStorage;

/// Emitted once when a running timer counts down to zero
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerCompleted {
    pub id: TimerId,
    pub title: String,
    pub completed_at: DateTime<Utc>,
}

/// In-memory timer collection, persisted in full after every operation.
///
/// Unknown ids are never an error: the operation leaves the collection as it
/// was and reports that nothing matched.
#[derive(Debug)]
pub struct TimerRegistry {
    timers: Vec<Timer>,
    storage: TimerStorage,
    /// Set while the stored copy lags behind memory after a failed write
    dirty: bool,
}

impl TimerRegistry {
    /// Build a registry from whatever the storage currently holds
    pub fn load(storage: TimerStorage) -> Self {
        let timers = storage.load();
        Self {
            timers,
            storage,
            dirty: false,
        }
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id() == id)
    }

    pub fn storage_key(&self) -> &str {
        self.storage.key()
    }

    /// Create a timer stamped with the current time
    pub fn add(&mut self, input: NewTimer) -> Result<Timer> {
        self.add_at(input, Utc::now().timestamp_millis())
    }

    /// Create a timer with an explicit creation timestamp (epoch millis)
    pub fn add_at(&mut self, input: NewTimer, created_at: i64) -> Result<Timer> {
        let id = self.fresh_id();
        let timer = Timer::new(id, input, created_at)?;

        info!("Added timer {} '{}' ({}s)", timer.id(), timer.title(), timer.duration());
        self.timers.push(timer.clone());
        self.persist();
        Ok(timer)
    }

    /// Remove a timer. Returns whether one was removed.
    pub fn delete(&mut self, id: &TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id() != id);
        let removed = self.timers.len() != before;

        if removed {
            info!("Deleted timer {}", id);
        } else {
            debug!("Delete ignored, no timer {}", id);
        }
        self.persist();
        removed
    }

    /// Start or pause a timer
    pub fn toggle(&mut self, id: &TimerId) -> Option<Timer> {
        let result = self.find_mut(id).map(|timer| {
            if timer.toggle() {
                info!("Timer {} is now {}", id, if timer.is_running() { "running" } else { "paused" });
            } else {
                debug!("Timer {} is completed, toggle ignored until restart", id);
            }
            timer.clone()
        });
        self.persist();
        result
    }

    /// Reset a timer to its full duration, stopped
    pub fn restart(&mut self, id: &TimerId) -> Option<Timer> {
        let result = self.find_mut(id).map(|timer| {
            timer.restart();
            info!("Restarted timer {}", id);
            timer.clone()
        });
        self.persist();
        result
    }

    /// Apply a partial update; the countdown restarts from the resulting duration
    pub fn edit(&mut self, id: &TimerId, update: TimerUpdate) -> Result<Option<Timer>> {
        let result = match self.find_mut(id) {
            Some(timer) => {
                timer.apply(update)?;
                info!("Edited timer {} '{}' ({}s)", id, timer.title(), timer.duration());
                Some(timer.clone())
            }
            None => None,
        };
        self.persist();
        Ok(result)
    }

    /// Advance every running timer by one second.
    ///
    /// Timers are visited in collection order. Each timer that reaches zero
    /// is stopped and reported exactly once. The collection is persisted once
    /// per tick, and only when something changed or an earlier write failed.
    pub fn tick(&mut self) -> Vec<TimerCompleted> {
        let mut changed = false;
        let mut completed = Vec::new();

        for timer in &mut self.timers {
            match timer.tick() {
                TickOutcome::Idle => {}
                TickOutcome::Advanced => changed = true,
                TickOutcome::Completed => {
                    changed = true;
                    info!("Timer {} '{}' completed", timer.id(), timer.title());
                    completed.push(TimerCompleted {
                        id: timer.id().clone(),
                        title: timer.title().to_string(),
                        completed_at: Utc::now(),
                    });
                }
            }
        }

        if changed || self.dirty {
            self.persist();
        }
        completed
    }

    fn find_mut(&mut self, id: &TimerId) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id() == id)
    }

    fn fresh_id(&self) -> TimerId {
        loop {
            let id = TimerId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        self.dirty = !self.storage.save(&self.timers);
    }
}
