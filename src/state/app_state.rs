//! Shared application state

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{NewTimer, Timer, TimerCompleted, TimerId, TimerRegistry, TimerUpdate};
use crate::{error::{Result, TimerError}, utils::format_uptime};

/// Capacity of the alert broadcast channel
const ALERT_CHANNEL_CAPACITY: usize = 100;

/// What the alert dispatch task is told
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    /// A timer counted down to zero; start its alert
    Completed(TimerCompleted),
    /// The alert for this timer should stop sounding
    Dismissed(TimerId),
}

/// Counts of timers by lifecycle phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerCounts {
    pub total: usize,
    pub running: usize,
    pub completed: usize,
    /// Completed timers whose alert has not been dismissed
    pub alerting: usize,
}

/// Application state shared between the HTTP handlers and background tasks.
///
/// Every registry operation runs under a single lock, so ticks and user
/// operations never observe each other half-applied. Persistence happens
/// inside the same critical section, which keeps writes in operation order.
/// The store is written synchronously on whichever tokio worker holds the
/// lock; with one small JSON document per write this stays cheap enough.
///
/// A completed timer stays alerting until it is dismissed, deleted, restarted
/// or edited. Alert events are sent while the alert set is locked, so the
/// dispatch task sees starts and stops in the order they happened.
#[derive(Debug)]
pub struct AppState {
    registry: Mutex<TimerRegistry>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Timers whose alert is still sounding
    active_alerts: Mutex<HashSet<TimerId>>,
    /// Channel feeding the alert dispatch task
    alert_tx: broadcast::Sender<AlertEvent>,
}

impl AppState {
    /// Create the state around an already loaded registry
    pub fn new(registry: TimerRegistry, host: String, port: u16) -> Self {
        let (alert_tx, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);

        Self {
            registry: Mutex::new(registry),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            active_alerts: Mutex::new(HashSet::new()),
            alert_tx,
        }
    }

    /// Subscribe to alert starts and stops
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.alert_tx.subscribe()
    }

    fn lock_registry(&self) -> Result<MutexGuard<'_, TimerRegistry>> {
        self.registry
            .lock()
            .map_err(|e| TimerError::LockPoisoned(e.to_string()))
    }

    fn lock_alerts(&self) -> Result<MutexGuard<'_, HashSet<TimerId>>> {
        self.active_alerts
            .lock()
            .map_err(|e| TimerError::LockPoisoned(e.to_string()))
    }

    fn send_alert(&self, event: AlertEvent) {
        if let Err(e) = self.alert_tx.send(event) {
            debug!("No alert subscribers: {:?}", e.0);
        }
    }

    /// Stop the alert for `id` if one is sounding. Returns whether one was.
    fn silence(&self, id: &TimerId) -> Result<bool> {
        let mut alerts = self.lock_alerts()?;
        let was_active = alerts.remove(id);
        if was_active {
            self.send_alert(AlertEvent::Dismissed(id.clone()));
        }
        Ok(was_active)
    }

    /// Run a user-triggered operation against the registry and record it as the last action
    fn run_action<T, F>(&self, action: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut TimerRegistry) -> Result<T>,
    {
        let mut registry = self.lock_registry()?;
        let result = op(&mut *registry)?;
        drop(registry);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    pub fn add_timer(&self, input: NewTimer) -> Result<Timer> {
        self.run_action("add", |registry| registry.add(input))
    }

    /// Delete a timer, silencing its alert
    pub fn delete_timer(&self, id: &TimerId) -> Result<bool> {
        self.run_action("delete", |registry| {
            let removed = registry.delete(id);
            self.silence(id)?;
            Ok(removed)
        })
    }

    pub fn toggle_timer(&self, id: &TimerId) -> Result<Option<Timer>> {
        self.run_action("toggle", |registry| Ok(registry.toggle(id)))
    }

    /// Restart a timer, silencing its alert
    pub fn restart_timer(&self, id: &TimerId) -> Result<Option<Timer>> {
        self.run_action("restart", |registry| {
            let timer = registry.restart(id);
            if timer.is_some() {
                self.silence(id)?;
            }
            Ok(timer)
        })
    }

    /// Edit a timer. The countdown restarts, so its alert is silenced too.
    pub fn edit_timer(&self, id: &TimerId, update: TimerUpdate) -> Result<Option<Timer>> {
        self.run_action("edit", |registry| {
            let timer = registry.edit(id, update)?;
            if timer.is_some() {
                self.silence(id)?;
            }
            Ok(timer)
        })
    }

    /// Stop the alert of a completed timer without touching the timer.
    /// Returns whether an alert was sounding.
    pub fn dismiss_alert(&self, id: &TimerId) -> Result<bool> {
        let dismissed = self.run_action("dismiss", |_| self.silence(id))?;
        if dismissed {
            info!("Alert for timer {} dismissed", id);
        }
        Ok(dismissed)
    }

    /// Whether the alert for `id` is still sounding
    pub fn is_alerting(&self, id: &TimerId) -> Result<bool> {
        Ok(self.lock_alerts()?.contains(id))
    }

    /// Advance all running timers by one second and start an alert for each
    /// timer that completed.
    ///
    /// Broadcasting never blocks, so a slow or failing alert subscriber can
    /// never hold up timer state.
    pub fn tick(&self) -> Result<Vec<TimerCompleted>> {
        let mut registry = self.lock_registry()?;
        let completed = registry.tick();

        if !completed.is_empty() {
            let mut alerts = self.lock_alerts()?;
            for event in &completed {
                alerts.insert(event.id.clone());
                self.send_alert(AlertEvent::Completed(event.clone()));
            }
        }

        Ok(completed)
    }

    /// Snapshot of the current collection
    pub fn timers(&self) -> Result<Vec<Timer>> {
        Ok(self.lock_registry()?.timers().to_vec())
    }

    pub fn timer(&self, id: &TimerId) -> Result<Option<Timer>> {
        Ok(self.lock_registry()?.get(id).cloned())
    }

    pub fn timer_counts(&self) -> Result<TimerCounts> {
        let registry = self.lock_registry()?;
        let timers = registry.timers();
        Ok(TimerCounts {
            total: timers.len(),
            running: timers.iter().filter(|t| t.is_running()).count(),
            completed: timers.iter().filter(|t| t.is_completed()).count(),
            alerting: self.lock_alerts()?.len(),
        })
    }

    pub fn storage_key(&self) -> Result<String> {
        Ok(self.lock_registry()?.storage_key().to_string())
    }

    /// Server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = match self.last_action.lock() {
            Ok(action) => action.clone(),
            Err(e) => {
                warn!("Failed to read last action: {}", e);
                None
            }
        };
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
