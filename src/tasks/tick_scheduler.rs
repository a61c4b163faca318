//! Periodic countdown driver

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Default spacing between ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Drives `AppState::tick` on a fixed interval.
///
/// The scheduler owns no timer state. It can be started, stopped and started
/// again; each start spawns a fresh background task.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    state: Arc<AppState>,
    period: Duration,
}

/// Handle to a running tick task. Dropping it also stops the task.
#[derive(Debug)]
pub struct TickHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TickScheduler {
    pub fn new(state: Arc<AppState>, period: Duration) -> Self {
        Self {
            state,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Spawn the tick loop. The first tick fires one full period from now.
    pub fn start(&self) -> TickHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(tick_loop(Arc::clone(&self.state), self.period, shutdown_rx));
        TickHandle { shutdown_tx, task }
    }
}

impl TickHandle {
    /// Stop ticking. A tick already in progress completes first.
    pub async fn stop(self) {
        if self.shutdown_tx.send(true).is_err() {
            debug!("Tick task already gone");
        }
        if let Err(e) = self.task.await {
            error!("Tick task ended abnormally: {}", e);
        }
    }
}

async fn tick_loop(state: Arc<AppState>, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    info!("Starting tick scheduler ({}ms interval)", period.as_millis());

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }

            _ = interval.tick() => {
                match state.tick() {
                    Ok(completed) if !completed.is_empty() => {
                        debug!("Tick completed {} timer(s)", completed.len());
                    }
                    Ok(_) => {}
                    Err(e) => error!("Tick failed: {}", e),
                }
            }
        }
    }

    info!("Tick scheduler stopped");
}
