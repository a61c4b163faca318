//! Terminal bell alert

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::AlertDispatcher;
use crate::{
    error::AlertError,
    state::{TimerCompleted, TimerId},
};

/// Spacing between repeated bells while an alert is active
pub const DEFAULT_RING_INTERVAL: Duration = Duration::from_secs(2);

/// Rings the terminal bell and prints the completed timer's title, then keeps
/// ringing until the alert is stopped
pub struct BellAlert<W = tokio::io::Stdout> {
    out: Arc<Mutex<W>>,
    every: Duration,
    ringing: Mutex<HashMap<TimerId, JoinHandle<()>>>,
}

impl BellAlert {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> BellAlert<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(out: W) -> Self {
        Self::with_interval(out, DEFAULT_RING_INTERVAL)
    }

    pub fn with_interval(out: W, every: Duration) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            every: every.max(Duration::from_millis(1)),
            ringing: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the bell is still ringing for `id`
    pub async fn is_ringing(&self, id: &TimerId) -> bool {
        self.ringing
            .lock()
            .await
            .get(id)
            .is_some_and(|task| !task.is_finished())
    }
}

impl<W> Drop for BellAlert<W> {
    fn drop(&mut self) {
        for (_, task) in self.ringing.get_mut().drain() {
            task.abort();
        }
    }
}

async fn ring<W>(out: Arc<Mutex<W>>, every: Duration, id: TimerId)
where
    W: AsyncWrite + Unpin + Send,
{
    let mut interval = interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let mut out = out.lock().await;
        let written = match out.write_all(b"\x07").await {
            Ok(()) => out.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!("Bell for timer {} stopped ringing: {}", id, e);
            break;
        }
    }
}

#[async_trait]
impl<W> AlertDispatcher for BellAlert<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        "bell"
    }

    async fn dispatch(&self, event: &TimerCompleted) -> Result<(), AlertError> {
        let line = format!("\x07Timer \"{}\" has ended!\n", event.title);
        {
            let mut out = self.out.lock().await;
            out.write_all(line.as_bytes()).await?;
            out.flush().await?;
        }

        let task = tokio::spawn(ring(Arc::clone(&self.out), self.every, event.id.clone()));
        if let Some(previous) = self.ringing.lock().await.insert(event.id.clone(), task) {
            previous.abort();
        }
        Ok(())
    }

    async fn stop(&self, id: &TimerId) -> Result<(), AlertError> {
        if let Some(task) = self.ringing.lock().await.remove(id) {
            task.abort();
            debug!("Bell for timer {} silenced", id);
        }
        Ok(())
    }
}
