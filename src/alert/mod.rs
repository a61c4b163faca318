//! Completion alerts
//!
//! Dispatchers are told about each timer completion exactly once. An alert
//! may keep sounding after `dispatch` returns; it ends when the dispatcher is
//! told to `stop` it (dismissal, delete or restart of the timer). Dispatchers
//! run in the alert dispatch task, so a failing alert never affects timer state.

pub mod bell;
pub mod command;
pub mod log_alert;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AlertError,
    state::{TimerCompleted, TimerId},
};

pub use bell::BellAlert;
pub use command::CommandAlert;
pub use log_alert::LogAlert;

/// Something that signals a completed timer to the user
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Signal one completion
    async fn dispatch(&self, event: &TimerCompleted) -> Result<(), AlertError>;

    /// Silence any alert still sounding for `id`. One-shot alerts have nothing to stop.
    async fn stop(&self, _id: &TimerId) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Forwards every completion to several dispatchers
pub struct FanoutAlert {
    dispatchers: Vec<Arc<dyn AlertDispatcher>>,
}

impl FanoutAlert {
    pub fn new(dispatchers: Vec<Arc<dyn AlertDispatcher>>) -> Self {
        Self { dispatchers }
    }
}

#[async_trait]
impl AlertDispatcher for FanoutAlert {
    fn name(&self) -> &str {
        "fanout"
    }

    /// Every dispatcher is tried; the first failure is reported afterwards
    async fn dispatch(&self, event: &TimerCompleted) -> Result<(), AlertError> {
        let mut first_error = None;

        for dispatcher in &self.dispatchers {
            if let Err(e) = dispatcher.dispatch(event).await {
                tracing::warn!("Alert '{}' failed for timer {}: {}", dispatcher.name(), event.id, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn stop(&self, id: &TimerId) -> Result<(), AlertError> {
        let mut first_error = None;

        for dispatcher in &self.dispatchers {
            if let Err(e) = dispatcher.stop(id).await {
                tracing::warn!("Stopping alert '{}' failed for timer {}: {}", dispatcher.name(), id, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        stops: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                stops: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl AlertDispatcher for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn dispatch(&self, _event: &TimerCompleted) -> Result<(), AlertError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AlertError::CommandFailed {
                    code: Some(1),
                    stderr: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }

        async fn stop(&self, _id: &TimerId) -> Result<(), AlertError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn fanout_tries_every_dispatcher() {
        let failing = Counting::new(true);
        let ok = Counting::new(false);
        let fanout = FanoutAlert::new(vec![failing.clone(), ok.clone()]);

        let event = TimerCompleted {
            id: TimerId::from("t"),
            title: "Tea".to_string(),
            completed_at: Utc::now(),
        };
        assert!(fanout.dispatch(&event).await.is_err());
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ok.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fanout_stops_every_dispatcher() {
        let a = Counting::new(false);
        let b = Counting::new(true);
        let fanout = FanoutAlert::new(vec![a.clone(), b.clone()]);

        fanout.stop(&TimerId::from("t")).await.unwrap();
        assert_eq!(a.stops.load(Ordering::SeqCst), 1);
        assert_eq!(b.stops.load(Ordering::SeqCst), 1);
    }
}
