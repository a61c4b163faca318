//! Completion alert background task

use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{error, info, warn};

use crate::{alert::AlertDispatcher, state::AlertEvent};

/// Forward alert starts and stops to the dispatcher until the channel closes.
///
/// Dispatch failures are logged and dropped; timer state has already moved on.
pub async fn alert_dispatch_task(mut rx: Receiver<AlertEvent>, dispatcher: Arc<dyn AlertDispatcher>) {
    info!("Starting alert dispatch task ({})", dispatcher.name());

    loop {
        match rx.recv().await {
            Ok(AlertEvent::Completed(event)) => {
                if let Err(e) = dispatcher.dispatch(&event).await {
                    error!("Alert '{}' failed for timer {}: {}", dispatcher.name(), event.id, e);
                }
            }
            Ok(AlertEvent::Dismissed(id)) => {
                if let Err(e) = dispatcher.stop(&id).await {
                    error!("Stopping alert '{}' failed for timer {}: {}", dispatcher.name(), id, e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alert dispatch fell behind, {} event(s) skipped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Alert channel closed, stopping alert dispatch task");
                break;
            }
        }
    }
}
