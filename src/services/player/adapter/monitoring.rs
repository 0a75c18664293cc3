use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::services::player::{PlayerError, notifications::EnvelopeReceiver};

use super::PlatformPlayerAdapter;

/// Applies queued platform notifications to an adapter on a tokio task.
///
/// The task is the adapter's single writer for notification-driven state.
/// It holds only a weak reference, so it stops once the adapter is dropped.
/// If the task ends while the adapter is alive (aborted or its runtime shut
/// down), the queue is handed back so it can be drained or monitored again.
pub struct NotificationMonitor;

/// Receiver borrowed from an adapter for the lifetime of a monitor task.
struct ReceiverLease {
    adapter: Weak<PlatformPlayerAdapter>,
    rx: Option<EnvelopeReceiver>,
}

impl Drop for ReceiverLease {
    fn drop(&mut self) {
        let (Some(adapter), Some(rx)) = (self.adapter.upgrade(), self.rx.take()) else {
            return;
        };
        debug!("Returning notification queue to adapter");
        adapter.restore_notification_receiver(rx);
    }
}

impl NotificationMonitor {
    /// Start draining `adapter`'s notification queue in the background.
    ///
    /// Must be called from within a tokio runtime. The queue is unbounded;
    /// a monitor that falls behind lets it grow rather than blocking posters.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::MonitorAlreadyRunning`] if a monitor already
    /// owns the queue.
    #[instrument(skip_all)]
    pub fn start(adapter: &Arc<PlatformPlayerAdapter>) -> Result<JoinHandle<()>, PlayerError> {
        let rx = adapter
            .take_notification_receiver()
            .ok_or(PlayerError::MonitorAlreadyRunning)?;

        debug!("Starting platform notification monitoring");

        let lease = ReceiverLease {
            adapter: Arc::downgrade(adapter),
            rx: Some(rx),
        };
        Ok(tokio::spawn(async move {
            Self::monitor_notifications(lease).await;
        }))
    }

    #[instrument(skip_all)]
    async fn monitor_notifications(mut lease: ReceiverLease) {
        let adapter = lease.adapter.clone();
        let Some(rx) = lease.rx.as_mut() else {
            return;
        };

        while let Some(envelope) = rx.recv().await {
            let Some(adapter) = adapter.upgrade() else {
                debug!("Adapter dropped, stopping monitor");
                return;
            };

            adapter.apply(envelope);
        }

        debug!("Notification queue closed");
    }
}
