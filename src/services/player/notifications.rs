use tokio::sync::mpsc;

use super::platform::PlatformNotification;

/// A notification tagged with the player slot assignment that produced it.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub(crate) generation: u64,
    pub(crate) notification: PlatformNotification,
}

pub(crate) type EnvelopeSender = mpsc::UnboundedSender<Envelope>;
pub(crate) type EnvelopeReceiver = mpsc::UnboundedReceiver<Envelope>;

pub(crate) fn channel() -> (EnvelopeSender, EnvelopeReceiver) {
    mpsc::unbounded_channel()
}

/// Observer handle given to a platform player.
///
/// Posting only enqueues the notification; it is applied later by the
/// adapter's single writer (a [`NotificationMonitor`](super::NotificationMonitor)
/// or `drain_notifications`). Posting never blocks and is safe from any thread.
#[derive(Debug, Clone)]
pub struct NotificationSink {
    generation: u64,
    tx: EnvelopeSender,
}

impl NotificationSink {
    pub(crate) fn new(generation: u64, tx: EnvelopeSender) -> Self {
        Self { generation, tx }
    }

    /// Queue a notification for the adapter.
    ///
    /// Returns `false` when the adapter is gone.
    pub fn post(&self, notification: PlatformNotification) -> bool {
        self.tx
            .send(Envelope {
                generation: self.generation,
                notification,
            })
            .is_ok()
    }

    /// Slot assignment this sink was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
