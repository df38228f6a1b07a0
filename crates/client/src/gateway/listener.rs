use tokio::sync::broadcast::{self, error::RecvError};

use finanzas_core::cache::{ChangeNotification, SeenIds};

/// Default number of notification ids a deduplicating listener remembers.
pub const DEFAULT_SEEN_CAPACITY: usize = 256;

/// Consumer side of the change bus.
///
/// A naive listener yields every notification, so a single mutation is seen
/// twice (immediate and delayed). A deduplicating listener additionally
/// skips ids it has already yielded.
pub struct ChangeListener {
    receiver: broadcast::Receiver<ChangeNotification>,
    seen: Option<SeenIds>,
}

impl ChangeListener {
    pub fn naive(receiver: broadcast::Receiver<ChangeNotification>) -> Self {
        Self {
            receiver,
            seen: None,
        }
    }

    pub fn deduplicating(receiver: broadcast::Receiver<ChangeNotification>, capacity: usize) -> Self {
        Self {
            receiver,
            seen: Some(SeenIds::new(capacity)),
        }
    }

    /// Waits for the next notification. Returns `None` once the bus closes.
    ///
    /// If the listener fell behind, the skipped notifications are logged and
    /// dropped.
    pub async fn next(&mut self) -> Option<ChangeNotification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) => {
                    if let Some(seen) = self.seen.as_mut() {
                        if !seen.first_sighting(&notification.id) {
                            tracing::trace!(id = %notification.id, "Skipping repeated notification");
                            continue;
                        }
                    }
                    return Some(notification);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change listener lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
