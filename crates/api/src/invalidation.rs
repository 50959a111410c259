//! Post-mutation view invalidation signal.
//!
//! After any mutation, the affected list/detail view paths are published
//! here so subscribers (the UI gateway) can mark them stale and refetch.
//! This is a notification channel only; it carries no payload beyond the
//! path.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast channel of stale view paths.
pub struct Invalidations {
    tx: broadcast::Sender<String>,
}

impl Invalidations {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Mark one view path stale. A send error only means nobody is
    /// subscribed right now, which is fine.
    pub fn publish(&self, path: &str) {
        let _ = self.tx.send(path.to_string());
        tracing::debug!(path, "View invalidated");
    }

    /// Subscribe to stale-path notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for Invalidations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_paths() {
        let invalidations = Invalidations::new();
        let mut rx = invalidations.subscribe();

        invalidations.publish("/masses");
        assert_eq!(rx.recv().await.unwrap(), "/masses");
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        Invalidations::new().publish("/events");
    }
}
