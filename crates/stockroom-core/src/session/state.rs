use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the session event channel. Slow subscribers lag rather than block.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Where the session currently stands, as screens render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Session transitions published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    /// The server rejected the token with a 401 and it was dropped locally.
    Expired,
}

/// Broadcast hub for `SessionEvent`s, shared by the gateway and services.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        if self.sender.send(event).is_err() {
            debug!(?event, "Session event had no subscribers");
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        events.publish(SessionEvent::LoggedIn);
        events.publish(SessionEvent::Expired);

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedIn);
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::Expired);
    }

    #[test]
    fn test_publish_without_subscribers_does_not_fail() {
        let events = SessionEvents::new();
        events.publish(SessionEvent::LoggedOut);
    }
}
