//! Transient user notifications.
//!
//! The host application owns the actual message bar; this dispatcher is the
//! channel the plugin pushes into. Receivers (UI bridge, demo logger, tests)
//! subscribe and render messages however they like. Publishing with no
//! subscribers is a no-op.

use tokio::sync::broadcast;

/// Severity of a transient message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational notice
    Info,
    /// Operation succeeded
    Success,
    /// Something was refused or skipped
    Warning,
}

impl std::fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One transient notification
#[derive(Debug, Clone)]
pub struct Message {
    /// Short source tag ("Auto Numbering", "Undo", ...).
    pub title: String,
    /// Human-readable body.
    pub text: String,
    /// Severity.
    pub level: MessageLevel,
    /// Suggested display duration in seconds.
    pub duration_secs: u64,
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.title, self.text)
    }
}

/// Dispatcher publishing messages to subscribers
#[derive(Clone)]
pub struct MessageDispatcher {
    /// Broadcast sender channel for messages.
    tx: broadcast::Sender<Message>,
}

impl MessageDispatcher {
    /// Create a new message dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer (default 100)
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Subscribe to messages
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.tx.subscribe()
    }

    /// Publish a message to all subscribers
    ///
    /// Messages published with no subscribers are dropped silently.
    pub fn publish(&self, message: Message) {
        let _ = self.tx.send(message);
    }

    /// Publish an info message
    pub fn push_info(&self, title: impl Into<String>, text: impl Into<String>, duration_secs: u64) {
        self.publish(Message {
            title: title.into(),
            text: text.into(),
            level: MessageLevel::Info,
            duration_secs,
        });
    }

    /// Publish a success message
    pub fn push_success(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        duration_secs: u64,
    ) {
        self.publish(Message {
            title: title.into(),
            text: text.into(),
            level: MessageLevel::Success,
            duration_secs,
        });
    }

    /// Publish a warning message
    pub fn push_warning(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        duration_secs: u64,
    ) {
        self.publish(Message {
            title: title.into(),
            text: text.into(),
            level: MessageLevel::Warning,
            duration_secs,
        });
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_receive() {
        let dispatcher = MessageDispatcher::default();
        let mut rx = dispatcher.subscribe();

        dispatcher.push_success("Success", "Number 3 assigned", 3);

        let msg = rx.try_recv().expect("message available");
        assert_eq!(msg.level, MessageLevel::Success);
        assert_eq!(msg.text, "Number 3 assigned");
        assert_eq!(msg.duration_secs, 3);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let dispatcher = MessageDispatcher::default();
        assert_eq!(dispatcher.subscriber_count(), 0);
        // Must not panic or error
        dispatcher.push_info("Auto Numbering", "activated", 5);
    }
}
