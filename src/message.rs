//! User-visible message queue
//!
//! Commands report through here instead of writing to the screen. At
//! most one message is shown at a time, in the row above the status
//! line; messages expire on a per-level timeout or on the next input.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Success,
}

impl Level {
    fn ttl(self) -> Duration {
        match self {
            Level::Info => Duration::from_secs(5),
            Level::Warning => Duration::from_secs(8),
            Level::Error => Duration::from_secs(10),
            Level::Success => Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub level: Level,
    created: Instant,
    ttl: Duration,
}

impl Message {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) > self.ttl
    }
}

#[derive(Debug, Default)]
pub struct MessageQueue {
    queue: Vec<Message>,
}

impl MessageQueue {
    pub fn new() -> Self {
        MessageQueue::default()
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>) {
        self.queue.push(Message {
            text: text.into(),
            level,
            created: Instant::now(),
            ttl: level.ttl(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Level::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Level::Success, text);
    }

    /// The single message currently shown: the newest live entry
    pub fn current(&self) -> Option<&Message> {
        self.queue.last()
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        self.queue.retain(|m| !m.is_expired(now));
    }

    /// Dismiss everything; called on the next input after display
    pub fn dismiss(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_message_shown() {
        let mut q = MessageQueue::new();
        q.info("first");
        q.error("second");
        assert_eq!(q.current().unwrap().text, "second");
        assert_eq!(q.current().unwrap().level, Level::Error);
    }

    #[test]
    fn test_dismiss_clears() {
        let mut q = MessageQueue::new();
        q.success("saved");
        q.dismiss();
        assert!(q.current().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn test_prune_keeps_fresh_messages() {
        let mut q = MessageQueue::new();
        q.warning("still here");
        q.prune_expired();
        assert_eq!(q.current().unwrap().text, "still here");
    }
}
