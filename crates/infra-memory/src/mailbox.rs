// Direct-message mailbox kept in process memory
// Messages wait per holder until a client drains them

use async_trait::async_trait;
use deployq_core::domain::HolderId;
use deployq_core::port::{DeliveryError, Messenger};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Messages kept per holder before the oldest are dropped
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Per-holder inbox implementing the `Messenger` port
pub struct InMemoryMailbox {
    inboxes: Mutex<HashMap<HolderId, VecDeque<String>>>,
    capacity: usize,
}

impl Default for InMemoryMailbox {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX_CAPACITY)
    }
}

impl InMemoryMailbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            inboxes: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Take every pending message for `holder`, oldest first
    pub fn drain(&self, holder: &HolderId) -> Vec<String> {
        self.inboxes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(holder)
            .map(Vec::from)
            .unwrap_or_default()
    }

    pub fn pending(&self, holder: &HolderId) -> usize {
        self.inboxes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(holder)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl Messenger for InMemoryMailbox {
    async fn send_direct(&self, to: &HolderId, text: &str) -> Result<(), DeliveryError> {
        let mut inboxes = self.inboxes.lock().unwrap_or_else(PoisonError::into_inner);
        let inbox = inboxes.entry(to.clone()).or_default();
        if inbox.len() == self.capacity {
            inbox.pop_front();
            warn!(holder = %to, capacity = self.capacity, "Inbox full, dropped oldest message");
        }
        inbox.push_back(text.to_string());
        info!(holder = %to, text = %text, "Direct message queued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_drain_returns_messages_in_order_once() {
        let mailbox = InMemoryMailbox::default();
        let u1 = HolderId::from("U1");

        assert_ok!(mailbox.send_direct(&u1, "first").await);
        assert_ok!(mailbox.send_direct(&u1, "second").await);
        assert_eq!(mailbox.pending(&u1), 2);

        assert_eq!(mailbox.drain(&u1), vec!["first", "second"]);
        assert!(mailbox.drain(&u1).is_empty());
        assert_eq!(mailbox.pending(&u1), 0);
    }

    #[tokio::test]
    async fn test_inboxes_are_per_holder() {
        let mailbox = InMemoryMailbox::default();
        let u1 = HolderId::from("U1");
        let u2 = HolderId::from("U2");

        assert_ok!(mailbox.send_direct(&u1, "for alice").await);

        assert!(mailbox.drain(&u2).is_empty());
        assert_eq!(mailbox.drain(&u1), vec!["for alice"]);
    }

    #[tokio::test]
    async fn test_full_inbox_drops_oldest() {
        let mailbox = InMemoryMailbox::new(2);
        let u1 = HolderId::from("U1");

        for text in ["a", "b", "c"] {
            assert_ok!(mailbox.send_direct(&u1, text).await);
        }

        assert_eq!(mailbox.drain(&u1), vec!["b", "c"]);
    }
}
