// Messenger Port
// Direct (one-to-one) message delivery to a holder

use crate::domain::HolderId;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery errors
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Recipient unreachable: {0}")]
    Unreachable(String),
}

/// Sends direct messages ("it's your turn", "still deploying?")
///
/// Implementations:
/// - InMemoryMailbox: per-holder inbox drained over RPC
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_direct(&self, to: &HolderId, text: &str) -> Result<(), DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Messenger that records every delivery
    #[derive(Default, Clone)]
    pub struct RecordingMessenger {
        sent: Arc<Mutex<Vec<(HolderId, String)>>>,
        fail: bool,
    }

    impl RecordingMessenger {
        pub fn new() -> Self {
            Self::default()
        }

        /// Messenger whose every delivery fails
        pub fn new_failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<(HolderId, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, holder: &str) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter(|(to, _)| to.as_str() == holder)
                .map(|(_, text)| text)
                .collect()
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_direct(&self, to: &HolderId, text: &str) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Unreachable(to.to_string()));
            }
            self.sent.lock().unwrap().push((to.clone(), text.to_string()));
            Ok(())
        }
    }
}
