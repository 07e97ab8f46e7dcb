// Application Layer - Use Cases over the shared queue

pub mod desk;
pub mod notifier;

use crate::domain::TurnQueue;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The single queue instance, shared by the desk and the notifier
///
/// Every mutation and every reminder expiry check goes through this lock.
pub type SharedQueue = Arc<Mutex<TurnQueue>>;

/// Create an empty shared queue
pub fn shared_queue() -> SharedQueue {
    Arc::new(Mutex::new(TurnQueue::new()))
}

// Re-exports
pub use desk::{ChatMessage, Command, DeployDesk, DeskConfig, Invocation, QueueView};
pub use notifier::{ArmedReminder, TurnEvent, TurnNotifier};
