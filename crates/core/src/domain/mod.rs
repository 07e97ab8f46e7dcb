// Domain Layer - Pure queue logic and entities

pub mod entry;
pub mod error;
pub mod matcher;
pub mod queue;

// Re-exports
pub use entry::{Entry, HolderId};
pub use error::DomainError;
pub use matcher::Matcher;
pub use queue::TurnQueue;
