// Port Layer - Interfaces for external dependencies

pub mod identity_directory;
pub mod messenger;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use identity_directory::IdentityDirectory;
pub use messenger::{DeliveryError, Messenger};
pub use time_provider::TimeProvider;
