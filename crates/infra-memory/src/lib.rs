// Deployq Infrastructure - In-Memory Adapters
// Implements: IdentityDirectory, Messenger

pub mod directory;
pub mod mailbox;

pub use directory::InMemoryDirectory;
pub use mailbox::InMemoryMailbox;
