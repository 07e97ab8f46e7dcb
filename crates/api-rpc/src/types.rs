//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use deployq_core::application::desk::EntryView;
use deployq_core::application::ChatMessage;
use serde::{Deserialize, Serialize};

/// deploy.command.v1 - Run a chat command
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub user_id: String,
    /// Refreshes the directory entry for `user_id` when present
    #[serde(default)]
    pub display_name: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub messages: Vec<ChatMessage>,
}

/// deploy.queue.v1 - Show the queue
#[derive(Debug, Deserialize)]
pub struct QueueRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueResponse {
    pub entries: Vec<EntryView>,
    pub run_length: usize,
}

/// deploy.inbox.v1 - Drain a user's direct messages
#[derive(Debug, Deserialize)]
pub struct InboxRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InboxResponse {
    pub user_id: String,
    pub messages: Vec<String>,
}

/// admin.status.v1 - Daemon status
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub queue_length: usize,
    pub current_holder: Option<String>,
    pub reminder_holder: Option<String>,
    pub reminder_deadline_millis: Option<i64>,
    pub idle_timeout_secs: u64,
    pub uptime_seconds: u64,
}
