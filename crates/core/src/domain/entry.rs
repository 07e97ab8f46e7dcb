// Entry Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity token of a queue participant (chat user id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(String);

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HolderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for HolderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One queue membership record
///
/// Two entries with the same holder are distinct turns; an entry has no
/// identity beyond its holder, metadata and position in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub holder: HolderId,
    /// What is being deployed (empty if omitted at join time)
    pub metadata: String,
}

impl Entry {
    pub fn new(holder: impl Into<HolderId>, metadata: impl Into<String>) -> Self {
        Self {
            holder: holder.into(),
            metadata: metadata.into(),
        }
    }

    pub fn is_held_by(&self, holder: &HolderId) -> bool {
        &self.holder == holder
    }
}
