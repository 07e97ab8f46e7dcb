// Identity directory kept in process memory
// Chat front ends register display names as users talk to the desk

use deployq_core::domain::HolderId;
use deployq_core::port::IdentityDirectory;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Holder id -> display name table
#[derive(Default)]
pub struct InMemoryDirectory {
    names: RwLock<HashMap<HolderId, String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or refresh) a holder's display name
    ///
    /// Blank names are ignored so a client that omits the name does not erase
    /// a known one.
    pub fn register(&self, holder: &HolderId, display_name: &str) {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return;
        }

        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        let previous = names.insert(holder.clone(), display_name.to_string());
        if previous.as_deref() != Some(display_name) {
            debug!(holder = %holder, display_name = %display_name, "Display name registered");
        }
    }
}

impl IdentityDirectory for InMemoryDirectory {
    fn display_name(&self, holder: &HolderId) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(holder)
            .cloned()
    }
}
