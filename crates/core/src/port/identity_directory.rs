// Identity Directory Port
// Resolves holder ids to human-readable display names (rendering only)

use crate::domain::HolderId;

/// Identity lookup used by the desk to render names and match `remove <name>`
///
/// Synchronous on purpose: lookups run inside queue matchers while the queue
/// lock is held.
pub trait IdentityDirectory: Send + Sync {
    /// Display name for a holder, if the directory knows one
    fn display_name(&self, holder: &HolderId) -> Option<String>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;

    /// Directory backed by a fixed id -> name table
    #[derive(Default)]
    pub struct StaticDirectory {
        names: HashMap<HolderId, String>,
    }

    impl StaticDirectory {
        pub fn new<I, K, V>(names: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<HolderId>,
            V: Into<String>,
        {
            Self {
                names: names
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            }
        }
    }

    impl IdentityDirectory for StaticDirectory {
        fn display_name(&self, holder: &HolderId) -> Option<String> {
            self.names.get(holder).cloned()
        }
    }
}
