// Entry matching (exact holder or arbitrary predicate)

use super::entry::{Entry, HolderId};

/// Decides whether an entry belongs to whoever the caller is looking for
///
/// Implemented for exact holder ids and for any `Fn(&Entry) -> bool`, so the
/// desk can match by identity or by display name through the same queue API
/// without the queue knowing about names.
pub trait Matcher {
    fn matches(&self, entry: &Entry) -> bool;
}

impl Matcher for HolderId {
    fn matches(&self, entry: &Entry) -> bool {
        entry.is_held_by(self)
    }
}

impl Matcher for &HolderId {
    fn matches(&self, entry: &Entry) -> bool {
        entry.is_held_by(self)
    }
}

impl<F> Matcher for F
where
    F: Fn(&Entry) -> bool,
{
    fn matches(&self, entry: &Entry) -> bool {
        self(entry)
    }
}
