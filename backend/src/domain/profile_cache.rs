//! Explicit cache of directory profiles keyed by user id.
//!
//! Holds the profiles used to bind sessions and name senders. Entries live
//! until the directory adapter invalidates them on a record change; there is
//! no expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{DirectoryEntry, UserId};

/// Thread-safe profile cache shared by request handlers.
#[derive(Debug, Default)]
pub struct ProfileCache {
    entries: Mutex<HashMap<UserId, DirectoryEntry>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<UserId, DirectoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached profile for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<DirectoryEntry> {
        self.guard().get(id).cloned()
    }

    /// Store `entry` under `id`, replacing any previous profile.
    pub fn insert(&self, id: UserId, entry: DirectoryEntry) {
        self.guard().insert(id, entry);
    }

    /// Forget the profile of `id`. Returns true when one was cached.
    pub fn invalidate(&self, id: &UserId) -> bool {
        self.guard().remove(id).is_some()
    }
}
