//! Point-in-time view of the user directory.
//!
//! A snapshot is read once per publish and shared by recipient resolution and
//! identifier lookup, so both steps see the same directory state.

use serde::{Deserialize, Serialize};

use super::{DirectoryEntry, UserId};

/// Directory entry paired with its backend key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub id: UserId,
    pub entry: DirectoryEntry,
}

impl DirectoryRecord {
    /// Pair an entry with its key.
    pub fn new(id: UserId, entry: DirectoryEntry) -> Self {
        Self { id, entry }
    }
}

/// Full directory contents as returned by one read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySnapshot {
    records: Vec<DirectoryRecord>,
}

impl DirectorySnapshot {
    /// Wrap the records returned by a directory read.
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self { records }
    }

    /// Iterate entries without their keys.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.records.iter().map(|record| &record.entry)
    }

    /// Key of the first record whose email and full name both match exactly.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{DirectoryEntry, DirectoryRecord, DirectorySnapshot, Role, UserId};
    ///
    /// let id = UserId::new("u-1").expect("key");
    /// let entry = DirectoryEntry::new("a@x.com", "A", "B", Role::new("Client")).expect("entry");
    /// let snapshot = DirectorySnapshot::new(vec![DirectoryRecord::new(id.clone(), entry)]);
    ///
    /// assert_eq!(snapshot.identifier_for("a@x.com", "A B"), Some(&id));
    /// assert_eq!(snapshot.identifier_for("a@x.com", "A C"), None);
    /// ```
    #[must_use]
    pub fn identifier_for(&self, email: &str, full_name: &str) -> Option<&UserId> {
        self.records
            .iter()
            .find(|record| record.entry.matches_identity(email, full_name))
            .map(|record| &record.id)
    }

    /// First record with the given email.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&DirectoryRecord> {
        self.records.iter().find(|record| record.entry.email == email)
    }
}

impl FromIterator<DirectoryRecord> for DirectorySnapshot {
    fn from_iter<T: IntoIterator<Item = DirectoryRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
