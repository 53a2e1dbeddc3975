//! Driving port for directory profile lookups.
//!
//! Inbound adapters use this port to bind sessions and to name the sender of
//! published notifications. It never feeds recipient resolution, which always
//! reads a fresh directory snapshot.

use async_trait::async_trait;

use crate::domain::{DirectoryEntry, DirectoryRecord, Error, UserId};

/// Domain use-case port for reading directory profiles.
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Profile stored under `user_id`.
    async fn profile(&self, user_id: &UserId) -> Result<DirectoryEntry, Error>;

    /// Keyed record registered with `email`.
    async fn find_by_email(&self, email: &str) -> Result<DirectoryRecord, Error>;
}
