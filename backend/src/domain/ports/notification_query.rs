//! Driving port for reading the session user's notifications.

use async_trait::async_trait;

use crate::domain::{Error, Notification, UserSession};

/// Domain use-case port for notification reads.
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// Parsed notifications of the session user, newest first. Malformed
    /// records are left out.
    async fn list(&self, session: &UserSession) -> Result<Vec<Notification>, Error>;

    /// Number of unread notifications of the session user.
    async fn unread_count(&self, session: &UserSession) -> Result<usize, Error>;
}
