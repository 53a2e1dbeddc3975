//! Driving port for producing and acknowledging notifications.

use async_trait::async_trait;

use crate::domain::{DispatchReport, Error, NotificationEvent, NotificationKey, UserSession};

/// Request to publish one notification for a domain event.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishNotificationRequest {
    /// Display name of the producing user.
    pub sender: String,
    /// Human-readable message.
    pub message: String,
    /// Triggering event with its snapshot payload.
    pub event: NotificationEvent,
}

/// Domain use-case port for notification writes.
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Resolve recipients for the event and fan the notification out.
    ///
    /// Fails only when the directory cannot be read; per-recipient problems
    /// are reported in the returned [`DispatchReport`].
    async fn publish(&self, request: PublishNotificationRequest) -> Result<DispatchReport, Error>;

    /// Mark one notification in the session user's own list as read.
    async fn mark_as_read(&self, session: &UserSession, key: &NotificationKey) -> Result<(), Error>;

    /// Mark every notification in the session user's list as read.
    async fn mark_all_as_read(&self, session: &UserSession) -> Result<usize, Error>;
}
