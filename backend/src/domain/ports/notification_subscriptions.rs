//! Driving port for live notification updates.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationSubscription, UserSession};

/// Callback receiving the complete current list after every change.
pub type NotificationListener = Box<dyn Fn(Vec<Notification>) + Send + Sync + 'static>;

/// Domain use-case port for observing the session user's list.
#[async_trait]
pub trait NotificationSubscriptions: Send + Sync {
    /// Subscribe `listener` until the returned handle is cancelled or dropped.
    async fn observe(
        &self,
        session: &UserSession,
        listener: NotificationListener,
    ) -> Result<NotificationSubscription, Error>;
}
