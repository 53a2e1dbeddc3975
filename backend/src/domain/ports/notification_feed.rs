//! Port for live notification list updates.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::UserId;

use super::{NotificationChild, define_port_error};

define_port_error! {
    /// Errors raised while opening a live feed.
    pub enum NotificationFeedError {
        /// Backend could not be reached.
        [unavailable]
        Connection { message: String } =>
            "notification feed connection failed: {message}",
    }
}

/// Stream of full child sets; each item replaces the previous one.
pub type NotificationChildStream = BoxStream<'static, Vec<NotificationChild>>;

/// Live listener on a user's notification list.
///
/// The first item of the returned stream is the current list; every later
/// item follows a change. The stream ends when the backend drops the
/// listener. Reconnection is the adapter's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    /// Start listening on the list owned by `user_id`.
    async fn subscribe(&self, user_id: &UserId) -> Result<NotificationChildStream, NotificationFeedError>;
}
