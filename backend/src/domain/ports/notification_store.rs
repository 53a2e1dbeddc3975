//! Port for per-user notification lists.
//!
//! Each user owns an append-only list of notification records keyed by push
//! keys. Records are only ever appended or have their read flag flipped.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Notification, NotificationKey, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification store adapters.
    pub enum NotificationStoreError {
        /// Backend could not be reached.
        [unavailable]
        Connection { message: String } =>
            "notification store connection failed: {message}",
        /// A write was rejected.
        Write { message: String } =>
            "notification store write failed: {message}",
        /// A read failed.
        Read { message: String } =>
            "notification store read failed: {message}",
        /// The notification could not be encoded for storage.
        Serialization { message: String } =>
            "notification serialisation failed: {message}",
    }
}

/// One child of a user's notification list in wire form.
///
/// Children stay untyped here; parsing (and dropping malformed records)
/// belongs to the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationChild {
    /// Push key assigned when the record was appended.
    pub key: String,
    /// Stored record.
    pub value: Value,
}

impl NotificationChild {
    /// Pair a push key with its stored record.
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Write and read access to users' notification lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Append `notification` to the list of `user_id`, returning the push key.
    async fn append(
        &self,
        user_id: &UserId,
        notification: &Notification,
    ) -> Result<String, NotificationStoreError>;

    /// Every child currently stored for `user_id`, in push order.
    async fn list(&self, user_id: &UserId) -> Result<Vec<NotificationChild>, NotificationStoreError>;

    /// Set `hasRead` on every record of `user_id` carrying `key`; returns the
    /// number of matching records.
    async fn mark_read(
        &self,
        user_id: &UserId,
        key: &NotificationKey,
    ) -> Result<usize, NotificationStoreError>;

    /// Set `hasRead` on every record of `user_id`; returns how many changed.
    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, NotificationStoreError>;
}
