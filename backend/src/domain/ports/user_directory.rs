//! Port for reading the user directory.
//!
//! The directory is always read as a whole: recipient resolution needs every
//! record, and the realtime backend exposes it as one subtree keyed by user id.

use async_trait::async_trait;

use crate::domain::{DirectoryRecord, DirectorySnapshot, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Backend could not be reached.
        [unavailable]
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Read failed or returned data that could not be decoded.
        Read { message: String } =>
            "user directory read failed: {message}",
    }
}

/// Read access to the directory of registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the complete directory in one read.
    async fn snapshot(&self) -> Result<DirectorySnapshot, UserDirectoryError>;

    /// Fetch a single record by key.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<DirectoryRecord>, UserDirectoryError>;
}
