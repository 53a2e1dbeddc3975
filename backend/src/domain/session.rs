//! Authenticated-user context passed explicitly to services.
//!
//! Inbound adapters build a [`UserSession`] from their transport's session
//! state; services scope "my own notifications" operations to it.

use super::UserId;

/// The currently authenticated directory user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    user_id: UserId,
}

impl UserSession {
    /// Bind a session to an authenticated user.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Identifier of the authenticated user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
