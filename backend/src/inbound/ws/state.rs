//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on domain ports (use-cases) instead of
//! constructing domain services directly, so the adapter can be tested with
//! any port implementation.

use std::sync::Arc;

use crate::domain::ports::NotificationSubscriptions;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub subscriptions: Arc<dyn NotificationSubscriptions>,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(subscriptions: Arc<dyn NotificationSubscriptions>) -> Self {
        Self { subscriptions }
    }
}
