//! Wire-level message definitions for the WebSocket adapter.
//!
//! The server only pushes; clients send control frames (ping, pong, close).

use serde::Serialize;

use crate::domain::Notification;

/// Outbound payload pushed to connected clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage<'a> {
    /// Complete current list of the connected user, in push order.
    Notifications { notifications: &'a [Notification] },
}
