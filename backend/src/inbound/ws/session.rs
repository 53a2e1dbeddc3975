//! Per-connection WebSocket handler.
//!
//! Subscribes the session user's notification list through the injected
//! `NotificationSubscriptions` port and pushes every change to the client. The
//! public WebSocket contract pings every 5s and considers a connection idle
//! after 10s without client traffic. Tests shorten these intervals to speed
//! up feedback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::NotificationSubscriptions;
use crate::domain::{Notification, UserSession};
use crate::inbound::ws::messages::ServerMessage;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    subscriptions: Arc<dyn NotificationSubscriptions>,
    user: UserSession,
    session: Session,
    stream: MessageStream,
) {
    let (tx, updates) = mpsc::unbounded_channel();
    let listener = Box::new(move |notifications: Vec<Notification>| {
        // The receiver is gone once the socket loop has exited.
        let _ = tx.send(notifications);
    });

    let mut subscription = match subscriptions.observe(&user, listener).await {
        Ok(subscription) => subscription,
        Err(error) => {
            warn!(error = %error, user_id = %user.user_id(), "Failed to observe notifications");
            let reason = CloseReason {
                code: CloseCode::Error,
                description: Some("notifications unavailable".to_owned()),
            };
            if let Err(error) = session.close(Some(reason)).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
            return;
        }
    };

    WsSession { updates }.run(session, stream).await;
    subscription.cancel();
    debug!(user_id = %user.user_id(), "Notification subscription released");
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    FeedEnded,
    Protocol(ProtocolError),
    UnexpectedPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    updates: UnboundedReceiver<Vec<Notification>>,
}

impl WsSession {
    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                update = self.updates.recv() => {
                    handle_update(&mut session, update).await
                }
            };

            if let Err(error) = result {
                log_shutdown_reason(&error);
                close_session_if_needed(session, close_action_for(&error)).await;
                return;
            }
        }
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }

    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_update(
    session: &mut Session,
    update: Option<Vec<Notification>>,
) -> Result<(), SessionError> {
    let Some(notifications) = update else {
        return Err(SessionError::FeedEnded);
    };
    send_json(
        session,
        &ServerMessage::Notifications {
            notifications: &notifications,
        },
    )
    .await
    .map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let Some(message) = message else {
        return Err(SessionError::StreamClosed);
    };

    match message {
        Ok(message) => handle_message(session, last_heartbeat, message).await,
        Err(error) => Err(SessionError::Protocol(error)),
    }
}

async fn handle_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Message,
) -> Result<(), SessionError> {
    match message {
        Message::Ping(payload) => {
            *last_heartbeat = Instant::now();
            session
                .pong(&payload)
                .await
                .map_err(SessionError::Network)
        }
        Message::Pong(_) | Message::Nop => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
        Message::Text(_) | Message::Binary(_) | Message::Continuation(_) => {
            warn!("Rejected client payload on push-only WebSocket");
            Err(SessionError::UnexpectedPayload)
        }
        Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
    }
}

async fn send_json<T: serde::Serialize>(session: &mut Session, payload: &T) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            // In debug builds fail fast so schema drift is fixed; in release we log and keep the connection alive.
            if cfg!(debug_assertions) {
                panic!("notification pushes must serialize: {error}");
            } else {
                warn!(error = %error, "Failed to serialize WebSocket payload");
            }
            Ok(())
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::FeedEnded => {
            warn!("Notification feed ended; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::UnexpectedPayload
        | SessionError::ClientClosed(_)
        | SessionError::StreamClosed => {}
    }
}

fn close_action_for(error: &SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::FeedEnded => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("notification feed ended".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::UnexpectedPayload => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Policy,
            description: Some("push-only socket".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close WebSocket session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
