//! Notification records and their tagged payloads.
//!
//! A [`Notification`] pairs delivery metadata with a [`NotificationEvent`],
//! the sum type that fixes both the type tag and the payload shape. On the
//! wire the two are flattened into `type` and `details` fields:
//!
//! ```text
//! {"timestamp": 1714000000000, "sender": "Coop Admin", "message": "...",
//!  "type": "ORDER_PLACED", "details": {...}, "hasRead": false}
//! ```
//!
//! Parsing rejects records whose `details` do not fit the declared `type`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

use super::{DirectoryEntry, OrderSnapshot, SpecialRequestSnapshot};

/// Type tag selecting the payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Broadcast notice about a user.
    Notice,
    /// A client placed an order.
    OrderPlaced,
    /// An order changed status.
    OrderUpdated,
    /// A special request changed status.
    SpecialRequestUpdated,
}

/// Domain event carried by a notification, with its payload embedded by value.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// Plain notice referencing a directory user.
    Notice(DirectoryEntry),
    /// Order placed; fans out to the cooperatives handling its products.
    OrderPlaced(OrderSnapshot),
    /// Order updated; goes to the ordering client.
    OrderUpdated(OrderSnapshot),
    /// Special request updated; goes to the requester.
    SpecialRequestUpdated(SpecialRequestSnapshot),
}

impl NotificationEvent {
    /// Type tag for this event.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::Notice(_) => NotificationKind::Notice,
            Self::OrderPlaced(_) => NotificationKind::OrderPlaced,
            Self::OrderUpdated(_) => NotificationKind::OrderUpdated,
            Self::SpecialRequestUpdated(_) => NotificationKind::SpecialRequestUpdated,
        }
    }

    /// Rebuild an event from a type tag and its raw `details` payload.
    pub fn from_parts(kind: NotificationKind, details: Value) -> Result<Self, NotificationParseError> {
        let event = match kind {
            NotificationKind::Notice => Self::Notice(payload(kind, details)?),
            NotificationKind::OrderPlaced => Self::OrderPlaced(payload(kind, details)?),
            NotificationKind::OrderUpdated => Self::OrderUpdated(payload(kind, details)?),
            NotificationKind::SpecialRequestUpdated => {
                Self::SpecialRequestUpdated(payload(kind, details)?)
            }
        };
        Ok(event)
    }
}

fn payload<T: serde::de::DeserializeOwned>(
    kind: NotificationKind,
    details: Value,
) -> Result<T, NotificationParseError> {
    serde_json::from_value(details).map_err(|source| NotificationParseError::Details {
        kind,
        message: source.to_string(),
    })
}

/// Errors raised while parsing a stored notification record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationParseError {
    /// The record envelope is missing fields or has wrong types.
    #[error("malformed notification record: {message}")]
    Envelope { message: String },
    /// `details` does not match the shape required by `type`.
    #[error("details do not match {kind:?}: {message}")]
    Details {
        kind: NotificationKind,
        message: String,
    },
}

/// Notification delivered into a user's personal list.
///
/// Only `has_read` ever changes after delivery.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "NotificationRecord")]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub sender: String,
    pub message: String,
    pub event: NotificationEvent,
    pub has_read: bool,
}

impl Notification {
    /// Build an unread notification. The timestamp is truncated to
    /// milliseconds to match the stored precision.
    pub fn new(
        timestamp: DateTime<Utc>,
        sender: impl Into<String>,
        message: impl Into<String>,
        event: NotificationEvent,
    ) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(3),
            sender: sender.into(),
            message: message.into(),
            event,
            has_read: false,
        }
    }

    /// Type tag of the embedded event.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.event.kind()
    }

    /// Key identifying this notification within one user's list.
    #[must_use]
    pub fn key(&self) -> NotificationKey {
        NotificationKey::new(self.timestamp, self.sender.clone())
    }

    /// Parse a stored record.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Notification, NotificationKind};
    /// use serde_json::json;
    ///
    /// let record = json!({
    ///     "timestamp": 1714000000000_i64,
    ///     "sender": "Admin",
    ///     "message": "Welcome",
    ///     "type": "NOTICE",
    ///     "details": { "email": "a@x.com", "firstName": "A", "lastName": "B", "role": "Client" },
    ///     "hasRead": false
    /// });
    /// let notification = Notification::from_value(record).expect("well-formed record");
    /// assert_eq!(notification.kind(), NotificationKind::Notice);
    /// ```
    pub fn from_value(value: Value) -> Result<Self, NotificationParseError> {
        let record: NotificationRecord = serde_json::from_value(value).map_err(|source| {
            NotificationParseError::Envelope {
                message: source.to_string(),
            }
        })?;
        Self::try_from(record)
    }

    /// Wire representation of this notification.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Wire shape of a stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Milliseconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64, example = 1_714_000_000_000_i64)]
    pub timestamp: DateTime<Utc>,
    pub sender: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[schema(value_type = Object)]
    pub details: Value,
    pub has_read: bool,
}

impl TryFrom<NotificationRecord> for Notification {
    type Error = NotificationParseError;

    fn try_from(value: NotificationRecord) -> Result<Self, Self::Error> {
        let NotificationRecord {
            timestamp,
            sender,
            message,
            kind,
            details,
            has_read,
        } = value;
        Ok(Self {
            timestamp,
            sender,
            message,
            event: NotificationEvent::from_parts(kind, details)?,
            has_read,
        })
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum DetailsRef<'a> {
    User(&'a DirectoryEntry),
    Order(&'a OrderSnapshot),
    SpecialRequest(&'a SpecialRequestSnapshot),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordRef<'a> {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    sender: &'a str,
    message: &'a str,
    #[serde(rename = "type")]
    kind: NotificationKind,
    details: DetailsRef<'a>,
    has_read: bool,
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let details = match &self.event {
            NotificationEvent::Notice(entry) => DetailsRef::User(entry),
            NotificationEvent::OrderPlaced(order) | NotificationEvent::OrderUpdated(order) => {
                DetailsRef::Order(order)
            }
            NotificationEvent::SpecialRequestUpdated(request) => DetailsRef::SpecialRequest(request),
        };
        RecordRef {
            timestamp: self.timestamp,
            sender: &self.sender,
            message: &self.message,
            kind: self.kind(),
            details,
            has_read: self.has_read,
        }
        .serialize(serializer)
    }
}

/// Identifies a notification inside one user's list by `(timestamp, sender)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationKey {
    /// Milliseconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub timestamp: DateTime<Utc>,
    pub sender: String,
}

impl NotificationKey {
    /// Build a key; the timestamp is truncated to milliseconds.
    pub fn new(timestamp: DateTime<Utc>, sender: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(3),
            sender: sender.into(),
        }
    }

    /// True when `record` (in wire form) carries this key.
    #[must_use]
    pub fn matches_record(&self, record: &Value) -> bool {
        record.get("timestamp").and_then(Value::as_i64) == Some(self.timestamp.timestamp_millis())
            && record.get("sender").and_then(Value::as_str) == Some(self.sender.as_str())
    }
}
