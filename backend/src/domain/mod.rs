//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed notification model and the services
//! that resolve recipients, fan notifications out and observe users' lists.
//! Transport and storage concerns stay behind the traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - DirectoryEntry / DirectorySnapshot: directory records and one read of
//!   the whole directory.
//! - Notification / NotificationEvent: a delivered notification and its
//!   tagged payload.
//! - RecipientResolver, NotificationDispatcher, NotificationObserver: the
//!   three notification components.
//! - NotificationService, UserProfileService: driving port implementations.

pub mod directory;
pub mod error;
pub mod notification;
pub mod notification_dispatcher;
pub mod notification_observer;
pub mod notification_service;
pub mod order;
pub mod ports;
pub mod profile_cache;
pub mod recipient_resolver;
pub mod session;
pub mod trace_id;
pub mod user;
pub mod user_profile_service;

pub use self::directory::{DirectoryRecord, DirectorySnapshot};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::notification::{
    Notification, NotificationEvent, NotificationKey, NotificationKind, NotificationParseError,
    NotificationRecord,
};
pub use self::notification_dispatcher::{
    DispatchOutcome, DispatchReport, FailedDelivery, NotificationDispatcher,
};
pub use self::notification_observer::{
    NotificationObserver, NotificationSubscription, SubscriptionState, parse_notifications,
};
pub use self::notification_service::NotificationService;
pub use self::order::{OrderItem, OrderSnapshot, SpecialRequestSnapshot};
pub use self::profile_cache::ProfileCache;
pub use self::recipient_resolver::RecipientResolver;
pub use self::session::UserSession;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{COOP_ROLE_PREFIX, DirectoryEntry, Role, UserId, UserValidationError};
pub use self::user_profile_service::UserProfileService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
