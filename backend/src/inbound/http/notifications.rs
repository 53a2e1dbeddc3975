//! Notification API handlers.
//!
//! ```text
//! POST /api/v1/notifications {"message":"...","type":"ORDER_PLACED","details":{...}}
//! GET  /api/v1/notifications
//! GET  /api/v1/notifications/unread-count
//! POST /api/v1/notifications/read {"timestamp":1714000000000,"sender":"Cara Dela"}
//! POST /api/v1/notifications/read-all
//! ```
//!
//! Every route acts as the session user: published notifications carry the
//! user's full name as sender, and reads or acknowledgements only ever touch
//! the user's own list.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::PublishNotificationRequest;
use crate::domain::{
    DispatchOutcome, DispatchReport, Error, FailedDelivery, Notification, NotificationEvent,
    NotificationKey, NotificationKind, NotificationRecord, UserId, UserSession,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/notifications`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Payload matching `type`: a directory entry for `NOTICE`, an order for
    /// `ORDER_PLACED`/`ORDER_UPDATED`, a special request for
    /// `SPECIAL_REQUEST_UPDATED`.
    #[schema(value_type = Object)]
    pub details: Value,
}

/// Fan-out result returned by `POST /api/v1/notifications`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub outcome: DispatchOutcome,
    pub delivered: Vec<UserId>,
    /// Emails of recipients that had no directory key.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl From<DispatchReport> for PublishResponse {
    fn from(report: DispatchReport) -> Self {
        Self {
            outcome: report.outcome(),
            delivered: report.delivered,
            skipped: report.skipped,
            failed: report.failed,
        }
    }
}

/// Unread counter payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread: usize,
}

/// Bulk acknowledgement payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

/// Publish a notification for a domain event.
///
/// Responds `200` when every recipient received it and `207` when some
/// recipients were skipped or their write failed.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Delivered to every recipient", body = PublishResponse),
        (status = 207, description = "Delivered to some or none of the recipients", body = PublishResponse),
        (status = 400, description = "Details do not match type", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Directory unavailable", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "publishNotification"
)]
#[post("/notifications")]
pub async fn publish(
    state: web::Data<HttpState>,
    user: UserSession,
    payload: web::Json<PublishRequest>,
) -> ApiResult<HttpResponse> {
    let PublishRequest {
        message,
        kind,
        details,
    } = payload.into_inner();
    let event = NotificationEvent::from_parts(kind, details)?;
    let sender = state.profile.profile(user.user_id()).await?.full_name();

    let report = state
        .notifications
        .publish(PublishNotificationRequest {
            sender,
            message,
            event,
        })
        .await?;

    let status = if report.all_succeeded() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok(HttpResponse::build(status).json(PublishResponse::from(report)))
}

/// The session user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications", body = [NotificationRecord]),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list(
    state: web::Data<HttpState>,
    user: UserSession,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let notifications = state.notifications_query.list(&user).await?;
    Ok(web::Json(notifications))
}

/// Number of unread notifications of the session user.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotificationCount"
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    user: UserSession,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let unread = state.notifications_query.unread_count(&user).await?;
    Ok(web::Json(UnreadCountResponse { unread }))
}

/// Mark one of the session user's notifications as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read",
    request_body = NotificationKey,
    responses(
        (status = 204, description = "Marked as read"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such notification", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    user: UserSession,
    payload: web::Json<NotificationKey>,
) -> ApiResult<HttpResponse> {
    state
        .notifications
        .mark_as_read(&user, &payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark every notification of the session user as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Number of notifications changed", body = MarkAllReadResponse),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    user: UserSession,
) -> ApiResult<web::Json<MarkAllReadResponse>> {
    let updated = state.notifications.mark_all_as_read(&user).await?;
    Ok(web::Json(MarkAllReadResponse { updated }))
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
