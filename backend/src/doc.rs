//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (users,
//!   notifications, health) plus the notification WebSocket upgrade
//! - **Schemas**: Domain types and request/response bodies
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    DirectoryEntry, DispatchOutcome, Error, ErrorCode, FailedDelivery, NotificationKey,
    NotificationKind, NotificationRecord, OrderItem, OrderSnapshot, Role, SpecialRequestSnapshot,
    UserId,
};
use crate::inbound::http::notifications::{
    MarkAllReadResponse, PublishRequest, PublishResponse, UnreadCountResponse,
};
use crate::inbound::http::users::{LoginRequest, ProfileResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CoCo notifications API",
        description = "Notification fan-out, acknowledgement and live updates for Coop Connects.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::notifications::publish,
        crate::inbound::http::notifications::list,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::ws::ws_entry,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserId,
        Role,
        DirectoryEntry,
        OrderItem,
        OrderSnapshot,
        SpecialRequestSnapshot,
        NotificationKind,
        NotificationRecord,
        NotificationKey,
        DispatchOutcome,
        FailedDelivery,
        LoginRequest,
        ProfileResponse,
        PublishRequest,
        PublishResponse,
        UnreadCountResponse,
        MarkAllReadResponse,
    )),
    tags(
        (name = "users", description = "Session binding and profile"),
        (name = "notifications", description = "Publishing, reading and acknowledging notifications"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
