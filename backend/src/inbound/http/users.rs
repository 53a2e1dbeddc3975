//! Session binding and profile handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"cara@coco.ph"}
//! GET /api/v1/me
//! ```
//!
//! Credentials are checked by the external identity provider before the
//! client reaches this API; login only binds the directory user registered
//! under the email to the cookie session.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{DirectoryEntry, Error, UserId, UserSession};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "cara@coco.ph")]
    pub email: String,
}

/// Directory profile of the session user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub full_name: String,
    pub profile: DirectoryEntry,
}

impl ProfileResponse {
    fn new(id: UserId, profile: DirectoryEntry) -> Self {
        Self {
            id,
            full_name: profile.full_name(),
            profile,
        }
    }
}

/// Bind the directory user registered under `email` to the session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session bound", body = ProfileResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No directory user with that email", body = Error),
        (status = 503, description = "Directory unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let email = payload.into_inner().email;
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })));
    }
    let record = state.profile.find_by_email(email).await?;
    let user = session.bind(&record.id)?;
    info!(user_id = %user.user_id(), "session bound");
    Ok(web::Json(ProfileResponse::new(record.id, record.entry)))
}

/// Profile of the session user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "User left the directory", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    user: UserSession,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state.profile.profile(user.user_id()).await?;
    Ok(web::Json(ProfileResponse::new(user.user_id().clone(), profile)))
}
