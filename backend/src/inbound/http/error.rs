//! HTTP rendering of domain errors.
//!
//! Status codes follow [`ErrorCode`]. Internal failures are logged in full
//! and reach clients as a generic message that keeps only the trace id;
//! unavailable backing services keep their message so clients can show it.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, NotificationParseError, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The error as clients may see it.
fn client_view(err: &Error) -> Error {
    if err.code() != ErrorCode::InternalError {
        return err.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match err.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

fn log_server_side(err: &Error) {
    match err.code() {
        ErrorCode::InternalError => error!(
            trace_id = err.trace_id().unwrap_or("-"),
            detail = err.message(),
            "request failed"
        ),
        ErrorCode::ServiceUnavailable => warn!(
            trace_id = err.trace_id().unwrap_or("-"),
            detail = err.message(),
            "backing service unavailable"
        ),
        _ => {}
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_server_side(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}

/// Publish payloads whose `details` do not fit their `type`.
impl From<NotificationParseError> for Error {
    fn from(err: NotificationParseError) -> Self {
        Self::invalid_request(err.to_string())
            .with_details(json!({ "field": "details", "code": "details_mismatch" }))
    }
}

/// Framework failures while extracting request state, such as an unreadable
/// session cookie.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "request extraction failed");
        Self::internal(REDACTED_MESSAGE)
    }
}
