//! Cookie-session binding between Actix and the domain's [`UserSession`].
//!
//! `POST /login` binds a directory key to the cookie through
//! [`SessionContext::bind`]. Routes acting as the user take [`UserSession`]
//! as an extractor and answer `401` when the cookie carries no valid key.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId, UserSession};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Cookie session of the current request.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind `user_id` to the cookie, replacing whoever was bound before.
    pub fn bind(&self, user_id: &UserId) -> Result<UserSession, Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        Ok(UserSession::new(user_id.clone()))
    }

    /// The bound user, if the cookie carries a valid directory key.
    pub fn current(&self) -> Result<Option<UserSession>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(user_id) => Ok(Some(UserSession::new(user_id))),
            Err(error) => {
                warn!(error = %error, "ignoring session bound to an invalid directory key");
                Ok(None)
            }
        }
    }

    /// The bound user or `401 Unauthorized`.
    pub fn require_session(&self) -> Result<UserSession, Error> {
        self.current()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

impl FromRequest for UserSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move { fut.await.map_err(Error::from)?.require_session() })
    }
}
