use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Serialize;

use crate::auth::claims::AuthenticatedIdentity;
use crate::error::AppError;

/// The authenticated caller, as attached by the `JwtExtract` middleware.
///
/// Taken from the token alone; no database round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    #[serde(rename = "user_id")]
    pub id: i64,
    #[serde(rename = "admin")]
    pub is_admin: bool,
}

impl CurrentUser {
    pub fn identity(&self) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            subject_id: self.id,
            is_privileged: self.is_admin,
        }
    }
}

impl From<AuthenticatedIdentity> for CurrentUser {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            id: identity.subject_id,
            is_admin: identity.is_privileged,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Absent when the route is not wrapped by JwtExtract
        let identity = req.extensions().get::<AuthenticatedIdentity>().copied();
        ready(
            identity
                .map(CurrentUser::from)
                .ok_or_else(AppError::unauthorized),
        )
    }
}
