//! Bearer token authentication for protected routes.
//!
//! Reads the `Authorization` header, decodes the token and stores the
//! resulting [`AuthenticatedIdentity`] in request extensions. Requests without
//! a valid token are answered with 401 here; the wrapped handler never runs.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::AuthenticatedIdentity;
use crate::auth::jwt::{decode, TokenError};
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

const BEARER: &str = "bearer";

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No header, an unreadable header, or an empty token
    MissingToken,
    InvalidToken(TokenError),
}

impl Rejection {
    fn reason(&self) -> &'static str {
        match self {
            Rejection::MissingToken => "missing_token",
            Rejection::InvalidToken(e) => e.reason(),
        }
    }
}

/// Pull the token out of an `Authorization` value.
///
/// Accepts `Bearer <token>` (scheme case-insensitive) and a bare token with no
/// scheme. The bare form is not RFC 6750; the web client's role check sends
/// `GET /users/token` with the raw token as the whole header value.
fn bearer_token(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER) => rest.trim(),
        Some(_) => return None,
        None if value.eq_ignore_ascii_case(BEARER) => "",
        None => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Authenticate a request from its headers alone.
pub fn authenticate(
    headers: &HeaderMap,
    security_config: &SecurityConfig,
) -> Result<AuthenticatedIdentity, Rejection> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(Rejection::MissingToken)?;

    let claims = decode(token, security_config).map_err(Rejection::InvalidToken)?;
    Ok(AuthenticatedIdentity::from(&claims))
}

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::internal("AppState not available to authenticator");
                let resp = req.into_response(err.error_response());
                return Ok(resp.map_into_right_body());
            };

            match authenticate(req.headers(), &app_state.security) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(rejection) => {
                    security::token_rejected(rejection.reason(), req.path());
                    let resp = req.into_response(AppError::unauthorized().error_response());
                    Ok(resp.map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use actix_web::http::header::HeaderValue;

    use super::*;
    use crate::auth::jwt::mint_access_token;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token(""), None);
        assert_eq!(bearer_token("Basic dXNyOnB3ZA=="), None);
    }

    #[test]
    fn no_header_is_missing_token() {
        let security = SecurityConfig::for_tests();
        assert_eq!(
            authenticate(&HeaderMap::new(), &security),
            Err(Rejection::MissingToken)
        );
        assert_eq!(
            authenticate(&headers_with("Bearer "), &security),
            Err(Rejection::MissingToken)
        );
    }

    #[test]
    fn valid_token_yields_identity() {
        let security = SecurityConfig::for_tests();
        let token = mint_access_token(12, true, SystemTime::now(), &security).unwrap();

        let identity = authenticate(&headers_with(&format!("Bearer {token}")), &security).unwrap();
        assert_eq!(
            identity,
            AuthenticatedIdentity {
                subject_id: 12,
                is_privileged: true
            }
        );
    }

    #[test]
    fn codec_failures_are_invalid_token() {
        let security = SecurityConfig::for_tests();
        let stale = mint_access_token(
            1,
            false,
            SystemTime::now() - Duration::from_secs(3 * 60 * 60),
            &security,
        )
        .unwrap();

        assert_eq!(
            authenticate(&headers_with(&format!("Bearer {stale}")), &security),
            Err(Rejection::InvalidToken(TokenError::Expired))
        );
        assert_eq!(
            authenticate(&headers_with("Bearer not-a-token"), &security),
            Err(Rejection::InvalidToken(TokenError::Malformed))
        );
    }
}
