use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// User id from the `{id}` path segment. Must be a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

fn parse_user_id(raw: Option<&str>) -> Result<UserId, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidUserId, "Missing user id parameter")
    })?;

    let id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidUserId, format!("Invalid user id: {raw}"))
    })?;

    if id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidUserId,
            format!("User id must be positive, got: {id}"),
        ));
    }

    Ok(UserId(id))
}

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_user_id(req.match_info().get("id")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!(parse_user_id(Some("42")).unwrap(), UserId(42));
        for bad in [None, Some("abc"), Some("0"), Some("-3"), Some("1.5")] {
            let err = parse_user_id(bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidUserId);
        }
    }
}
