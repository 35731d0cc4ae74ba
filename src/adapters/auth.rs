//! Caller identity. Authentication itself happens upstream; the JWT
//! middleware forwards the verified user id in `x-user-id`.

use {
    super::api_errors::ApiError,
    crate::domain::error::PaymentError,
    axum::{extract::FromRequestParts, http::request::Parts},
    uuid::Uuid,
};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| PaymentError::Unauthorized("authentication required".into()))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| PaymentError::Unauthorized("malformed user identity".into()))?;

        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn extracts_user_id() {
        let id = Uuid::now_v7();
        let req = Request::builder()
            .header(USER_ID_HEADER, id.to_string())
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user, AuthUser(id));
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err.0, PaymentError::Unauthorized(_)));

        let req = Request::builder()
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        assert!(AuthUser::from_request_parts(&mut parts, &()).await.is_err());
    }
}
