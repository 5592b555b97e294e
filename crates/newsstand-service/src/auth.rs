//! Boundary to the identity collaborator.
//!
//! Authentication lives in front of this service; the only thing consumed
//! here is "current user identity or absent", carried on the `x-user-id`
//! header by the fronting identity layer.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::ApiError;

pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    /// Writes require an authenticated identity; reads degrade instead.
    pub fn require(self) -> Result<String, ApiError> {
        self.0.ok_or(ApiError::Unauthorized)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(CurrentUser(user))
    }
}
