use axum::response::{IntoResponse, Response};
use common_http_errors::ApiError;
use thiserror::Error;

use crate::roles::Role;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing or malformed")]
    MalformedAuthHeader,
    /// Detail is for server logs only; every variant renders the same 401.
    #[error("token verification failed: {0}")]
    InvalidToken(String),
    #[error("role '{role}' is not permitted for this route")]
    RoleNotPermitted { role: Role, allowed: Vec<Role> },
    #[error("request reached authorization without an identity")]
    MissingIdentityContext,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("invalid token configuration: {0}")]
    Configuration(&'static str),
}

impl AuthError {
    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MalformedAuthHeader => "malformed_auth_header",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::RoleNotPermitted { .. } => "role_not_permitted",
            AuthError::MissingIdentityContext => "missing_identity_context",
            AuthError::Signing(_) => "signing",
            AuthError::Configuration(_) => "configuration",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(value.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::MalformedAuthHeader | AuthError::InvalidToken(_) => ApiError::Unauthorized,
            AuthError::RoleNotPermitted { .. } | AuthError::MissingIdentityContext => {
                ApiError::Forbidden
            }
            AuthError::Signing(_) | AuthError::Configuration(_) => ApiError::internal(value),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
