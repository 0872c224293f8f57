use common_auth::AuthError;
use common_http_errors::{messages, ApiError};
use thiserror::Error;

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid identifier '{0}'")]
    InvalidId(String),
    #[error("record not found")]
    NotFound,
    #[error("email already exists")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Token(#[from] AuthError),
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::NotFound,
            // users.email is the only unique key a request can collide with.
            StoreError::UniqueViolation(_) => Self::EmailTaken,
            other => Self::Store(other),
        }
    }
}

impl From<argon2::password_hash::Error> for ServiceError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Hashing(value.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(message) => ApiError::BadRequest {
                message: Some(message),
            },
            ServiceError::InvalidId(_) => ApiError::bad_request(),
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::EmailTaken => ApiError::Conflict {
                code: "email_exists",
                message: messages::EMAIL_ALREADY_EXISTS,
            },
            ServiceError::InvalidCredentials => ApiError::InvalidCredentials,
            err @ (ServiceError::Hashing(_) | ServiceError::Token(_) | ServiceError::Store(_)) => {
                ApiError::internal(err)
            }
        }
    }
}
