//! JSON envelope shared by every POS endpoint.
//!
//! Success and error responses both serialize as
//! `{ "code": <status>, "status": "success" | "error", "message": .., "data": .. }`.
//! Errors additionally carry a stable `X-Error-Code` header.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub mod messages;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";
pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub code: u16,
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Successful response wrapped in the envelope.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: &'static str,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message,
            data: Some(data),
        }
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            code: self.status.as_u16(),
            status: STATUS_SUCCESS,
            message: self.message.to_string(),
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: Option<String> },
    Unauthorized,
    Forbidden,
    InvalidCredentials,
    NotFound,
    Conflict { code: &'static str, message: &'static str },
    Internal,
}

impl ApiError {
    /// Logs the underlying cause and returns an opaque 500.
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        tracing::error!(error = %err, "{}", messages::INTERNAL_SERVER_ERROR);
        Self::Internal
    }

    pub fn bad_request() -> Self {
        Self::BadRequest { message: None }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::NotFound => "not_found",
            ApiError::Conflict { code, .. } => *code,
            ApiError::Internal => "internal_error",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest { message } => message
                .clone()
                .unwrap_or_else(|| messages::BAD_REQUEST.to_string()),
            ApiError::Unauthorized => messages::UNAUTHORIZED.to_string(),
            ApiError::Forbidden => messages::FORBIDDEN.to_string(),
            ApiError::InvalidCredentials => messages::INVALID_CREDENTIALS.to_string(),
            ApiError::NotFound => messages::NOT_FOUND.to_string(),
            ApiError::Conflict { message, .. } => message.to_string(),
            ApiError::Internal => messages::INTERNAL_SERVER_ERROR.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.error_code();
        let body: Envelope<()> = Envelope {
            code: status.as_u16(),
            status: STATUS_ERROR,
            message: self.message(),
            data: None,
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
