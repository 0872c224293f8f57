use axum::extract::rejection::JsonRejection;
use axum::Json;
use common_http_errors::ApiError;
use tracing::debug;

/// Unwraps a JSON body, turning axum's rejection into the enveloped 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "rejected request body");
            Err(ApiError::bad_request())
        }
    }
}
