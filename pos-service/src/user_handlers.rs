use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::SecurityContext;
use common_http_errors::{messages, ApiResponse, ApiResult};
use tracing::info;

use crate::dto::{CashierRequest, LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::error::ServiceError;
use crate::extract::json_body;
use crate::pagination::{PageQuery, PageRequest, Paginated};
use crate::user_service::UserService;
use crate::AppState;

pub async fn register(
    State(users): State<UserService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let request = json_body(payload)?;
    let user = users.register(request).await?;
    Ok(ApiResponse::created(
        messages::SUCCESS_REGISTER,
        UserResponse::from(user),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(err) => {
            state.record_login_metric("bad_request");
            return Err(err);
        }
    };

    match state.users.login(request).await {
        Ok(token) => {
            state.record_login_metric("success");
            Ok(ApiResponse::ok(messages::SUCCESS_LOGIN, LoginResponse { token }))
        }
        Err(err) => {
            let outcome = match err {
                ServiceError::InvalidCredentials => "invalid_credentials",
                _ => "error",
            };
            state.record_login_metric(outcome);
            Err(err.into())
        }
    }
}

/// Tokens are stateless; logout only acknowledges the caller.
pub async fn logout(ctx: SecurityContext) -> ApiResponse<()> {
    info!(user_id = %ctx.subject_id, role = %ctx.role, "logout");
    ApiResponse::message(StatusCode::OK, messages::SUCCESS_LOGOUT)
}

pub async fn create_cashier(
    State(users): State<UserService>,
    payload: Result<Json<CashierRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let request = json_body(payload)?;
    let user = users.create_cashier(request).await?;
    Ok(ApiResponse::created(
        messages::SUCCESS_CREATE,
        UserResponse::from(user),
    ))
}

pub async fn list_cashiers(
    State(users): State<UserService>,
    Query(query): Query<PageQuery>,
) -> ApiResult<ApiResponse<Paginated<UserResponse>>> {
    let page = users.list_cashiers(PageRequest::from(query)).await?;
    Ok(ApiResponse::ok(
        messages::SUCCESS_RETRIEVE,
        page.map(UserResponse::from),
    ))
}

pub async fn get_cashier(
    State(users): State<UserService>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let user = users.get_cashier(&id).await?;
    Ok(ApiResponse::ok(
        messages::SUCCESS_RETRIEVE,
        UserResponse::from(user),
    ))
}

pub async fn update_cashier(
    State(users): State<UserService>,
    Path(id): Path<String>,
    payload: Result<Json<CashierRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let request = json_body(payload)?;
    let user = users.update_cashier(&id, request).await?;
    Ok(ApiResponse::ok(
        messages::SUCCESS_UPDATE,
        UserResponse::from(user),
    ))
}

pub async fn delete_cashier(
    State(users): State<UserService>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    users.delete_cashier(&id).await?;
    Ok(ApiResponse::message(StatusCode::OK, messages::SUCCESS_DELETE))
}
