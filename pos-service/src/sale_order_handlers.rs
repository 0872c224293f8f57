use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::SecurityContext;
use common_http_errors::{messages, ApiResponse, ApiResult};

use crate::dto::{SaleOrderRequest, SaleOrderResponse};
use crate::extract::json_body;
use crate::pagination::{PageQuery, PageRequest, Paginated};
use crate::sale_order_service::SaleOrderService;

pub async fn create_sale_order(
    State(orders): State<SaleOrderService>,
    ctx: SecurityContext,
    payload: Result<Json<SaleOrderRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<SaleOrderResponse>> {
    let request = json_body(payload)?;
    let order = orders.create(ctx.subject_id, request).await?;
    Ok(ApiResponse::created(
        messages::SUCCESS_CREATE,
        SaleOrderResponse::from(order),
    ))
}

pub async fn list_sale_orders(
    State(orders): State<SaleOrderService>,
    Query(query): Query<PageQuery>,
) -> ApiResult<ApiResponse<Paginated<SaleOrderResponse>>> {
    let page = orders.list(PageRequest::from(query)).await?;
    Ok(ApiResponse::ok(
        messages::SUCCESS_RETRIEVE,
        page.map(SaleOrderResponse::from),
    ))
}

pub async fn get_sale_order(
    State(orders): State<SaleOrderService>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<SaleOrderResponse>> {
    let order = orders.get(&id).await?;
    Ok(ApiResponse::ok(
        messages::SUCCESS_RETRIEVE,
        SaleOrderResponse::from(order),
    ))
}

pub async fn update_sale_order(
    State(orders): State<SaleOrderService>,
    Path(id): Path<String>,
    payload: Result<Json<SaleOrderRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<SaleOrderResponse>> {
    let request = json_body(payload)?;
    let order = orders.update(&id, request).await?;
    Ok(ApiResponse::ok(
        messages::SUCCESS_UPDATE,
        SaleOrderResponse::from(order),
    ))
}

pub async fn delete_sale_order(
    State(orders): State<SaleOrderService>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    orders.delete(&id).await?;
    Ok(ApiResponse::message(StatusCode::OK, messages::SUCCESS_DELETE))
}
