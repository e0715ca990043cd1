use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    db::DbPool,
    dto::orders::{CreateOrderRequest, OrderList, OrderView},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/create_order", post(create_order))
        .route("/user_orders", get(user_orders))
}

#[utoipa::path(
    post,
    path = "/api/orders/create_order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Checkout the cart into an order", body = ApiResponse<OrderView>),
        (status = 400, description = "Validation failed, per-field error map"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderView>>)> {
    let resp = order_service::create_order(&pool, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/user_orders",
    responses(
        (status = 200, description = "Orders placed by the authenticated user", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn user_orders(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::user_orders(&pool, &user).await?;
    Ok(Json(resp))
}
