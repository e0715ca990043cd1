use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    db::DbPool,
    dto::cart::{CartItemRequest, CartView},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/add_item", post(add_item))
        .route("/remove_item", post(remove_item))
        .route("/get_cart", get(get_cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/add_item",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Add item to cart", body = ApiResponse<CartView>),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_item(&pool, &user, payload.item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove_item",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Remove item from cart", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&pool, &user, payload.item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cart/get_cart",
    responses(
        (status = 200, description = "Current cart for the authenticated user", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&pool, &user).await?;
    Ok(Json(resp))
}
