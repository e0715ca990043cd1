use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::items::{CreateItemRequest, ItemList, UpdateItemRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Item,
    response::ApiResponse,
    routes::params::Pagination,
    services::item_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", axum::routing::get(list_items).post(create_item))
        .route(
            "/{id}",
            axum::routing::get(get_item)
                .put(update_item)
                .delete(delete_item),
        )
}

#[utoipa::path(
    get,
    path = "/api/items",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List catalog items", body = ApiResponse<ItemList>)
    ),
    tag = "Items"
)]
pub async fn list_items(
    State(pool): State<DbPool>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ItemList>>> {
    let resp = item_service::list_items(&pool, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Get item", body = ApiResponse<Item>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(pool): State<DbPool>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let resp = item_service::get_item(&pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Create item", body = ApiResponse<Item>)
    ),
    security(("bearer_auth" = [])),
    tag = "Items"
)]
pub async fn create_item(
    State(pool): State<DbPool>,
    _user: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Item>>)> {
    let resp = item_service::create_item(&pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ApiResponse<Item>),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Items"
)]
pub async fn update_item(
    State(pool): State<DbPool>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let resp = item_service::update_item(&pool, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Deleted item"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Items"
)]
pub async fn delete_item(
    State(pool): State<DbPool>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    item_service::delete_item(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
