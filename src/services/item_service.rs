use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::items::{CreateItemRequest, ItemList, UpdateItemRequest},
    error::{AppError, AppResult},
    models::Item,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

pub async fn list_items(pool: &DbPool, pagination: Pagination) -> AppResult<ApiResponse<ItemList>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Item>(
        "SELECT * FROM items ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM items")
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = ItemList { items };
    Ok(ApiResponse::success("Items", data, Some(meta)))
}

pub async fn get_item(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<Item>> {
    let result = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let result = match result {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Item", result, None))
}

pub async fn create_item(
    pool: &DbPool,
    payload: CreateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    let id = Uuid::new_v4();
    let item = sqlx::query_as::<_, Item>(
        "INSERT INTO items (id, name, description, image, price) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image)
    .bind(payload.price)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Item created", item, Some(Meta::empty())))
}

pub async fn update_item(
    pool: &DbPool,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    let existing = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    let description = payload.description.unwrap_or(existing.description);
    let image = payload.image.unwrap_or(existing.image);
    let price = payload.price.unwrap_or(existing.price);

    let item = sqlx::query_as::<_, Item>(
        r#"
        UPDATE items
        SET name = $2, description = $3, image = $4, price = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(image)
    .bind(price)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Updated", item, Some(Meta::empty())))
}

pub async fn delete_item(pool: &DbPool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}
