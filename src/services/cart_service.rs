use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::cart::CartView,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, Item},
    response::ApiResponse,
};

/// Find the user's cart or persist an empty one. Carts are created lazily on
/// first access and deleted again by checkout.
pub async fn get_or_create_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Cart> {
    if let Some(cart) = find_cart(pool, user_id).await? {
        return Ok(cart);
    }

    // Two concurrent first accesses can both miss the lookup; the unique
    // constraint on user_id makes the second insert a no-op, so re-fetch.
    let inserted: Option<Cart> = sqlx::query_as(
        "INSERT INTO carts (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(cart) => Ok(cart),
        None => find_cart(pool, user_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("cart vanished during creation"))),
    }
}

pub async fn add_item(
    pool: &DbPool,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let item_exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM items WHERE id = $1")
        .bind(item_id)
        .fetch_optional(pool)
        .await?;
    if item_exist.is_none() {
        return Err(AppError::NotFound);
    }

    let cart = get_or_create_cart(pool, user.user_id).await?;

    // The composite primary key keeps the cart a set: adding twice is a no-op.
    sqlx::query("INSERT INTO cart_items (cart_id, item_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(cart.id)
        .bind(item_id)
        .execute(pool)
        .await?;

    let view = load_cart_view(pool, cart).await?;
    Ok(ApiResponse::success("OK", view, None))
}

pub async fn remove_item(
    pool: &DbPool,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let cart = get_or_create_cart(pool, user.user_id).await?;

    // Removing an id that is not a member succeeds and changes nothing.
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND item_id = $2")
        .bind(cart.id)
        .bind(item_id)
        .execute(pool)
        .await?;

    let view = load_cart_view(pool, cart).await?;
    Ok(ApiResponse::success("OK", view, None))
}

pub async fn get_cart(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = get_or_create_cart(pool, user.user_id).await?;
    let view = load_cart_view(pool, cart).await?;
    Ok(ApiResponse::success("OK", view, None))
}

async fn find_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(cart)
}

async fn load_cart_view(pool: &DbPool, cart: Cart) -> AppResult<CartView> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT i.*
        FROM items i
        JOIN cart_items ci ON ci.item_id = i.id
        WHERE ci.cart_id = $1
        ORDER BY i.created_at
        "#,
    )
    .bind(cart.id)
    .fetch_all(pool)
    .await?;

    Ok(CartView {
        id: cart.id,
        user_id: cart.user_id,
        items,
    })
}
