use std::collections::{BTreeMap, HashMap};

use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::orders::{CreateOrderRequest, OrderList, OrderView},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Item, Order, OrderState},
    response::{ApiResponse, Meta},
};

/// Checkout: turn the user's cart into an order.
///
/// The order insert, the cart copy and the cart deletion run in one
/// transaction, so a failure mid-way leaves neither an empty order nor a
/// stale cart behind.
pub async fn create_order(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderView>> {
    let errors = validate_shipping(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut txn = pool.begin().await?;

    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (id, user_id, state, first_name, last_name, city, country, address_details)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(OrderState::Ordered.as_str())
    .bind(payload.first_name.trim())
    .bind(payload.last_name.trim())
    .bind(payload.city.trim())
    .bind(payload.country.trim())
    .bind(payload.address_details.trim())
    .fetch_one(&mut *txn)
    .await?;

    // Copy the cart's item set into the order. A user without a cart checks
    // out an empty order; that is deliberate, not an error.
    sqlx::query(
        r#"
        INSERT INTO order_items (order_id, item_id)
        SELECT $1, ci.item_id
        FROM cart_items ci
        JOIN carts c ON c.id = ci.cart_id
        WHERE c.user_id = $2
        "#,
    )
    .bind(order.id)
    .bind(user.user_id)
    .execute(&mut *txn)
    .await?;

    sqlx::query("DELETE FROM carts WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&mut *txn)
        .await?;

    txn.commit().await?;

    tracing::info!(user_id = %user.user_id, order_id = %order.id, "order created");

    let items = load_order_items(pool, order.id).await?;
    Ok(ApiResponse::success(
        "Order created",
        order_view(order, items),
        Some(Meta::empty()),
    ))
}

pub async fn user_orders(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    #[derive(FromRow)]
    struct OrderItemRow {
        order_id: Uuid,
        #[sqlx(flatten)]
        item: Item,
    }

    let rows = sqlx::query_as::<_, OrderItemRow>(
        r#"
        SELECT oi.order_id, i.*
        FROM order_items oi
        JOIN items i ON i.id = oi.item_id
        JOIN orders o ON o.id = oi.order_id
        WHERE o.user_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<Uuid, Vec<Item>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row.item);
    }

    let items = orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            order_view(order, items)
        })
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

/// Every shipping field is mandatory; the returned map names all blank
/// fields at once, not just the first.
pub fn validate_shipping(payload: &CreateOrderRequest) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    let required = [
        ("first_name", payload.first_name.as_str(), "First name is required."),
        ("last_name", payload.last_name.as_str(), "Last name is required."),
        ("city", payload.city.as_str(), "City is required."),
        ("country", payload.country.as_str(), "Country is required."),
        (
            "address_details",
            payload.address_details.as_str(),
            "Address details are required.",
        ),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.insert(field.into(), message.into());
        }
    }
    errors
}

async fn load_order_items(pool: &DbPool, order_id: Uuid) -> AppResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT i.*
        FROM items i
        JOIN order_items oi ON oi.item_id = i.id
        WHERE oi.order_id = $1
        ORDER BY i.created_at
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

fn order_view(order: Order, items: Vec<Item>) -> OrderView {
    OrderView {
        id: order.id,
        user_id: order.user_id,
        state: order.state,
        date: order.date,
        first_name: order.first_name,
        last_name: order.last_name,
        city: order.city,
        country: order.country,
        address_details: order.address_details,
        items,
    }
}
