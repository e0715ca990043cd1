use axum::Router;

use crate::db::DbPool;

pub mod authorization;
pub mod cart;
pub mod doc;
pub mod health;
pub mod items;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<DbPool> {
    Router::new()
        .nest("/authorization", authorization::router())
        .nest("/items", items::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
}
