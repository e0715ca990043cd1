use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Item;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartItemRequest {
    pub item_id: Uuid,
}

/// Cart with its item records expanded, the shape every cart endpoint returns.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<Item>,
}
