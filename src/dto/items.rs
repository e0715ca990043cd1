use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Item;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<i64>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemList {
    #[schema(value_type = Vec<Item>)]
    pub items: Vec<Item>,
}
