use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Item;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub country: String,
    pub address_details: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub state: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub country: String,
    pub address_details: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<OrderView>)]
    pub items: Vec<OrderView>,
}
