use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Reference to the stored image, not the bytes themselves.
    pub image: String,
    /// Minor units, two implied decimal places.
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub state: String,
    pub date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub country: String,
    pub address_details: String,
    pub created_at: DateTime<Utc>,
}

/// Delivery-progress state of an order. Transitions are administrative;
/// no endpoint in this crate moves an order past `Ordered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderState {
    #[serde(rename = "Ordered")]
    Ordered,
    #[serde(rename = "In delivery")]
    InDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Ordered => "Ordered",
            OrderState::InDelivery => "In delivery",
            OrderState::Delivered => "Delivered",
        }
    }
}
