use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, RegisterRequest, TokenResponse},
        cart::{CartItemRequest, CartView},
        items::{CreateItemRequest, ItemList, UpdateItemRequest},
        orders::{CreateOrderRequest, OrderList, OrderView},
    },
    models::{Cart, Item, Order, OrderState, User},
    response::{ApiResponse, Meta},
    routes::{authorization, cart, health, items, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        authorization::register,
        authorization::login,
        authorization::logout,
        items::list_items,
        items::create_item,
        items::get_item,
        items::update_item,
        items::delete_item,
        cart::add_item,
        cart::remove_item,
        cart::get_cart,
        orders::create_order,
        orders::user_orders
    ),
    components(
        schemas(
            User,
            Item,
            Cart,
            Order,
            OrderState,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            CreateItemRequest,
            UpdateItemRequest,
            ItemList,
            CartItemRequest,
            CartView,
            CreateOrderRequest,
            OrderView,
            OrderList,
            params::Pagination,
            Meta,
            ApiResponse<Item>,
            ApiResponse<ItemList>,
            ApiResponse<TokenResponse>,
            ApiResponse<CartView>,
            ApiResponse<OrderView>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Authorization", description = "Registration, login and logout"),
        (name = "Items", description = "Catalog item endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
