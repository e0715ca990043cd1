use std::collections::HashSet;

use axum::extract::FromRequestParts;
use chrono::Utc;
use online_store_api::{
    db::{DbPool, create_pool},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        items::CreateItemRequest,
        orders::CreateOrderRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{auth_service, cart_service, item_service, order_service},
};
use uuid::Uuid;

// Integration flow: register -> add to cart -> checkout -> order history.
#[tokio::test]
async fn register_cart_checkout_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    if std::env::var("JWT_SECRET").is_err() {
        unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };
    }

    let pool = setup_pool(&database_url).await?;

    // Registration issues tokens; registering the same email again must fail
    // with a field-level error on email.
    let tokens = auth_service::register_user(&pool, register_payload("alice@example.com")).await?;
    assert_eq!(tokens.data.unwrap().email, "alice@example.com");

    let duplicate = auth_service::register_user(&pool, register_payload("alice@example.com")).await;
    match duplicate {
        Err(AppError::Validation(fields)) => {
            assert!(fields.contains_key("email"), "expected an email field error")
        }
        other => panic!("expected validation error on duplicate email, got {other:?}"),
    }

    auth_service::register_user(&pool, register_payload("bob@example.com")).await?;

    // Two registrations racing for the same email: exactly one wins, the
    // loser gets the same email field error as a sequential duplicate.
    let (first, second) = tokio::join!(
        auth_service::register_user(&pool, register_payload("carol@example.com")),
        auth_service::register_user(&pool, register_payload("carol@example.com")),
    );
    let (winners, losers): (Vec<_>, Vec<_>) =
        [first, second].into_iter().partition(|r| r.is_ok());
    assert_eq!(winners.len(), 1);
    match losers.into_iter().next().unwrap() {
        Err(AppError::Validation(fields)) => {
            assert!(fields.contains_key("email"), "expected an email field error")
        }
        other => panic!("expected validation error on duplicate email, got {other:?}"),
    }

    let alice = auth_user(&pool, "alice@example.com").await?;
    let bob = auth_user(&pool, "bob@example.com").await?;

    // Login round trip: wrong password is Unauthorized; the issued access
    // token authenticates through the extractor, the refresh token does not.
    let bad_login = auth_service::login_user(
        &pool,
        LoginRequest {
            email: "bob@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await;
    assert!(matches!(bad_login, Err(AppError::Unauthorized(_))));

    let tokens = auth_service::login_user(
        &pool,
        LoginRequest {
            email: "bob@example.com".into(),
            password: "secret123".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let authed = extract_user(&tokens.access).await?;
    assert_eq!(authed.user_id, bob.user_id);
    assert_eq!(authed.email, "bob@example.com");

    let refused = extract_user(&tokens.refresh).await;
    assert!(matches!(refused, Err(AppError::Unauthorized(_))));

    // Seed two catalog items.
    let item_a = item_service::create_item(&pool, item_payload("Widget A"))
        .await?
        .data
        .unwrap();
    let item_b = item_service::create_item(&pool, item_payload("Widget B"))
        .await?
        .data
        .unwrap();

    // Item names carry no uniqueness; a second entry with the same name is
    // a distinct catalog record, not an error.
    let same_name = item_service::create_item(&pool, item_payload("Widget A"))
        .await?
        .data
        .unwrap();
    assert_ne!(same_name.id, item_a.id);

    // Adding the same item twice keeps the cart a set.
    cart_service::add_item(&pool, &alice, item_a.id).await?;
    let cart = cart_service::add_item(&pool, &alice, item_a.id)
        .await?
        .data
        .unwrap();
    assert_eq!(cart.items.len(), 1);

    let cart = cart_service::add_item(&pool, &alice, item_b.id)
        .await?
        .data
        .unwrap();
    assert_eq!(cart.items.len(), 2);

    // Adding an unknown item is NotFound.
    let missing = cart_service::add_item(&pool, &alice, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Removing a non-member is a no-op, not an error.
    let cart = cart_service::remove_item(&pool, &alice, Uuid::new_v4())
        .await?
        .data
        .unwrap();
    assert_eq!(cart.items.len(), 2);

    // A blank shipping field rejects the checkout and leaves the cart alone.
    let mut bad = shipping_payload();
    bad.city = String::new();
    match order_service::create_order(&pool, &alice, bad).await {
        Err(AppError::Validation(fields)) => assert!(fields.contains_key("city")),
        other => panic!("expected validation error, got {other:?}"),
    }
    let cart = cart_service::get_cart(&pool, &alice).await?.data.unwrap();
    assert_eq!(cart.items.len(), 2);

    // Successful checkout copies exactly the cart's items and clears the cart.
    let order = order_service::create_order(&pool, &alice, shipping_payload())
        .await?
        .data
        .unwrap();
    assert_eq!(order.state, "Ordered");
    assert_eq!(order.date, Utc::now().date_naive());
    let ordered: HashSet<Uuid> = order.items.iter().map(|i| i.id).collect();
    assert_eq!(ordered, HashSet::from([item_a.id, item_b.id]));

    let cart = cart_service::get_cart(&pool, &alice).await?.data.unwrap();
    assert!(cart.items.is_empty());

    // A user who never touched a cart can still check out: empty item set.
    let empty_order = order_service::create_order(&pool, &bob, shipping_payload())
        .await?
        .data
        .unwrap();
    assert!(empty_order.items.is_empty());

    // Order history is per user, and the unpaginated listing carries no
    // page meta.
    let alice_resp = order_service::user_orders(&pool, &alice).await?;
    let meta = alice_resp.meta.as_ref().unwrap();
    assert!(meta.page.is_none());
    assert!(meta.per_page.is_none());
    let alice_orders = alice_resp.data.unwrap();
    assert_eq!(alice_orders.items.len(), 1);
    assert_eq!(alice_orders.items[0].id, order.id);

    let bob_orders = order_service::user_orders(&pool, &bob).await?.data.unwrap();
    assert_eq!(bob_orders.items.len(), 1);
    assert_eq!(bob_orders.items[0].id, empty_order.id);

    Ok(())
}

async fn setup_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Clean tables between runs
    sqlx::query("TRUNCATE TABLE order_items, orders, cart_items, carts, items, users CASCADE")
        .execute(&pool)
        .await?;

    Ok(pool)
}

async fn extract_user(token: &str) -> Result<AuthUser, AppError> {
    let (mut parts, _) = axum::http::Request::builder()
        .uri("/")
        .header("Authorization", format!("Bearer {token}"))
        .body(())
        .unwrap()
        .into_parts();
    AuthUser::from_request_parts(&mut parts, &()).await
}

async fn auth_user(pool: &DbPool, email: &str) -> anyhow::Result<AuthUser> {
    let (user_id,): (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(AuthUser {
        user_id,
        email: email.to_string(),
    })
}

fn register_payload(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "secret123".into(),
        first_name: "Test".into(),
        last_name: "User".into(),
    }
}

fn item_payload(name: &str) -> CreateItemRequest {
    CreateItemRequest {
        name: name.to_string(),
        description: "A product for testing".into(),
        image: "item_images/test.png".into(),
        price: 1999,
    }
}

fn shipping_payload() -> CreateOrderRequest {
    CreateOrderRequest {
        first_name: "Alice".into(),
        last_name: "Smith".into(),
        city: "Lisbon".into(),
        country: "Portugal".into(),
        address_details: "Rua Augusta 100".into(),
    }
}
