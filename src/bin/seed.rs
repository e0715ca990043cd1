use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use online_store_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "user@example.com", "user123", "Sample", "User").await?;
    seed_items(&pool).await?;

    println!("Seed completed. User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_items(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // Fixed ids keep re-runs idempotent; item names carry no uniqueness.
    let items = vec![
        (
            "7b7c3f9a-1f7f-4a46-9be0-1a2f6a1d0c01",
            "Wireless Mouse",
            "Low-latency 2.4GHz mouse",
            "item_images/mouse.png",
            2499_i64,
        ),
        (
            "7b7c3f9a-1f7f-4a46-9be0-1a2f6a1d0c02",
            "Mechanical Keyboard",
            "Tactile switches, PBT caps",
            "item_images/keyboard.png",
            8999,
        ),
        (
            "7b7c3f9a-1f7f-4a46-9be0-1a2f6a1d0c03",
            "USB-C Hub",
            "7-in-1 hub with HDMI",
            "item_images/hub.png",
            4599,
        ),
        (
            "7b7c3f9a-1f7f-4a46-9be0-1a2f6a1d0c04",
            "Laptop Stand",
            "Aluminium, adjustable height",
            "item_images/stand.png",
            3299,
        ),
    ];

    for (id, name, desc, image, price) in items {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, image, price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(Uuid::parse_str(id)?)
        .bind(name)
        .bind(desc)
        .bind(image)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded items");
    Ok(())
}
