use std::collections::BTreeMap;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::dto::auth::{Claims, LoginRequest, RegisterRequest, TokenResponse};
use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
};

const ACCESS_TOKEN_HOURS: i64 = 1;
const REFRESH_TOKEN_HOURS: i64 = 24 * 7;

pub async fn register_user(
    pool: &DbPool,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let RegisterRequest {
        email,
        password,
        first_name,
        last_name,
    } = payload;

    let mut errors = validate_registration(&email, &password, &first_name, &last_name);

    if errors.get("email").is_none() {
        let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(pool)
            .await?;
        if exist.is_some() {
            errors.append(&mut duplicate_email_error());
        }
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let inserted: Result<User, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(first_name.trim())
    .bind(last_name.trim())
    .fetch_one(pool)
    .await;

    // A concurrent registration can slip past the lookup above; the unique
    // index on email settles it, so the loser gets the same field error.
    let user = match inserted {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err))
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            return Err(AppError::Validation(duplicate_email_error()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "user registered");

    let tokens = issue_token_pair(&user)?;
    Ok(ApiResponse::success("User created", tokens, None))
}

pub async fn login_user(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid credentials".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    tracing::info!(user_id = %user.id, "user logged in");

    let tokens = issue_token_pair(&user)?;
    Ok(ApiResponse::success("Logged in", tokens, Some(Meta::empty())))
}

/// Tokens are stateless JWTs, so logout has nothing to revoke; the endpoint
/// acknowledges the request so clients can drop their copies.
pub fn logout_user(user: &AuthUser) -> ApiResponse<serde_json::Value> {
    tracing::info!(user_id = %user.user_id, "user logged out");
    ApiResponse::success("Logged out", serde_json::json!({}), Some(Meta::empty()))
}

fn duplicate_email_error() -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    errors.insert(
        "email".into(),
        "A user with that email already exists.".into(),
    );
    errors
}

pub fn validate_registration(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    if email.trim().is_empty() {
        errors.insert("email".into(), "Email is required.".into());
    } else if !email.contains('@') {
        errors.insert("email".into(), "Enter a valid email address.".into());
    }
    if password.is_empty() {
        errors.insert("password".into(), "Password is required.".into());
    }
    if first_name.trim().is_empty() {
        errors.insert("first_name".into(), "First name is required.".into());
    }
    if last_name.trim().is_empty() {
        errors.insert("last_name".into(), "Last name is required.".into());
    }
    errors
}

fn issue_token_pair(user: &User) -> AppResult<TokenResponse> {
    let access = issue_token(user, "access", ACCESS_TOKEN_HOURS)?;
    let refresh = issue_token(user, "refresh", REFRESH_TOKEN_HOURS)?;
    Ok(TokenResponse {
        access,
        refresh,
        email: user.email.clone(),
    })
}

fn issue_token(user: &User, token_type: &str, hours: i64) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        token_type: token_type.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}
