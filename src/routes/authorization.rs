use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    db::DbPool,
    dto::auth::{LoginRequest, RegisterRequest, TokenResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::auth_service::{login_user, logout_user, register_user},
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/authorization/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Validation failed, per-field error map")
    ),
    tag = "Authorization"
)]
pub async fn register(
    State(pool): State<DbPool>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TokenResponse>>)> {
    let resp = register_user(&pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/authorization/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authorization"
)]
pub async fn login(
    State(pool): State<DbPool>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = login_user(&pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/authorization/logout",
    responses(
        (status = 200, description = "Logout user", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Authorization"
)]
pub async fn logout(user: AuthUser) -> Json<ApiResponse<serde_json::Value>> {
    Json(logout_user(&user))
}
