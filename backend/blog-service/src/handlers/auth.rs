/// Authentication handlers - registration and login
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, Result};
use crate::models::PublicUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    #[schema(example = "testuser")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
    #[serde(default)]
    #[schema(example = false)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "testuser")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully!")]
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid input or username taken", body = ErrorResponse)
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user = state
        .credentials
        .register(&payload.username, &payload.password, payload.is_admin)
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully!".to_string(),
        user: user.to_public(),
    }))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user = state
        .credentials
        .verify_credentials(&payload.username, &payload.password)
        .await?;

    let token = state.tokens.issue(user.id, &user.username, user.is_admin)?;
    tracing::info!(
        user_id = user.id,
        expires_in_seconds = state.tokens.ttl().num_seconds(),
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    }))
}
