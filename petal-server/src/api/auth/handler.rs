//! Authentication Handlers
//!
//! Handles signup, login, and current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::convert::user_record_id;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name cannot be blank"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

impl UserInfo {
    fn from_user(user: &User) -> Self {
        Self {
            id: user
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// POST /api/auth/signup - 注册新用户
///
/// New accounts always get the CUSTOMER role. Admins are provisioned
/// out of band.
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AppResponse<AuthResponse>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: Some(Role::Customer),
        })
        .await?;

    let info = UserInfo::from_user(&user);
    let token = state
        .get_jwt_service()
        .generate_token(&info.id, &info.email, &info.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %info.id, email = %info.email, "User registered");

    Ok(ok(AuthResponse { token, user: info }))
}

/// POST /api/auth/login - 登录
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AppResponse<AuthResponse>>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&payload.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&payload.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %payload.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %payload.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let info = UserInfo::from_user(&user);
    let token = state
        .get_jwt_service()
        .generate_token(&info.id, &info.email, &info.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %info.id, email = %info.email, "User logged in");

    Ok(ok(AuthResponse { token, user: info }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> Result<Json<AppResponse<UserInfo>>, AppError> {
    let id = user_record_id(&current_user)?;
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;

    Ok(ok(UserInfo::from_user(&user)))
}
