use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, issue_token, verify_password, Admin, Caller};
use crate::constants::{ERR_INVALID_EMAIL, ERR_PASSWORD_TOO_SHORT, MIN_PASSWORD_LEN};
use crate::db;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::models::{Role, User};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub accesstoken: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

/// Verify credentials and issue a signed identity token
///
/// Unknown emails and wrong passwords produce the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = User::normalize_email(&payload.email);

    let credentials = match db::users::find_credentials(&state.pool, &email).await? {
        Some(credentials) => credentials,
        None => {
            tracing::warn!("Login attempt for unregistered email");
            return Err(AppError::InvalidCredentials);
        }
    };

    let password = payload.password;
    let hash = credentials.password_hash;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;

    if !matches {
        tracing::warn!("Failed login for {}", credentials.email);
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&state.config, &credentials.email)?;
    tracing::info!("User {} logged in", credentials.email);

    Ok(Json(LoginResponse { accesstoken: token }))
}

/// Create a new identity (admin only)
pub async fn signup(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    let email = User::normalize_email(&payload.email);
    if !User::validate_email(&email) {
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(ERR_PASSWORD_TOO_SHORT.to_string()));
    }

    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = db::users::insert_user(&state.pool, &email, &password_hash, payload.role).await?;

    tracing::info!(
        "Admin {} created {:?} account {}",
        admin.email,
        user.role,
        user.email
    );

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            user,
        }),
    ))
}

/// List every identity (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Admin(_admin): Admin,
) -> Result<Json<Vec<User>>> {
    let users = db::users::list_users(&state.pool).await?;
    Ok(Json(users))
}

/// Report the caller's role
pub async fn check_role(caller: Caller) -> Json<RoleResponse> {
    Json(RoleResponse { role: caller.role })
}
