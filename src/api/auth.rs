//! Staff authentication endpoints and the authorization middleware chain.
//!
//! Every gated route runs `authenticate` first: it requires a
//! `Bearer <token>` Authorization header, verifies the token and binds an
//! [`AuthPrincipal`] into request extensions. Admin routes additionally
//! run `authorize_admin`, which re-loads the staff record and checks the
//! role; the profile route runs `reject_test_principal` so the shared
//! demo account stays read-only. Failures are terminal - no stage
//! retries, and nothing downstream executes.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::{validate_email, validate_name, validate_password};
use crate::crypto::{hash_password, issue_token, verify_password, verify_token};
use crate::db::{LoginRequest, LoginResponse, StaffRole, User, UserResponse};
use crate::AppState;

/// The principal resolved by `authenticate`, bound into request
/// extensions for downstream middleware and handlers.
#[derive(Debug, Clone)]
pub struct AuthPrincipal {
    pub id: String,
    pub is_test: bool,
}

/// Extract the token from a `Bearer <token>` Authorization header.
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware. Resolves the token to a principal id
/// before any handler logic runs.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Authentication invalid"))?;

    let principal_id = verify_token(token, &state.config.auth.token_secret)?;

    let is_test = principal_id == state.config.auth.test_principal_id;
    request
        .extensions_mut()
        .insert(AuthPrincipal {
            id: principal_id,
            is_test,
        });

    Ok(next.run(request).await)
}

/// Admin gate. Re-loads the staff record so a role change takes effect
/// on the next request, not on token expiry.
pub async fn authorize_admin(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<AuthPrincipal>()
        .ok_or_else(|| ApiError::unauthorized("Authentication invalid"))?;

    let user = User::find_by_id(&state.db, &principal.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Authentication invalid"))?;

    if !user.staff_role().is_admin() {
        tracing::warn!(user_id = %user.id, role = %user.role, "Admin resource access denied");
        return Err(ApiError::unauthorized("Authentication invalid"));
    }

    Ok(next.run(request).await)
}

/// Refuse profile mutations from the shared demo account. It can still
/// authenticate and read.
pub async fn reject_test_principal(
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<AuthPrincipal>()
        .ok_or_else(|| ApiError::unauthorized("Authentication invalid"))?;

    if principal.is_test {
        return Err(ApiError::forbidden("Demo account is read-only"));
    }

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: String,
}

/// Register a staff account. The first account ever created becomes
/// super-admin; everyone after starts as a plain user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    validate_name(&request.name).map_err(ApiError::validation)?;
    validate_email(&request.email).map_err(ApiError::validation)?;
    validate_password(&request.password).map_err(ApiError::validation)?;

    if User::find_by_email(&state.db, &request.email).await?.is_some() {
        return Err(ApiError::bad_request("Email is already registered"));
    }

    let role = if User::count_all(&state.db).await? == 0 {
        StaffRole::SuperAdmin
    } else {
        StaffRole::User
    };

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: request.name.trim().to_string(),
        email: request.email,
        password_hash,
        address: request.address,
        role: role.to_string(),
        created_at: String::new(),
        updated_at: String::new(),
    };
    user.insert(&state.db).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Staff account registered");

    let token = issue_token(
        &user.id,
        &state.config.auth.token_secret,
        state.config.auth.token_lifetime_hours,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// Staff login with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    let user = User::find_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid Credentials"))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Password is incorrect"));
    }

    let token = issue_token(
        &user.id,
        &state.config.auth.token_secret,
        state.config.auth.token_lifetime_hours,
    )?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(user),
        token,
    }))
}

#[derive(Debug, Serialize)]
pub struct LoginCheckResponse {
    pub login: bool,
}

/// Token probe; reaching the handler means `authenticate` passed.
pub async fn login_check() -> Json<LoginCheckResponse> {
    Json(LoginCheckResponse { login: true })
}

#[derive(Debug, Serialize)]
pub struct AdminCheckResponse {
    pub admin: bool,
}

/// Role probe; reaching the handler means the admin gate passed.
pub async fn admin_check() -> Json<AdminCheckResponse> {
    Json(AdminCheckResponse { admin: true })
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub current_user: UserResponse,
}

/// Current account, without hash or timestamps.
pub async fn secret(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, &principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(CurrentUserResponse {
        current_user: UserResponse::from(user),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// Partial profile update. The password is re-hashed only when supplied.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(name) = &request.name {
        validate_name(name).map_err(ApiError::validation)?;
    }
    if let Some(password) = &request.password {
        validate_password(password).map_err(ApiError::validation)?;
    }

    let mut user = User::find_by_id(&state.db, &principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(name) = request.name {
        user.name = name.trim().to_string();
    }
    if let Some(address) = request.address {
        user.address = address;
    }
    if let Some(password) = request.password {
        user.password_hash = hash_password(&password)
            .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;
    }

    user.save(&state.db).await?;

    Ok(Json(UserResponse::from(user)))
}

/// All staff accounts, hash and timestamps excluded.
pub async fn get_all_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub email: String,
    pub set_role: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRoleResponse {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Admin-only role mutation, addressed by target email.
pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UpdateRoleResponse>, ApiError> {
    let role = StaffRole::from_str(&request.set_role)
        .map_err(|_| ApiError::bad_request("Invalid role"))?;

    let mut user = User::find_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::bad_request("User not found"))?;

    user.role = role.to_string();
    user.save(&state.db).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Staff role updated");

    Ok(Json(UpdateRoleResponse {
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}
