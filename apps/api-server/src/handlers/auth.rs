//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use scribe_core::domain::User;
use scribe_core::ports::{PasswordService, TokenService};
use scribe_shared::ApiResponse;
use scribe_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::presenter;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_token(token_service: &Arc<dyn TokenService>, user: &User) -> AppResult<AuthResponse> {
    let access_token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            req.username
        )));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .users
        .save(User::new(req.username, req.email, password_hash))
        .await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let auth = issue_token(&token_service, &user)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(auth)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let Some(user) = state.users.find_by_username(&req.username).await? else {
        password_service.verify_decoy(&req.password);
        return Err(AppError::Unauthorized);
    };

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(username = %req.username, "Login with wrong password");
        return Err(AppError::Unauthorized);
    }

    let auth = issue_token(&token_service, &user)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.profiles.current(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(presenter::profile(&user))))
}
