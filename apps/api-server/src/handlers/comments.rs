//! Comment write routes.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use validator::Validate;

use scribe_core::DomainError;
use scribe_shared::ApiResponse;
use scribe_shared::dto::CommentRequest;

use super::{post_path, presenter, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let view = state
        .comments
        .create(path.into_inner(), identity.user_id, req.text, Utc::now())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(presenter::comment(&view))))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .ensure_author(post_id, comment_id, identity.user_id)
        .await?;
    let req = body.into_inner();
    req.validate()?;

    let view = state
        .comments
        .update(post_id, comment_id, identity.user_id, req.text)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(presenter::comment(&view))))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
///
/// Redirects to the post whether or not the caller wrote the comment.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    match state
        .comments
        .delete(post_id, comment_id, identity.user_id)
        .await
    {
        Ok(()) | Err(DomainError::OwnershipDenied { .. }) => Ok(see_other(post_path(post_id))),
        Err(e) => Err(e.into()),
    }
}
