//! Post detail and the author-only write routes.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;
use validator::Validate;

use scribe_shared::ApiResponse;
use scribe_shared::dto::{PostDetailResponse, PostRequest};

use super::{post_path, presenter, profile_path, see_other};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let view = state
        .posts
        .create(identity.user_id, presenter::post_draft(req), Utc::now())
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, post_path(view.post.id)))
        .json(ApiResponse::ok(presenter::post(&view))))
}

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let detail = state
        .feeds
        .post_detail(path.into_inner(), viewer.user_id(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: presenter::post(&detail.post),
        comments: detail.comments.iter().map(presenter::comment).collect(),
    })))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.posts.ensure_author(post_id, identity.user_id).await?;
    let req = body.into_inner();
    req.validate()?;

    let view = state
        .posts
        .update(
            post_id,
            identity.user_id,
            presenter::post_draft(req),
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(presenter::post(&view))))
}

/// DELETE /api/posts/{post_id} - redirects to the author's feed.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let username = state
        .posts
        .delete(path.into_inner(), identity.user_id)
        .await?;

    Ok(see_other(profile_path(&username)))
}
