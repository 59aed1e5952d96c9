//! Profile pages and self-service profile edits.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use validator::Validate;

use scribe_core::domain::ProfileChanges;
use scribe_shared::ApiResponse;
use scribe_shared::dto::{PageQuery, ProfileFeedResponse, UpdateProfileRequest};

use super::presenter;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=N
pub async fn author_feed(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state
        .feeds
        .author_feed(&path.into_inner(), viewer.user_id(), query.page, Utc::now())
        .await?;

    let meta = presenter::page_meta(&feed.posts);
    Ok(HttpResponse::Ok().json(ApiResponse::paged(
        ProfileFeedResponse {
            profile: presenter::profile(&feed.profile),
            posts: presenter::posts(&feed.posts),
        },
        meta,
    )))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let user = state
        .profiles
        .update_profile(
            identity.user_id,
            ProfileChanges {
                first_name: req.first_name,
                last_name: req.last_name,
                username: req.username,
                email: req.email,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        presenter::profile(&user),
        "Profile updated",
    )))
}
