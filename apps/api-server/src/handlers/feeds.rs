//! Global and category feeds.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use scribe_shared::ApiResponse;
use scribe_shared::dto::{CategoryFeedResponse, CategoryResponse, PageQuery};
use scribe_shared::validation::SLUG_REGEX;

use super::presenter;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts?page=N
pub async fn global_feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.feeds.global_feed(query.page, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::paged(
        presenter::posts(&page),
        presenter::page_meta(&page),
    )))
}

/// GET /api/categories
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<CategoryResponse> = state
        .feeds
        .published_categories()
        .await?
        .iter()
        .map(presenter::category)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// GET /api/categories/{slug}?page=N
pub async fn category_feed(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    if !SLUG_REGEX.is_match(&slug) {
        return Err(AppError::NotFound(format!("Category {slug} not found")));
    }

    let feed = state
        .feeds
        .category_feed(&slug, query.page, Utc::now())
        .await?;

    let meta = presenter::page_meta(&feed.posts);
    Ok(HttpResponse::Ok().json(ApiResponse::paged(
        CategoryFeedResponse {
            category: presenter::category(&feed.category),
            posts: presenter::posts(&feed.posts),
        },
        meta,
    )))
}
