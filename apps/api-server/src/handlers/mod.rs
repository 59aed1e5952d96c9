//! HTTP handlers and route configuration.
//!
//! Handlers read the clock once per request and hand `now` to the services.

mod auth;
mod comments;
mod feeds;
mod health;
mod posts;
mod presenter;
mod profiles;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, http::header, web};

/// Detail page of a post; the target of every ownership redirect.
pub fn post_path(post_id: i64) -> String {
    format!("/api/posts/{post_id}")
}

/// Author feed of a user.
pub fn profile_path(username: &str) -> String {
    format!("/api/profile/{username}")
}

pub(crate) fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(feeds::global_feed))
                    .route("", web::post().to(posts::create))
                    .route("/{post_id}", web::get().to(posts::detail))
                    .route("/{post_id}", web::put().to(posts::update))
                    .route("/{post_id}", web::delete().to(posts::delete))
                    .route("/{post_id}/comments", web::post().to(comments::create))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(feeds::categories))
                    .route("/{slug}", web::get().to(feeds::category_feed)),
            )
            .service(
                web::scope("/profile")
                    .route("", web::put().to(profiles::update))
                    .route("/{username}", web::get().to(profiles::author_feed)),
            ),
    );
}
