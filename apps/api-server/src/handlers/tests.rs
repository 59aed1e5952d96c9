//! HTTP-level tests over the in-memory store.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use scribe_core::domain::{Category, PostDraft, User};
use scribe_core::ports::{BaseRepository, PasswordService, TokenService};
use scribe_infra::{Argon2PasswordService, InMemoryBlogStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::middleware::error::{json_config, not_found, path_config, query_config};
use crate::state::AppState;

struct Ctx {
    store: Arc<InMemoryBlogStore>,
    state: AppState,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
    news: Category,
}

impl Ctx {
    async fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let news = store
            .insert_category(Category {
                id: 0,
                title: "News".to_string(),
                description: "Latest".to_string(),
                slug: "news".to_string(),
                is_published: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        Self {
            state: AppState::in_memory(store.clone()),
            store,
            tokens: Arc::new(JwtTokenService::new(JwtConfig {
                secret: "handler-tests".to_string(),
                ..JwtConfig::default()
            })),
            passwords: Arc::new(Argon2PasswordService::new()),
            news,
        }
    }

    async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .store
            .save(User::new(
                username.to_string(),
                format!("{username}@example.com"),
                "unused".to_string(),
            ))
            .await
            .unwrap();
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn post(&self, author: &User, pub_date: Option<chrono::DateTime<Utc>>, published: bool) -> i64 {
        self.state
            .posts
            .create(
                author.id,
                PostDraft {
                    title: "Hello".to_string(),
                    text: "First post".to_string(),
                    pub_date,
                    category_id: self.news.id,
                    location_id: None,
                    image: None,
                    is_published: published,
                },
                Utc::now(),
            )
            .await
            .unwrap()
            .post
            .id
    }
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.state.clone()))
                .app_data(web::Data::new($ctx.tokens.clone()))
                .app_data(web::Data::new($ctx.passwords.clone()))
                .app_data(json_config())
                .app_data(query_config())
                .app_data(path_config())
                .configure(configure_routes)
                .default_service(web::to(not_found)),
        )
        .await
    };
}

fn post_body(category_id: i64) -> Value {
    json!({
        "title": "Edited",
        "text": "New text",
        "category_id": category_id,
    })
}

#[actix_rt::test]
async fn health_reports_storage() {
    let ctx = Ctx::new().await;
    let app = app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn unknown_route_is_problem_json_404() {
    let ctx = Ctx::new().await;
    let app = app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_rt::test]
async fn hidden_post_detail_is_404_for_others_but_visible_to_author() {
    let ctx = Ctx::new().await;
    let (leo, leo_auth) = ctx.user("leo").await;
    let (_, ana_auth) = ctx.user("ana").await;
    let post_id = ctx
        .post(&leo, Some(Utc::now() + TimeDelta::days(1)), true)
        .await;
    let app = app!(ctx);
    let uri = format!("/api/posts/{post_id}");

    let anonymous = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(anonymous.status(), StatusCode::NOT_FOUND);

    let other = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, ana_auth))
            .to_request(),
    )
    .await;
    assert_eq!(other.status(), StatusCode::NOT_FOUND);

    let missing =
        test::call_service(&app, test::TestRequest::get().uri("/api/posts/9999").to_request()).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let author = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, leo_auth))
            .to_request(),
    )
    .await;
    assert_eq!(author.status(), StatusCode::OK);
    let body: Value = test::read_body_json(author).await;
    assert_eq!(body["data"]["id"], post_id);
}

#[actix_rt::test]
async fn non_owner_update_redirects_to_detail() {
    let ctx = Ctx::new().await;
    let (leo, _) = ctx.user("leo").await;
    let (_, mallory_auth) = ctx.user("mallory").await;
    let post_id = ctx.post(&leo, None, true).await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, mallory_auth.clone()))
            .set_json(post_body(ctx.news.id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/api/posts/{post_id}").as_str()
    );

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, mallory_auth))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let detail = ctx.state.feeds.post_detail(post_id, None, Utc::now()).await.unwrap();
    assert_eq!(detail.post.post.title, "Hello");
}

#[actix_rt::test]
async fn owner_delete_redirects_to_profile() {
    let ctx = Ctx::new().await;
    let (leo, leo_auth) = ctx.user("leo").await;
    let post_id = ctx.post(&leo, None, true).await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, leo_auth))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/api/profile/leo");
}

#[actix_rt::test]
async fn create_post_returns_location_and_clamps_date() {
    let ctx = Ctx::new().await;
    let (_, leo_auth) = ctx.user("leo").await;
    let app = app!(ctx);
    let before = Utc::now();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, leo_auth))
            .set_json(json!({
                "title": "Backdated",
                "text": "Body",
                "category_id": ctx.news.id,
                "pub_date": "2001-01-01T00:00:00Z",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().get(header::LOCATION).is_some());

    let body: Value = test::read_body_json(resp).await;
    let pub_date: chrono::DateTime<Utc> =
        serde_json::from_value(body["data"]["pub_date"].clone()).unwrap();
    assert!(pub_date >= before);
}

#[actix_rt::test]
async fn mutation_without_token_is_401() {
    let ctx = Ctx::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body(ctx.news.id))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn overlong_comment_is_422() {
    let ctx = Ctx::new().await;
    let (leo, leo_auth) = ctx.user("leo").await;
    let post_id = ctx.post(&leo, None, true).await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .insert_header((header::AUTHORIZATION, leo_auth))
            .set_json(json!({ "text": "x".repeat(151) }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[actix_rt::test]
async fn comment_delete_redirects_for_owner_and_stranger() {
    let ctx = Ctx::new().await;
    let (leo, _) = ctx.user("leo").await;
    let (ana, ana_auth) = ctx.user("ana").await;
    let (_, mallory_auth) = ctx.user("mallory").await;
    let post_id = ctx.post(&leo, None, true).await;
    let comment = ctx
        .state
        .comments
        .create(post_id, ana.id, "Nice".to_string(), Utc::now())
        .await
        .unwrap();
    let app = app!(ctx);
    let uri = format!("/api/posts/{post_id}/comments/{}", comment.comment.id);
    let detail = format!("/api/posts/{post_id}");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, mallory_auth))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), detail.as_str());
    let still_there = ctx.state.feeds.post_detail(post_id, None, Utc::now()).await.unwrap();
    assert_eq!(still_there.comments.len(), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, ana_auth))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let gone = ctx.state.feeds.post_detail(post_id, None, Utc::now()).await.unwrap();
    assert!(gone.comments.is_empty());
}

#[actix_rt::test]
async fn stranger_comment_edit_redirects_even_with_invalid_text() {
    let ctx = Ctx::new().await;
    let (leo, leo_auth) = ctx.user("leo").await;
    let (ana, ana_auth) = ctx.user("ana").await;
    let post_id = ctx.post(&leo, None, true).await;
    let comment = ctx
        .state
        .comments
        .create(post_id, ana.id, "Nice".to_string(), Utc::now())
        .await
        .unwrap();
    let app = app!(ctx);
    let uri = format!("/api/posts/{post_id}/comments/{}", comment.comment.id);
    let detail = format!("/api/posts/{post_id}");

    for text in ["Edited".to_string(), "x".repeat(151)] {
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header((header::AUTHORIZATION, leo_auth.clone()))
                .set_json(json!({ "text": text }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), detail.as_str());
    }
    let unchanged = ctx.state.feeds.post_detail(post_id, None, Utc::now()).await.unwrap();
    assert_eq!(unchanged.comments[0].comment.text, "Nice");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, ana_auth))
            .set_json(json!({ "text": "x".repeat(151) }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn stranger_post_edit_with_invalid_body_redirects() {
    let ctx = Ctx::new().await;
    let (leo, _) = ctx.user("leo").await;
    let (_, mallory_auth) = ctx.user("mallory").await;
    let post_id = ctx.post(&leo, None, true).await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header((header::AUTHORIZATION, mallory_auth))
            .set_json(json!({
                "title": "",
                "text": "",
                "category_id": ctx.news.id,
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/api/posts/{post_id}").as_str()
    );
}

#[actix_rt::test]
async fn feed_pagination_errors() {
    let ctx = Ctx::new().await;
    let app = app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meta"]["page"], 1);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/posts?page=2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/posts?page=abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn unpublished_category_feed_is_404() {
    let ctx = Ctx::new().await;
    ctx.store
        .insert_category(Category {
            id: 0,
            title: "Drafts".to_string(),
            description: String::new(),
            slug: "drafts".to_string(),
            is_published: false,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let app = app!(ctx);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/categories/drafts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/categories/news").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/categories").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn profile_feed_shows_scheduled_posts_to_author_only() {
    let ctx = Ctx::new().await;
    let (leo, leo_auth) = ctx.user("leo").await;
    ctx.post(&leo, Some(Utc::now() + TimeDelta::days(1)), true).await;
    let app = app!(ctx);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/profile/leo").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["posts"].as_array().map(Vec::len), Some(0));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/profile/leo")
            .insert_header((header::AUTHORIZATION, leo_auth))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["posts"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn register_login_and_me() {
    let ctx = Ctx::new().await;
    let app = app!(ctx);
    let credentials = json!({
        "username": "writer",
        "email": "writer@example.com",
        "password": "correct-horse",
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "writer", "password": "wrong-password" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "writer", "password": "correct-horse" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "writer");
}

#[actix_rt::test]
async fn malformed_json_is_400() {
    let ctx = Ctx::new().await;
    let (_, leo_auth) = ctx.user("leo").await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, leo_auth))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
