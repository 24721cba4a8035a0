use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::domain::{Role, Session, User};
use quill_core::ports::{BaseRepository, RateLimiter};
use quill_infra::{
    InMemoryFileStorage, InMemoryStore, JwtConfig, JwtSessionProvider, LogMailer,
};

use super::configure_routes;
use super::hooks::HOOK_SECRET_HEADER;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::{AppState, Collaborators, Repositories};

const HOOK_SECRET: &str = "hook-secret";

struct TestContext {
    state: AppState,
    store: Arc<InMemoryStore>,
    sessions: Arc<JwtSessionProvider>,
}

impl TestContext {
    fn new(rate_limiter: Option<Arc<dyn RateLimiter>>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let sessions = Arc::new(JwtSessionProvider::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        }));

        let state = AppState::from_parts(
            Repositories::in_memory(store.clone()),
            Collaborators {
                storage: Arc::new(InMemoryFileStorage::new()),
                mailer: Arc::new(LogMailer),
                sessions: sessions.clone(),
                rate_limiter,
            },
            Some(HOOK_SECRET.to_string()),
        );

        Self {
            state,
            store,
            sessions,
        }
    }

    /// Store a user and return a bearer header value for them.
    async fn login(&self, name: &str, role: Role) -> (Uuid, String) {
        let user = User::new(name.to_string(), format!("{}@example.com", name.to_lowercase()), role);
        let user = BaseRepository::<User, Uuid>::insert(self.store.as_ref(), user)
            .await
            .unwrap();

        let token = self
            .sessions
            .issue(&Session {
                user_id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                image: None,
                role,
            })
            .unwrap();

        (user.id, format!("Bearer {token}"))
    }
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.state.clone()))
                .configure(|cfg| {
                    configure_routes(cfg, RateLimitMiddleware::new($ctx.state.rate_limiter.clone()))
                }),
        )
        .await
    };
}

fn post_body(title: &str, status: &str) -> Value {
    json!({
        "title": title,
        "description": "A short summary",
        "content": "Body text for the post",
        "status": status,
        "tags": ["rust", {"label": "Web", "value": "web"}],
    })
}

#[actix_web::test]
async fn health_reports_ok() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn admin_routes_require_a_session() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);

    let req = test::TestRequest::get().uri("/api/admin/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn published_posts_appear_in_the_public_listing() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    for (title, status) in [("Hello World", "published"), ("Hidden", "draft")] {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(post_body(title, status))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/blog/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["current_page"], 1);
    assert_eq!(body["total_pages"], 1);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "hello-world");
    assert_eq!(items[0]["tags"], json!(["rust", "web"]));
    assert_eq!(items[0]["author"]["name"], "Ada");

    let req = test::TestRequest::get()
        .uri("/api/blog/tags/web/posts")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn reading_a_post_counts_a_view() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(post_body("Counted", "published"))
        .to_request();
    test::call_service(&app, req).await;

    for expected in 1..=2 {
        let req = test::TestRequest::get()
            .uri("/api/blog/posts/counted")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["views"], expected);
    }

    let req = test::TestRequest::get()
        .uri("/api/blog/posts/missing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_pages_and_posts_are_rejected() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    let req = test::TestRequest::get()
        .uri("/api/blog/posts?page=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blog/posts?page={}", u64::MAX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({
            "title": "",
            "description": "",
            "content": "",
            "status": "draft",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"].as_array().unwrap().len() >= 2);
}

#[actix_web::test]
async fn malformed_ids_get_a_problem_document() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/blog/categories/not-a-uuid/posts")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Bad Request");
}

#[actix_web::test]
async fn duplicate_slug_is_a_conflict() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    let mut statuses = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(("Authorization", auth.as_str()))
            .set_json(post_body("Twice", "draft"))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[actix_web::test]
async fn only_owners_can_edit_posts() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, owner) = ctx.login("Ada", Role::User).await;
    let (_, other) = ctx.login("Bob", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", owner.as_str()))
        .set_json(post_body("Owned", "draft"))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/admin/posts/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", other.as_str()))
        .set_json(post_body("Taken", "draft"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", owner.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn user_management_is_admin_only() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, admin) = ctx.login("Root", Role::Admin).await;
    let (user_id, user) = ctx.login("Ada", Role::User).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(("Authorization", user.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{user_id}/role"))
        .insert_header(("Authorization", admin.as_str()))
        .set_json(json!({ "role": "admin" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "ADMIN");
}

#[actix_web::test]
async fn saved_posts_round_trip_through_me() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(post_body("Bookmark", "published"))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/me/saved-posts/{post_id}"))
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/blog/posts")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["saved_post_ids"], json!([post_id]));
}

#[actix_web::test]
async fn uploads_are_recorded_and_removed() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/api/uploads")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({
            "name": "huge.png",
            "url": "https://utfs.io/f/big",
            "file_key": "big",
            "type": "image/png",
            "size": 64 * 1024 * 1024,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/uploads")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({
            "name": "cover.png",
            "url": "https://utfs.io/f/cover",
            "file_key": "cover",
            "type": "image/png",
            "size": 2048,
        }))
        .to_request();
    let upload: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/uploads/{}", upload["id"].as_str().unwrap()))
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/uploads")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn email_hook_checks_the_shared_secret() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let payload = json!({
        "to": "ada@example.com",
        "subject": "Verify your email",
        "description": "Confirm your address",
        "link": "https://blog.example.com/verify?token=abc",
    });

    let req = test::TestRequest::post()
        .uri("/api/hooks/email")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/hooks/email")
        .insert_header((HOOK_SECRET_HEADER, HOOK_SECRET))
        .set_json(&payload)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn search_requires_two_characters() {
    let ctx = TestContext::new(None);
    let app = app!(ctx);
    let (_, auth) = ctx.login("Ada", Role::User).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(post_body("Searchable Rust", "published"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/search?q=r").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["results"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/search?q=searchable")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"][0]["type"], "post");
    assert_eq!(body["results"][0]["url"], "/blog/posts/searchable-rust");
}

#[cfg(feature = "rate-limit")]
#[actix_web::test]
async fn public_routes_are_rate_limited() {
    use quill_infra::{InMemoryRateLimiter, RateLimitConfig};
    use std::time::Duration;

    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
    }));
    let ctx = TestContext::new(Some(limiter));
    let app = app!(ctx);

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/api/blog/posts").to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );

    // Health sits outside the limited scopes
    let req = test::TestRequest::get().uri("/api/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
