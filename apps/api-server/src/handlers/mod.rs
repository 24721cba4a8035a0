//! HTTP handlers and route configuration.

mod blog;
mod categories;
mod health;
mod hooks;
mod posts;
mod search;
mod uploads;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimitMiddleware) {
    // Malformed bodies, query strings and path segments get problem documents too
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/blog")
                    .wrap(rate_limit.clone())
                    .route("/posts", web::get().to(blog::list_posts))
                    .route("/posts/{slug}", web::get().to(blog::get_post))
                    .route(
                        "/categories/{id}/posts",
                        web::get().to(blog::list_category_posts),
                    )
                    .route("/tags/{tag}/posts", web::get().to(blog::list_tag_posts)),
            )
            .service(
                web::scope("/search")
                    .wrap(rate_limit)
                    .route("", web::get().to(search::search)),
            )
            // Author routes
            .service(
                web::scope("/admin")
                    .route("/dashboard", web::get().to(posts::dashboard))
                    .route("/posts", web::get().to(posts::list_mine))
                    .route("/posts", web::post().to(posts::create))
                    .route("/posts/recent", web::get().to(posts::recent))
                    .route("/posts/{id}", web::get().to(posts::get))
                    .route("/posts/{id}", web::put().to(posts::update))
                    .route("/posts/{id}", web::delete().to(posts::delete))
                    .route("/categories", web::get().to(categories::list))
                    .route("/categories", web::post().to(categories::create))
                    .route("/categories/{id}", web::put().to(categories::update))
                    .route("/categories/{id}", web::delete().to(categories::delete))
                    .route("/users", web::get().to(users::list))
                    .route("/users/{id}/role", web::put().to(users::set_role)),
            )
            .service(
                web::scope("/me")
                    .route("", web::get().to(users::me))
                    .route("/saved-posts/{post_id}", web::put().to(users::save_post))
                    .route("/saved-posts/{post_id}", web::delete().to(users::unsave_post)),
            )
            .service(
                web::scope("/uploads")
                    .route("", web::get().to(uploads::list))
                    .route("", web::post().to(uploads::record))
                    .route("/{id}", web::delete().to(uploads::delete)),
            )
            .route("/hooks/email", web::post().to(hooks::send_email)),
    );
}
