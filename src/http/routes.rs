use axum::{routing::get, routing::post, routing::put, Router};

use crate::AppState;
use crate::http::handlers;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn users() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route("/users/signin", post(handlers::sign_in))
        .route("/users/me", get(handlers::get_current_user))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/posts/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
}

pub fn times() -> Router<AppState> {
    Router::new()
        .route("/times", get(handlers::list_times).post(handlers::create_time))
        .route("/times/elapsed", get(handlers::get_elapsed))
        .route("/times/:id", put(handlers::update_time))
}
