use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod routes;

pub use error::AppError;
pub use auth::AuthUser;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::users())
        .merge(routes::posts())
        .merge(routes::times())
        .with_state(state)
}

/// Restricts CORS to the frontend origin when one is configured, otherwise allows any.
pub fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer> {
    let Some(origin) = frontend_url else {
        return Ok(CorsLayer::permissive());
    };

    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}
