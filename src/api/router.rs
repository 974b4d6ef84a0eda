//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! CORS is permissive: any origin, method and header.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the router with all endpoints.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::health::check))
        .route("/check", post(endpoints::check::check))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
