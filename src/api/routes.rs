use super::{AppState, estimate_fees_with_actions, estimate_sourcing_routes, health};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates the API router, optionally nested under `route_prefix`.
pub fn create_router(state: Arc<AppState>, route_prefix: Option<&str>) -> Router {
    let routes = Router::new()
        .route("/estimate-sourcing-routes/{chain_id}/{token}", get(estimate_sourcing_routes))
        .route("/estimate-fees-with-actions", post(estimate_fees_with_actions))
        .route("/health", get(health));

    let prefix = route_prefix.map(|prefix| prefix.trim_matches('/')).filter(|p| !p.is_empty());
    let router = match prefix {
        Some(prefix) => Router::new().nest(&format!("/{prefix}"), routes),
        None => routes,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
