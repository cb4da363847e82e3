use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog lists, discover and search
        .route("/movies", get(handlers::list_movies))
        // Authenticated collections
        .route("/account/watchlist", get(handlers::watchlist))
        .route("/account/rated", get(handlers::rated))
        // Poster images, keyed by the catalog's opaque poster reference
        .route("/posters/*path", get(handlers::poster))
        // Vibe recommendations
        .route("/vibes", post(handlers::recommend_vibes))
}
