//! API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, SharedState};

/// Create API routes
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Commitment endpoints
        .route("/api/commitment/create", post(handlers::create_commitment))
        .route("/api/commitment/verify", post(handlers::verify_commitment))
        .route("/api/salt/generate", post(handlers::generate_salt))
        // Reveal proofs
        .route("/api/prove/reveal", post(handlers::prove_reveal))
        .route("/api/verify/reveal", post(handlers::verify_reveal))
}

/// Full application with CORS and request tracing
pub fn app(state: SharedState) -> Router {
    Router::new()
        .merge(api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
