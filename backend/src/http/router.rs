//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Aggregation views
        .route("/sites", get(handlers::list_sites))
        .route("/block-types", get(handlers::list_block_types))
        .route("/block-types/{block_type}/stats", get(handlers::get_block_type_stats))
        .route("/block-types/{block_type}/detail", get(handlers::get_block_type_detail))
        .route("/overview", get(handlers::get_overview))
        .route("/site-comparison", get(handlers::get_site_comparison))
        .route("/site-stats", get(handlers::get_site_stats))
        .route("/samples/random", get(handlers::get_random_sample))
        // Explainer proxy
        .route("/explain", post(handlers::explain))
        // Playground sessions
        .route("/playground", post(handlers::create_session))
        .route(
            "/playground/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/playground/{id}/tree", get(handlers::get_tree))
        .route(
            "/playground/{id}/templates",
            get(handlers::list_templates).post(handlers::add_custom_template),
        )
        .route("/playground/{id}/blocks", post(handlers::add_block))
        .route("/playground/{id}/blocks/{block_id}", patch(handlers::edit_block))
        .route("/playground/{id}/reorder", post(handlers::reorder))
        .route("/playground/{id}/branches", post(handlers::branch))
        .route(
            "/playground/{id}/branches/{parent_id}/{block_id}",
            delete(handlers::remove_from_branch),
        )
        .route("/playground/{id}/main/{block_id}", delete(handlers::remove_from_main))
        .route("/playground/{id}/activate", post(handlers::activate))
        .route("/playground/{id}/highlight", post(handlers::highlight))
        .route("/playground/{id}/blend", post(handlers::blend))
        .route("/playground/{id}/generate", post(handlers::generate))
        .route("/playground/{id}/history", get(handlers::get_history))
        .route("/playground/{id}/history/compare", get(handlers::compare_history))
        .route("/playground/{id}/export", get(handlers::export));

    Router::new()
        .route("/health", get(handlers::health_check))
        // Path used by the single-page client
        .route("/api/explain", post(handlers::explain))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
