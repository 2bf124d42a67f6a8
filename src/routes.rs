// region:    --- Imports
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// endregion: --- Imports

/// 요청 바디 최대 크기 (1MB)
const BODY_LIMIT: usize = 1024 * 1024;

/// 라우터 설정
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/api/auth/register", post(handlers::handle_register))
        .route("/api/auth/login", post(handlers::handle_login))
        .route(
            "/api/products",
            get(handlers::handle_get_products).post(handlers::handle_create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::handle_get_product)
                .put(handlers::handle_update_product)
                .delete(handlers::handle_delete_product),
        )
        .route("/api/products/:id/bids", post(handlers::handle_place_bid))
        .route("/api/bids/:id", delete(handlers::handle_delete_bid))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
