use axum::{routing::get, Router};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // ORDER RECORD ROUTES
        // ========================================
        .route(
            "/api/order",
            get(handlers::order::get_order)
                .post(handlers::order::save_order)
                .delete(handlers::order::reset_order),
        )
}
