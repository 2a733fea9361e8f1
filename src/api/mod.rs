//! # لایه API
//!
//! HTTP handlers و routing
//!
//! ## مفاهیم Rust + Axum:
//! - **Router**: تعریف مسیرها
//! - **Extractors**: استخراج داده از request
//! - **State**: اشتراک state بین handlers
//! - **Tower**: زیرساخت middleware
//!
//! ## ساختار URL‌ها:
//! - `GET /api/books` - جستجو یا یک کتاب با `?id=`
//! - `GET /api/books/:id` - یک کتاب
//! - `GET /api/books/:id/recommended-categories` - دسته‌های پیشنهادی
//! - `GET /api/books/check-images` - وضعیت تصویر جلدها
//! - `GET /api/categories` - دسته‌بندی‌ها
//! - `GET /api/categories/search?q=` - جستجو بین ردیف‌ها
//! - `GET /api/categories/:name/books` - یک ردیف صفحه اصلی
//! - `GET /api/categories/:name/stats` - آمار یک ردیف
//! - `GET /api/genres` - ژانرها با تعداد
//! - `GET /api/tags` - برچسب‌ها
//! - `POST /api/cart/quote` - پیش‌فاکتور سبد خرید
//! - `GET /health` - Health check

mod extractors;
mod handlers;
mod middleware;

pub use extractors::*;
pub use handlers::*;
pub use middleware::*;

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::services::AppState;

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// state بیرون ساخته میشه تا `main` بتونه rate limiter رو دوره‌ای پاکسازی کنه.
pub fn router_with_state(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .nest("/api", api_routes(state.clone()))
        .route("/health", get(handlers::health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_id))
                .layer(axum_middleware::from_fn(security_headers))
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Route‌های API (با rate limiting)
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/books", book_routes())
        .nest("/categories", category_routes())
        .route("/genres", get(handlers::catalog::list_genres))
        .route("/tags", get(handlers::catalog::list_tags))
        .route("/cart/quote", post(handlers::cart::quote_cart))
        .route_layer(axum_middleware::from_fn_with_state(state, rate_limit))
}

fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::books::list_books))
        .route("/check-images", get(handlers::books::check_images))
        .route("/:id", get(handlers::books::get_book))
        .route(
            "/:id/recommended-categories",
            get(handlers::books::recommended_categories),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::categories::list_categories))
        .route("/search", get(handlers::categories::search_categories))
        .route("/:name/books", get(handlers::categories::category_books))
        .route("/:name/stats", get(handlers::categories::category_stats))
}
