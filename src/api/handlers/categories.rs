//! # Category Handlers
//!
//! دسته‌بندی‌ها و ردیف‌های صفحه اصلی

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::extractors::ValidatedQuery,
    error::Result,
    models::{
        BookCategory, CategoriesResponse, CategoryMatches, CategoryRowQuery, CategoryRowResponse,
        CategorySearchQuery, CategoryStats,
    },
    services::AppState,
};

/// همه دسته‌بندی‌ها
///
/// # Endpoint
/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let categories = state.book_service.get_categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// ردیف یک دسته با قواعد مرتب‌سازی همون دسته
///
/// نام ناشناخته 404 برمیگردونه.
///
/// # Endpoint
/// `GET /api/categories/:name/books?limit=10`
pub async fn category_books(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ValidatedQuery(query): ValidatedQuery<CategoryRowQuery>,
) -> Result<Json<CategoryRowResponse>> {
    let category: BookCategory = name.parse()?;
    let row = state.book_service.get_category_row(category, query.limit).await?;
    Ok(Json(row))
}

/// آمار یک دسته
///
/// # Endpoint
/// `GET /api/categories/:name/stats`
pub async fn category_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CategoryStats>> {
    let category: BookCategory = name.parse()?;
    let stats = state.book_service.get_category_stats(category).await?;
    Ok(Json(stats))
}

/// جستجوی متنی بین ردیف‌ها
///
/// # Endpoint
/// `GET /api/categories/search?q=`
pub async fn search_categories(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<CategorySearchQuery>,
) -> Result<Json<Vec<CategoryMatches>>> {
    let results = state.book_service.search_in_categories(query.q.trim()).await?;
    Ok(Json(results))
}
