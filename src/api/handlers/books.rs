//! # Book Handlers
//!
//! لیست، جستجو و جزئیات کتاب‌ها

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, OptionExt, Result},
    models::{BooksQuery, BooksResponse, CoverImagesResponse, RecommendedCategoriesResponse},
    services::AppState,
};

// =====================================
// List / Search
// =====================================
/// جستجوی کتاب‌ها یا گرفتن یک کتاب با `?id=`
///
/// # Endpoint
/// `GET /api/books?search=&genre=&category=&page=&limit=&sortBy=&order=`
///
/// # Response
/// ```json
/// {
///   "books": [...],
///   "total": 42,
///   "page": 1,
///   "limit": 12,
///   "totalPages": 4,
///   "category": null,
///   "appliedFilters": { "category": null, "genre": null, "search": "گلشیری", "sortBy": "title", "order": "asc" }
/// }
/// ```
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> Result<Response> {
    if let Some(id) = query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        let book = state
            .book_service
            .get_book_by_id(id)
            .await?
            .ok_or_else(AppError::book_not_found)?;
        return Ok(Json(book).into_response());
    }

    let params = query.to_search_params();
    let result = state.book_service.search_books(&params).await?;

    Ok(Json(BooksResponse::new(result, &params)).into_response())
}

/// یک کتاب
///
/// # Endpoint
/// `GET /api/books/:id`
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let book = state
        .book_service
        .get_book_by_id(&id)
        .await?
        .ok_or_else(AppError::book_not_found)?;

    Ok(Json(book))
}

/// دسته‌هایی که یک کتاب میتونه توشون باشه
///
/// # Endpoint
/// `GET /api/books/:id/recommended-categories`
pub async fn recommended_categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecommendedCategoriesResponse>> {
    let categories = state
        .book_service
        .get_recommended_categories(&id)
        .await?
        .ok_or_not_found("Book not found")?;

    Ok(Json(RecommendedCategoriesResponse {
        book_id: id,
        categories,
    }))
}

/// وضعیت تصویر جلد همه کتاب‌ها
///
/// # Endpoint
/// `GET /api/books/check-images`
pub async fn check_images(State(state): State<AppState>) -> Result<Json<CoverImagesResponse>> {
    let books = state.book_service.get_cover_images().await?;
    Ok(Json(CoverImagesResponse { books }))
}
