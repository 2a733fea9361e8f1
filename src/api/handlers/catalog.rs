//! ژانرها و برچسب‌ها

use axum::{extract::State, Json};

use crate::{
    error::Result,
    models::{GenresResponse, TagsResponse},
    services::AppState,
};

/// `GET /api/genres`
pub async fn list_genres(State(state): State<AppState>) -> Result<Json<GenresResponse>> {
    let genres = state.book_service.get_genres().await?;
    Ok(Json(GenresResponse { genres }))
}

/// `GET /api/tags`
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsResponse>> {
    let tags = state.book_service.get_tags().await?;
    Ok(Json(TagsResponse { tags }))
}
