//! # Cart Handler

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    api::extractors::{RequestId, ValidatedJson},
    error::Result,
    models::{CartQuote, CartQuoteRequest},
    services::AppState,
};

/// پیش‌فاکتور سبد خرید
///
/// # Endpoint
/// `POST /api/cart/quote`
///
/// # Request Body
/// ```json
/// { "items": [ { "bookId": "3", "quantity": 2 } ] }
/// ```
pub async fn quote_cart(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    ValidatedJson(request): ValidatedJson<CartQuoteRequest>,
) -> Result<Json<CartQuote>> {
    let quote = state.cart_service.quote(request).await?;

    info!(
        request_id = %request_id,
        lines = quote.lines.len(),
        unavailable = quote.unavailable.len(),
        "Cart quoted"
    );

    Ok(Json(quote))
}
