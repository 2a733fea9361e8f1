//! مدل‌های پیش‌فاکتور سبد خرید
//!
//! خود سبد سمت کلاینت نگهداری میشه و سرور فقط قیمتش رو حساب میکنه.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// سقف تعداد یک کتاب در سبد
pub const MAX_QUANTITY: u32 = 99;

/// درخواست `POST /api/cart/quote`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartQuoteRequest {
    #[validate(length(min = 1, max = 100, message = "cart must have between 1 and 100 items"))]
    #[validate(nested)]
    pub items: Vec<CartItemRequest>,
}

/// یک ردیف سبد
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    #[validate(length(min = 1, max = 20, message = "bookId is required"))]
    pub book_id: String,

    #[validate(range(min = 1, max = 99, message = "quantity must be between 1 and 99"))]
    pub quantity: u32,
}

/// خلاصه کتاب در پیش‌فاکتور
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub price: f64,
}

/// ردیف قیمت‌گذاری شده
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub book: CartBook,
    pub quantity: u32,
    pub line_total: f64,
}

/// پیش‌فاکتور نهایی
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<CartLine>,
    pub total_quantity: u32,
    pub total_price: f64,
    pub formatted_total: String,

    /// شناسه‌هایی که پیدا نشدن یا موجود نیستن
    pub unavailable: Vec<String>,
}
