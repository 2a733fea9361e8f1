//! # سرویس پیش‌فاکتور سبد خرید

use std::collections::HashMap;

use tracing::{debug, instrument};
use validator::Validate;

use crate::{
    database::BookRepository,
    error::Result,
    models::{Book, CartBook, CartLine, CartQuote, CartQuoteRequest, MAX_QUANTITY},
    utils,
};

/// قیمت‌گذاری سبد خرید کلاینت
#[derive(Debug, Clone)]
pub struct CartService {
    repo: BookRepository,
}

/// ردیف‌های سبد بعد از ادغام
#[derive(Debug, Default, PartialEq, Eq)]
struct MergedItems {
    /// شناسه عددی و تعداد، به ترتیب اولین ظاهر شدن
    lines: Vec<(i64, u32)>,

    /// شناسه‌هایی که عدد نیستن
    invalid: Vec<String>,
}

/// ادغام ردیف‌های تکراری روی شناسه عددی
///
/// `"1"` و `"01"` یک کتاب حساب میشن و تعداد ادغام شده از سقف مجاز بیشتر نمیشه.
fn merge_items(request: &CartQuoteRequest) -> MergedItems {
    let mut merged = MergedItems::default();

    for item in &request.items {
        let raw = item.book_id.trim();
        let Ok(id) = raw.parse::<i64>() else {
            if !merged.invalid.iter().any(|existing| existing == raw) {
                merged.invalid.push(raw.to_string());
            }
            continue;
        };

        match merged.lines.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, quantity)) => *quantity = (*quantity + item.quantity).min(MAX_QUANTITY),
            None => merged.lines.push((id, item.quantity)),
        }
    }

    merged
}

impl CartService {
    #[must_use]
    pub fn new(repo: BookRepository) -> Self {
        Self { repo }
    }

    /// محاسبه پیش‌فاکتور
    ///
    /// کتاب ناموجود یا ناشناخته خطا نیست و فقط در `unavailable` گزارش میشه.
    ///
    /// # Errors
    /// - `Validation`: سبد خالی، بیش از حد بزرگ یا تعداد نامعتبر
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn quote(&self, request: CartQuoteRequest) -> Result<CartQuote> {
        request.validate()?;

        let items = merge_items(&request);
        let ids: Vec<i64> = items.lines.iter().map(|(id, _)| *id).collect();

        let books: HashMap<i64, Book> = self
            .repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|row| (row.id, Book::from(row)))
            .collect();

        let mut lines = Vec::with_capacity(items.lines.len());
        let mut unavailable = Vec::new();

        for (id, quantity) in items.lines {
            match books.get(&id) {
                Some(book) if book.available => lines.push(CartLine {
                    line_total: book.price * f64::from(quantity),
                    quantity,
                    book: CartBook {
                        id: book.id.clone(),
                        title: book.title.clone(),
                        author: book.author.clone(),
                        cover_image: book.cover_image.clone(),
                        price: book.price,
                    },
                }),
                _ => {
                    debug!(book_id = id, "Book unavailable for cart");
                    unavailable.push(id.to_string());
                }
            }
        }
        unavailable.extend(items.invalid);

        let total_quantity = lines.iter().map(|line| line.quantity).sum();
        let total_price: f64 = lines.iter().map(|line| line.line_total).sum();

        Ok(CartQuote {
            lines,
            total_quantity,
            total_price,
            formatted_total: utils::format_toman(total_price),
            unavailable,
        })
    }
}
