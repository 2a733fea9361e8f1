//! # قیمت‌گذاری کتاب‌ها (تومان)
//!
//! قیمت پایه از بازه مخصوص ژانر انتخاب میشه و بعد با ضریب‌هایی
//! برای ترجمه، سال انتشار، حجم، محبوبیت، امتیاز و ناشر تنظیم میشه.

use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    database::{BookPricing, BookRepository, LanguagePriceStats, PriceStats},
    error::Result,
};

/// قیمت‌ها به نزدیک‌ترین مضرب این عدد گرد میشن
pub const PRICE_STEP: f64 = 5_000.0;

/// بازه پیش‌فرض برای ژانرهای ناشناخته
pub const DEFAULT_PRICE_RANGE: (u32, u32) = (150_000, 300_000);

/// زبان کتاب‌های تالیفی
const NATIVE_LANGUAGE: &str = "فارسی";

const PREMIUM_PUBLISHERS: [&str; 4] = ["نشر ثالث", "نشر چشمه", "نشر نگاه", "انتشارات جامی"];

/// بازه قیمت پایه هر ژانر
#[must_use]
pub fn genre_price_range(genre: Option<&str>) -> (u32, u32) {
    match genre.map(str::trim) {
        Some("رمان") => (180_000, 350_000),
        Some("داستانی") => (150_000, 280_000),
        Some("رئالیسم جادویی") => (200_000, 400_000),
        Some("تمثیلی") => (160_000, 300_000),
        Some("خاطرات") => (140_000, 250_000),
        Some("سفرنامه") => (120_000, 220_000),
        Some("شعر") => (100_000, 200_000),
        Some("داستان کوتاه") => (130_000, 240_000),
        Some("خودآموز") => (80_000, 180_000),
        Some("فانتزی") => (160_000, 320_000),
        Some("داستان کودک") => (60_000, 150_000),
        _ => DEFAULT_PRICE_RANGE,
    }
}

/// ضریب نهایی قیمت برای ویژگی‌های کتاب
#[must_use]
pub fn price_multiplier(book: &BookPricing) -> f64 {
    let mut multiplier = 1.0;

    // ترجمه‌ها
    if book.original_language.as_deref() != Some(NATIVE_LANGUAGE) {
        multiplier *= 1.2;
    }

    match book.year {
        Some(year) if year >= 2020 => multiplier *= 1.15,
        Some(year) if year <= 1990 => multiplier *= 0.9,
        _ => {}
    }

    match book.pages {
        Some(pages) if pages > 500 => multiplier *= 1.2,
        Some(pages) if pages < 150 => multiplier *= 0.85,
        _ => {}
    }

    if book.is_hot {
        multiplier *= 1.1;
    }

    if book.rating.unwrap_or(0.0) >= 4.5 {
        multiplier *= 1.05;
    }

    let publisher = book.publisher.as_deref().unwrap_or_default();
    if PREMIUM_PUBLISHERS.iter().any(|p| publisher.contains(p)) {
        multiplier *= 1.1;
    }

    multiplier
}

/// گرد کردن به نزدیک‌ترین ۵٬۰۰۰ تومان
#[must_use]
pub fn round_price(price: f64) -> f64 {
    (price / PRICE_STEP).round() * PRICE_STEP
}

/// تولید قیمت واقع‌گرایانه به تومان
pub fn generate_price<R: Rng + ?Sized>(book: &BookPricing, rng: &mut R) -> f64 {
    let (min, max) = genre_price_range(book.genre.as_deref());
    let base = f64::from(rng.gen_range(min..=max));
    round_price(base * price_multiplier(book))
}

/// نتیجه قیمت‌گذاری مجدد
#[derive(Debug, Clone, Serialize)]
pub struct RepriceReport {
    pub updated: u64,
    pub stats: PriceStats,
    pub by_language: Vec<LanguagePriceStats>,
}

/// سرویس قیمت‌گذاری مجدد کل کاتالوگ
#[derive(Debug, Clone)]
pub struct PricingService {
    repo: BookRepository,
}

impl PricingService {
    #[must_use]
    pub fn new(repo: BookRepository) -> Self {
        Self { repo }
    }

    /// قیمت همه کتاب‌ها رو از نو میسازه (در یک تراکنش)
    #[instrument(skip(self, rng))]
    pub async fn reprice_all<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RepriceReport> {
        let books = self.repo.pricing_rows().await?;
        info!(count = books.len(), "Repricing catalog");

        let prices: Vec<(i64, f64)> = books
            .iter()
            .map(|book| (book.id, generate_price(book, rng)))
            .collect();

        let updated = self.repo.update_prices(&prices).await?;
        let stats = self.repo.price_stats().await?;
        let by_language = self.repo.language_price_stats().await?;

        info!(updated, "Prices updated");

        Ok(RepriceReport {
            updated,
            stats,
            by_language,
        })
    }
}
