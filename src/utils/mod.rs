//! # ماژول توابع کمکی (Utilities)
//!
//! ## مفاهیم Rust:
//! - **once_cell**: مقداردهی اولیه تنبل برای Regex
//! - **url crate**: parse امن آدرس‌ها
//! - **chrono**: سال جاری

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::models::CoverStatus;

// =====================================
// Constants
// =====================================
/// جداکننده هزارگان فارسی
pub const PERSIAN_THOUSANDS_SEPARATOR: char = '٬';

/// واحد پول
pub const CURRENCY: &str = "تومان";

/// سرویس‌های تصویر جایگزین
const PLACEHOLDER_HOSTS: [&str; 4] = [
    "placehold.co",
    "via.placeholder.com",
    "placeholder.com",
    "dummyimage.com",
];

// =====================================
// Lazy Statics (Regex patterns)
// =====================================
/// فاصله‌های پشت سر هم
pub static MULTI_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

/// ISBN-10 یا ISBN-13 با یا بدون خط تیره
pub static VALID_ISBN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(97[89])?-?\d{1,5}-?\d{1,7}-?\d{1,7}-?[\dXx]$").expect("Invalid regex pattern")
});

// =====================================
// Text
// =====================================
/// حذف فاصله‌های اضافه از عبارت جستجو
///
/// # مثال
/// ```rust
/// use ketabkhaneh::utils::normalize_query;
///
/// assert_eq!(normalize_query("  صد   سال  تنهایی "), "صد سال تنهایی");
/// ```
#[must_use]
pub fn normalize_query(query: &str) -> String {
    MULTI_WHITESPACE.replace_all(query.trim(), " ").into_owned()
}

/// بررسی فرمت ISBN
#[must_use]
pub fn is_valid_isbn(isbn: &str) -> bool {
    let digits = isbn.chars().filter(|c| c.is_ascii_alphanumeric()).count();
    VALID_ISBN.is_match(isbn) && (digits == 10 || digits == 13)
}

/// تبدیل ارقام لاتین به فارسی
#[must_use]
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32('۰' as u32 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// عدد صحیح با جداکننده هزارگان و ارقام فارسی
///
/// # مثال
/// ```rust
/// use ketabkhaneh::utils::format_persian_number;
///
/// assert_eq!(format_persian_number(1_250_000), "۱٬۲۵۰٬۰۰۰");
/// ```
#[must_use]
pub fn format_persian_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(PERSIAN_THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }

    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{}", to_persian_digits(&grouped))
}

/// قیمت به تومان، مثلا `۱۵۰٬۰۰۰ تومان`
#[must_use]
pub fn format_toman(price: f64) -> String {
    format!("{} {CURRENCY}", format_persian_number(price.round() as i64))
}

// =====================================
// Cover images
// =====================================
/// دسته‌بندی آدرس تصویر جلد
#[must_use]
pub fn classify_cover(cover: &str) -> CoverStatus {
    let cover = cover.trim();
    if cover.is_empty() {
        return CoverStatus::Missing;
    }

    if cover.starts_with('/') && !cover.starts_with("//") {
        return CoverStatus::Local;
    }

    match Url::parse(cover) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let host = url.host_str().unwrap_or_default();
            let is_placeholder = PLACEHOLDER_HOSTS
                .iter()
                .any(|p| host == *p || host.ends_with(&format!(".{p}")));
            if is_placeholder {
                CoverStatus::Placeholder
            } else {
                CoverStatus::Remote
            }
        }
        _ => CoverStatus::Missing,
    }
}

// =====================================
// Dates
// =====================================
/// سال جاری میلادی
#[must_use]
pub fn current_year() -> i64 {
    i64::from(chrono::Utc::now().year())
}
