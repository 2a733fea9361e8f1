//! # مدل کتاب
//!
//! ردیف دیتابیس، DTO خروجی API و دسته‌بندی‌های ردیف‌های صفحه اصلی

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// جداکننده `GROUP_CONCAT` در کوئری‌ها (`char(31)`)
///
/// نام برچسب یا جایزه میتونه کاما داشته باشه، ولی این کاراکتر کنترلی رو نه.
pub const CONCAT_SEPARATOR: char = '\u{1f}';

// =====================================
// Book Row
// =====================================
/// ردیف جدول `books` به همراه دسته‌بندی‌ها، برچسب‌ها و جوایز
///
/// سه ستون آخر از `GROUP_CONCAT` میان و اگه کتاب چیزی نداشته باشه `NULL` هستن.
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: Option<i64>,
    pub genre: Option<String>,
    pub original_language: Option<String>,
    pub translator: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i64>,
    pub isbn: Option<String>,
    pub price: Option<f64>,
    pub cover_image: Option<String>,
    pub available: bool,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub popularity: Option<i64>,
    pub sales_rank: Option<i64>,
    pub is_hot: bool,
    pub is_new: bool,
    pub created_at: String,
    pub updated_at: String,
    pub categories: Option<String>,
    pub tags: Option<String>,
    pub awards: Option<String>,
}

/// شکستن خروجی `GROUP_CONCAT`
///
/// ترتیب `GROUP_CONCAT` تضمین نشده، پس خروجی مرتب میشه.
fn split_concat(value: Option<&str>) -> Vec<String> {
    let mut items: Vec<String> = value
        .map(|v| {
            v.split(CONCAT_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();
    items.sort();
    items.dedup();
    items
}

// =====================================
// Book DTO
// =====================================
/// کتاب همونطور که API برمیگردونه
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_image: String,
    pub price: f64,
    pub description: String,
    pub genre: String,
    pub available: bool,
    pub rating: f64,
    pub review_count: i64,
    pub categories: Vec<BookCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
    pub popularity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_rank: Option<i64>,
    pub is_hot: bool,
    pub is_new: bool,
    pub tags: Vec<String>,
    pub awards: Vec<String>,
    pub data_ai_hint: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        // فقط هشت دسته‌بندی شناخته شده، به ترتیب ثابت
        let mut categories: Vec<BookCategory> = split_concat(row.categories.as_deref())
            .iter()
            .filter_map(|name| BookCategory::parse(name))
            .collect();
        categories.sort();
        categories.dedup();

        let summary = row.summary.unwrap_or_default();
        let data_ai_hint = if summary.is_empty() {
            String::new()
        } else {
            format!("{}...", summary.chars().take(50).collect::<String>())
        };

        Self {
            id: row.id.to_string(),
            title: row.title,
            author: row.author,
            isbn: row.isbn.unwrap_or_default(),
            cover_image: row.cover_image.unwrap_or_default(),
            price: row.price.unwrap_or(0.0),
            description: summary,
            genre: row.genre.unwrap_or_default(),
            available: row.available,
            rating: row.rating.unwrap_or(0.0),
            review_count: row.review_count.unwrap_or(0),
            categories,
            published_year: row.year,
            popularity: row.popularity.unwrap_or(0),
            // رتبه صفر یعنی رتبه نداره
            sales_rank: row.sales_rank.filter(|rank| *rank != 0),
            is_hot: row.is_hot,
            is_new: row.is_new,
            tags: split_concat(row.tags.as_deref()),
            awards: split_concat(row.awards.as_deref()),
            data_ai_hint,
        }
    }
}

impl Book {
    /// آیا کتاب برچسب داده شده رو داره؟
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// =====================================
// Book Category
// =====================================
/// دسته‌بندی‌های ردیف‌های صفحه اصلی
///
/// ترتیب variant‌ها همون ترتیب نمایش هست (`Ord`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BookCategory {
    #[serde(rename = "hot-books")]
    HotBooks,
    #[serde(rename = "bestsellers")]
    Bestsellers,
    #[serde(rename = "new-releases")]
    NewReleases,
    #[serde(rename = "le-monde-100")]
    LeMonde100,
    #[serde(rename = "century-21-top-100")]
    Century21Top100,
    #[serde(rename = "man-booker")]
    ManBooker,
    #[serde(rename = "houshang-golshiri")]
    HoushangGolshiri,
    #[serde(rename = "best-children-books")]
    BestChildrenBooks,
}

impl BookCategory {
    /// همه دسته‌بندی‌ها به ترتیب نمایش
    pub const ALL: [BookCategory; 8] = [
        Self::HotBooks,
        Self::Bestsellers,
        Self::NewReleases,
        Self::LeMonde100,
        Self::Century21Top100,
        Self::ManBooker,
        Self::HoushangGolshiri,
        Self::BestChildrenBooks,
    ];

    /// نام در دیتابیس و URL
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HotBooks => "hot-books",
            Self::Bestsellers => "bestsellers",
            Self::NewReleases => "new-releases",
            Self::LeMonde100 => "le-monde-100",
            Self::Century21Top100 => "century-21-top-100",
            Self::ManBooker => "man-booker",
            Self::HoushangGolshiri => "houshang-golshiri",
            Self::BestChildrenBooks => "best-children-books",
        }
    }

    /// عنوان فارسی ردیف
    #[must_use]
    pub fn title_fa(&self) -> &'static str {
        match self {
            Self::HotBooks => "داغ‌ترین کتاب‌ها",
            Self::Bestsellers => "پرفروش‌ترین کتاب‌ها",
            Self::NewReleases => "جدیدترین کتاب‌ها",
            Self::LeMonde100 => "صد کتاب قرن لوموند",
            Self::Century21Top100 => "صد کتاب برتر قرن ۲۱",
            Self::ManBooker => "جایزۀ من بوکر",
            Self::HoushangGolshiri => "جایزۀ هوشنگ گلشیری",
            Self::BestChildrenBooks => "برترین کتاب‌های کودک",
        }
    }

    /// توضیح پیش‌فرض (همون که migration درج میکنه)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::HotBooks => "Hot and trending books",
            Self::Bestsellers => "Bestselling books",
            Self::NewReleases => "Newly released books",
            Self::LeMonde100 => "Le Monde 100 Best Books",
            Self::Century21Top100 => "21st Century Top 100 Books",
            Self::ManBooker => "Man Booker Prize Winners",
            Self::HoushangGolshiri => "Houshang Golshiri Award Winners",
            Self::BestChildrenBooks => "Best Children Books",
        }
    }

    /// پیدا کردن دسته‌بندی با نام
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// آیا این نام یکی از دسته‌بندی‌های معتبره؟
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        Self::parse(name).is_some()
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AppError::unknown_category(s))
    }
}

// =====================================
// Catalog listings
// =====================================
/// ردیف جدول `categories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CategoryInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// ردیف جدول `tags`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TagInfo {
    pub name: String,
}

/// تعداد کتاب هر ژانر
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GenreCount {
    pub genre: String,
    pub count: i64,
}

// =====================================
// Cover images
// =====================================
/// وضعیت تصویر جلد
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverStatus {
    /// آدرس کامل http/https
    Remote,
    /// تصویر جایگزین (placeholder)
    Placeholder,
    /// مسیر داخلی سایت مثل `/images/books/x.jpg`
    Local,
    /// بدون تصویر یا آدرس نامعتبر
    Missing,
}

/// اطلاعات تصویر جلد برای بررسی تصاویر
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImageInfo {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_image: String,
    pub cover_status: CoverStatus,
    pub isbn_valid: bool,
}

impl From<&Book> for CoverImageInfo {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            cover_image: book.cover_image.clone(),
            cover_status: crate::utils::classify_cover(&book.cover_image),
            isbn_valid: crate::utils::is_valid_isbn(&book.isbn),
        }
    }
}
