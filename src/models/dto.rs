//! # Data Transfer Objects (DTOs)
//!
//! ورودی‌های query string و پاسخ‌های API کاتالوگ
//!
//! ## مفاهیم:
//! - DTO: برای انتقال داده بین لایه‌ها
//! - Request/Response separation: جداسازی ورودی از خروجی

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Book, BookCategory, CategoryInfo, CoverImageInfo, GenreCount, Paginated, SortField, SortOrder, TagInfo};

/// عدد صحیح از query string، مقدار خراب یعنی «نیومده»
fn lenient_number(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

// =====================================
// Books
// =====================================
/// پارامترهای `GET /api/books`
///
/// مقادیر عددی به صورت متن میان تا `page=abc` به جای 400 مقدار پیش‌فرض بگیره.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksQuery {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub genre: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub page: Option<String>,

    #[serde(default)]
    pub limit: Option<String>,

    #[serde(default)]
    pub sort_by: Option<String>,

    #[serde(default)]
    pub order: Option<String>,
}

/// پارامترهای جستجوی کتاب بعد از پاکسازی
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

/// رشته خالی یا فقط فاصله یعنی فیلتر نیومده
fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| crate::utils::normalize_query(v))
        .filter(|v| !v.is_empty())
}

impl BooksQuery {
    /// تبدیل به پارامترهای جستجو
    #[must_use]
    pub fn to_search_params(&self) -> SearchParams {
        // صفحه منفی یا صفر همون 1 حساب میشه و limit منفی همون 1
        let page = lenient_number(self.page.as_deref()).map(|p| p.clamp(1, i64::from(u32::MAX)) as u32);
        let limit = lenient_number(self.limit.as_deref()).map(|l| l.clamp(1, i64::from(u32::MAX)) as u32);

        SearchParams {
            query: non_empty(self.search.as_ref()),
            genre: non_empty(self.genre.as_ref()),
            category: non_empty(self.category.as_ref()),
            page,
            limit,
            sort_by: self.sort_by.as_deref().map(SortField::parse).unwrap_or_default(),
            order: self.order.as_deref().map(SortOrder::parse).unwrap_or_default(),
        }
    }
}

/// فیلترهای اعمال شده که به کلاینت برمیگرده
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl From<&SearchParams> for AppliedFilters {
    fn from(params: &SearchParams) -> Self {
        Self {
            category: params.category.clone(),
            genre: params.genre.clone(),
            search: params.query.clone(),
            sort_by: params.sort_by,
            order: params.order,
        }
    }
}

/// پاسخ جستجوی کتاب
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksResponse {
    pub books: Vec<Book>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub category: Option<String>,
    pub applied_filters: AppliedFilters,
}

impl BooksResponse {
    #[must_use]
    pub fn new(result: Paginated<Book>, params: &SearchParams) -> Self {
        Self {
            books: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
            category: params.category.clone(),
            applied_filters: AppliedFilters::from(params),
        }
    }
}

// =====================================
// Listings
// =====================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenresResponse {
    pub genres: Vec<GenreCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<TagInfo>,
}

/// پاسخ `GET /api/books/check-images`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverImagesResponse {
    pub books: Vec<CoverImageInfo>,
}

// =====================================
// Category rows
// =====================================
/// پارامتر `limit` ردیف دسته‌بندی
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryRowQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

/// یک ردیف صفحه اصلی
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRowResponse {
    pub category: BookCategory,
    pub title: String,
    pub books: Vec<Book>,
}

/// جستجو در دسته‌بندی‌ها
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategorySearchQuery {
    #[validate(length(min = 1, max = 200, message = "q must be between 1 and 200 characters"))]
    pub q: String,
}

/// بازه قیمت کتاب‌های یک دسته
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// آمار یک دسته‌بندی
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total_books: usize,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub available_books: usize,
    pub price_range: PriceRange,
}

/// دسته‌بندی‌های پیشنهادی برای یک کتاب
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCategoriesResponse {
    pub book_id: String,
    pub categories: Vec<BookCategory>,
}

/// نتیجه جستجو در یک دسته
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMatches {
    pub category: BookCategory,
    pub books: Vec<Book>,
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database_ok: bool) -> Self {
        Self {
            status: if database_ok { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
        }
    }
}
