//! # ماژول مدل‌ها (Domain Models)
//!
//! مدل‌های داده کاتالوگ کتاب.
//!
//! ## تفاوت انواع مدل:
//! - **Row**: ردیف خام دیتابیس (`BookRow`)
//! - **DTO**: چیزی که API برمیگردونه (`Book`, `BooksResponse`, ...)
//! - **Domain**: دسته‌بندی‌ها، صفحه‌بندی و مرتب‌سازی

mod book;
mod cart;
mod dto;

pub use book::*;
pub use cart::*;
pub use dto::*;

use serde::{Deserialize, Serialize};

// =====================================
// Pagination
// =====================================
/// پارامترهای صفحه‌بندی بعد از محدودسازی
///
/// `page` از 1 شروع میشه و `limit` همیشه بین 1 و سقف تنظیمات هست.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// شماره صفحه (از 1 شروع میشه)
    pub page: u32,

    /// تعداد آیتم در صفحه
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 12 }
    }
}

impl Pagination {
    /// ساخت از مقادیر خام query string
    ///
    /// صفحه کمتر از 1 همون 1 حساب میشه و limit به `1..=max_limit` محدود میشه.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit),
        }
    }

    /// محاسبه offset برای SQL
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// تعداد کل صفحه‌ها: `ceil(total / limit)`
    #[must_use]
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// یک صفحه از نتایج به همراه شمارش کل
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// ساخت نتیجه صفحه‌بندی شده
    pub fn new(items: Vec<T>, pagination: &Pagination, total: u64) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
        }
    }
}

// =====================================
// Sorting
// =====================================
/// ترتیب مرتب‌سازی
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// هر مقداری جز `desc` صعودی حساب میشه
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// تبدیل به SQL
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// ستون‌های مجاز برای مرتب‌سازی کتاب‌ها
///
/// نام ستون SQL فقط از این enum میاد، نه از متن درخواست.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Title,
    Author,
    Price,
    Rating,
    Popularity,
    PublishedYear,
    SalesRank,
}

impl SortField {
    /// مقدار ناشناخته به عنوان (title) برمیگرده
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "author" => Self::Author,
            "price" => Self::Price,
            "rating" => Self::Rating,
            "popularity" => Self::Popularity,
            "publishedYear" => Self::PublishedYear,
            "salesRank" => Self::SalesRank,
            _ => Self::Title,
        }
    }

    /// ستون متناظر در جدول `books` (با alias `b`)
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title => "b.title",
            Self::Author => "b.author",
            Self::Price => "b.price",
            Self::Rating => "b.rating",
            Self::Popularity => "b.popularity",
            Self::PublishedYear => "b.year",
            Self::SalesRank => "b.sales_rank",
        }
    }

    /// نام فیلد در API
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Popularity => "popularity",
            Self::PublishedYear => "publishedYear",
            Self::SalesRank => "salesRank",
        }
    }
}
