//! # سرویس کتاب
//!
//! لیست، جستجو و ردیف‌های دسته‌بندی کتاب‌ها
//!
//! ## مفاهیم Rust:
//! - Business Logic: قوانین برنامه اینجا پیاده‌سازی میشن
//! - Separation of Concerns: کوئری‌ها در repository، قواعد ردیف‌ها در `categories`
//! - `#[instrument]`: هر متد یک span در لاگ داره

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    database::{BookRepository, Repository},
    error::Result,
    models::{
        Book, BookCategory, CategoryInfo, CategoryMatches, CategoryRowResponse, CategoryStats,
        CoverImageInfo, GenreCount, Paginated, Pagination, SearchParams, TagInfo,
    },
    utils,
};

use super::categories;

/// تعداد پیش‌فرض کتاب‌های یک ردیف
pub const DEFAULT_CATEGORY_LIMIT: u32 = 10;

// =====================================
// Book Service
// =====================================
/// سرویس دسترسی به کاتالوگ
///
/// یک نمونه ازش در `AppState` ساخته میشه و با `Arc` بین handler‌ها share میشه.
#[derive(Debug, Clone)]
pub struct BookService {
    repo: BookRepository,
    config: Arc<Config>,
}

impl BookService {
    #[must_use]
    pub fn new(repo: BookRepository, config: Arc<Config>) -> Self {
        Self { repo, config }
    }

    /// همه کتاب‌ها به ترتیب عنوان
    #[instrument(skip(self))]
    pub async fn get_all_books(&self) -> Result<Vec<Book>> {
        let rows = self.repo.find_all().await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// یک کتاب با شناسه
    ///
    /// شناسه غیرعددی یعنی کتاب وجود نداره.
    #[instrument(skip(self))]
    pub async fn get_book_by_id(&self, id: &str) -> Result<Option<Book>> {
        let Ok(id) = id.trim().parse::<i64>() else {
            debug!("Non-numeric book id");
            return Ok(None);
        };

        let book = self.repo.find_by_id(&id).await?.map(Book::from);
        if book.is_none() {
            debug!(id, "No book found");
        }
        Ok(book)
    }

    /// جستجو با فیلتر، مرتب‌سازی و صفحه‌بندی
    #[instrument(skip(self), fields(query = ?params.query, genre = ?params.genre, category = ?params.category))]
    pub async fn search_books(&self, params: &SearchParams) -> Result<Paginated<Book>> {
        let pagination = Pagination::new(
            params.page,
            params.limit,
            self.config.default_page_size,
            self.config.max_page_size,
        );

        let (rows, total) = self.repo.search(params, &pagination).await?;
        info!(total, returned = rows.len(), page = pagination.page, "Search completed");

        let books = rows.into_iter().map(Book::from).collect();
        Ok(Paginated::new(books, &pagination, total))
    }

    /// کتاب‌های یک دسته‌بندی (پیش‌فرض ۱۰ تا)
    #[instrument(skip(self))]
    pub async fn get_books_by_category(&self, category: &str, limit: Option<u32>) -> Result<Vec<Book>> {
        let limit = limit.unwrap_or(DEFAULT_CATEGORY_LIMIT);
        let rows = self.repo.find_by_category(category, limit).await?;
        debug!(count = rows.len(), "Books in category");
        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn get_categories(&self) -> Result<Vec<CategoryInfo>> {
        self.repo.categories().await
    }

    pub async fn get_tags(&self) -> Result<Vec<TagInfo>> {
        self.repo.tags().await
    }

    /// ژانرها با تعداد کتاب
    pub async fn get_genres(&self) -> Result<Vec<GenreCount>> {
        self.repo.genres().await
    }

    /// وضعیت تصویر جلد همه کتاب‌ها
    #[instrument(skip(self))]
    pub async fn get_cover_images(&self) -> Result<Vec<CoverImageInfo>> {
        let books = self.get_all_books().await?;
        Ok(books.iter().map(CoverImageInfo::from).collect())
    }

    /// همه کتاب‌های یک دسته، بدون محدودیت تعداد
    async fn category_members(&self, category: BookCategory) -> Result<Vec<Book>> {
        let rows = self.repo.find_by_category(category.as_str(), u32::MAX).await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// یک ردیف صفحه اصلی با قواعد همون ردیف
    #[instrument(skip(self))]
    pub async fn get_category_row(
        &self,
        category: BookCategory,
        limit: Option<u32>,
    ) -> Result<CategoryRowResponse> {
        let members = self.category_members(category).await?;
        let limit = limit.unwrap_or(DEFAULT_CATEGORY_LIMIT) as usize;
        let books = categories::books_for_category(&members, category, Some(limit), utils::current_year());

        Ok(CategoryRowResponse {
            category,
            title: category.title_fa().to_string(),
            books,
        })
    }

    /// آمار یک ردیف
    #[instrument(skip(self))]
    pub async fn get_category_stats(&self, category: BookCategory) -> Result<CategoryStats> {
        let members = self.category_members(category).await?;
        Ok(categories::category_stats(&members, category, utils::current_year()))
    }

    /// دسته‌های پیشنهادی برای یک کتاب، `None` اگه کتاب نباشه
    #[instrument(skip(self))]
    pub async fn get_recommended_categories(&self, id: &str) -> Result<Option<Vec<BookCategory>>> {
        let book = self.get_book_by_id(id).await?;
        Ok(book.map(|book| categories::recommended_categories(&book, utils::current_year())))
    }

    /// جستجوی متنی در ردیف‌ها
    #[instrument(skip(self))]
    pub async fn search_in_categories(&self, query: &str) -> Result<Vec<CategoryMatches>> {
        let books = self.get_all_books().await?;
        Ok(categories::search_books_in_categories(
            &books,
            query,
            None,
            utils::current_year(),
        ))
    }
}
