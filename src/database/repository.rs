//! # Repository Pattern
//!
//! یه لایه انتزاعی بین منطق برنامه و دیتابیس.
//! همه کوئری‌های کتاب اینجا نوشته میشن و مقادیر همیشه bind میشن.
//!
//! ## مفاهیم Rust:
//! - **async_trait**: امکان async در traits
//! - **Associated Types**: نوع‌های مرتبط با trait
//! - **QueryBuilder**: ساخت کوئری پویا با پارامترهای bind شده

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use super::Database;
use crate::error::Result;
use crate::models::{BookRow, CategoryInfo, GenreCount, Pagination, SearchParams, TagInfo};

// =====================================
// Base Repository Trait
// =====================================
/// Trait پایه برای Repository‌ها
#[async_trait]
pub trait Repository: Send + Sync {
    /// نوع Entity که این repository باهاش کار میکنه
    type Entity: Send + Sync;

    /// نوع شناسه (ID)
    type Id: Send + Sync;

    /// پیدا کردن با ID
    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>>;

    /// پیدا کردن همه
    async fn find_all(&self) -> Result<Vec<Self::Entity>>;
}

// =====================================
// SQL fragments
// =====================================
/// ستون‌های کتاب به همراه دسته‌بندی‌ها، برچسب‌ها و جوایز
///
/// subquery‌ها باعث میشن هر کتاب دقیقا یک ردیف داشته باشه و نیازی به `GROUP BY` نباشه.
const BOOK_SELECT: &str = r#"
    SELECT
        b.id, b.title, b.author, b.year, b.genre, b.original_language, b.translator,
        b.summary, b.publisher, b.pages, b.isbn, b.price, b.cover_image, b.available,
        b.rating, b.review_count, b.popularity, b.sales_rank, b.is_hot, b.is_new,
        b.created_at, b.updated_at,
        (
            SELECT GROUP_CONCAT(c.name, char(31))
            FROM book_categories bc
            JOIN categories c ON bc.category_id = c.id
            WHERE bc.book_id = b.id
        ) AS categories,
        (
            SELECT GROUP_CONCAT(t.name, char(31))
            FROM book_tags bt
            JOIN tags t ON bt.tag_id = t.id
            WHERE bt.book_id = b.id
        ) AS tags,
        (
            SELECT GROUP_CONCAT(a.name, char(31))
            FROM book_awards ba
            JOIN awards a ON ba.award_id = a.id
            WHERE ba.book_id = b.id
        ) AS awards
    FROM books b
"#;

/// escape کردن `%` و `_` برای `LIKE ... ESCAPE '\'`
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// اضافه کردن شرط‌های جستجو به کوئری
///
/// ترتیب bind‌ها همون ترتیب `?` در SQL هست چون هر دو با هم push میشن.
fn push_search_filters(builder: &mut QueryBuilder<'static, Sqlite>, params: &SearchParams) {
    builder.push(" WHERE 1 = 1");

    if let Some(query) = &params.query {
        let pattern = like_pattern(query);
        builder
            .push(" AND (b.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR b.author LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR b.isbn LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR b.summary LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    if let Some(genre) = &params.genre {
        builder
            .push(" AND LOWER(b.genre) = LOWER(")
            .push_bind(genre.clone())
            .push(")");
    }

    if let Some(category) = &params.category {
        builder
            .push(
                " AND b.id IN (SELECT bc.book_id FROM book_categories bc \
                 JOIN categories c ON bc.category_id = c.id WHERE c.name = ",
            )
            .push_bind(category.clone())
            .push(")");
    }
}

// =====================================
// Row types
// =====================================
/// ستون‌های لازم برای قیمت‌گذاری
#[derive(Debug, Clone, FromRow)]
pub struct BookPricing {
    pub id: i64,
    pub title: String,
    pub year: Option<i64>,
    pub genre: Option<String>,
    pub original_language: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i64>,
    pub is_hot: bool,
    pub rating: Option<f64>,
}

/// آمار کلی قیمت‌ها
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceStats {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub avg_price: Option<f64>,
    pub total_books: i64,
}

/// آمار قیمت به تفکیک زبان اصلی
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LanguagePriceStats {
    pub original_language: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub count: i64,
}

// =====================================
// Book Repository
// =====================================
/// Repository کتاب‌ها
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: Database,
}

impl BookRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// جستجو با فیلترها، مرتب‌سازی و صفحه‌بندی
    ///
    /// تعداد کل (بدون صفحه‌بندی) و ردیف‌های صفحه خواسته شده رو برمیگردونه.
    pub async fn search(
        &self,
        params: &SearchParams,
        pagination: &Pagination,
    ) -> Result<(Vec<BookRow>, u64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(DISTINCT b.id) FROM books b");
        push_search_filters(&mut count_query, params);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await?;

        let mut books_query = QueryBuilder::new(BOOK_SELECT);
        push_search_filters(&mut books_query, params);
        // ستون و جهت فقط از enum میان
        books_query.push(format!(
            " ORDER BY {} {}, b.id ASC LIMIT ",
            params.sort_by.column(),
            params.order.as_sql()
        ));
        books_query
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));

        let rows = books_query
            .build_query_as::<BookRow>()
            .fetch_all(self.db.pool())
            .await?;

        Ok((rows, u64::try_from(total).unwrap_or(0)))
    }

    /// کتاب‌های یک دسته‌بندی
    pub async fn find_by_category(&self, category: &str, limit: u32) -> Result<Vec<BookRow>> {
        let sql = format!(
            "{BOOK_SELECT}
            JOIN book_categories bcf ON b.id = bcf.book_id
            JOIN categories cf ON bcf.category_id = cf.id AND cf.name = ?
            ORDER BY b.id
            LIMIT ?"
        );

        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(category)
            .bind(i64::from(limit))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows)
    }

    /// چند کتاب با شناسه‌هاشون (ترتیب تضمین نمیشه)
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<BookRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(BOOK_SELECT);
        builder.push(" WHERE b.id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build_query_as::<BookRow>()
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows)
    }

    /// همه دسته‌بندی‌ها
    pub async fn categories(&self) -> Result<Vec<CategoryInfo>> {
        let rows = sqlx::query_as::<_, CategoryInfo>(
            "SELECT name, description FROM categories ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// همه برچسب‌ها
    pub async fn tags(&self) -> Result<Vec<TagInfo>> {
        let rows = sqlx::query_as::<_, TagInfo>("SELECT name FROM tags ORDER BY name")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows)
    }

    /// ژانرها با تعداد کتاب، پرتعدادترین اول
    pub async fn genres(&self) -> Result<Vec<GenreCount>> {
        let rows = sqlx::query_as::<_, GenreCount>(
            r#"
            SELECT genre, COUNT(*) AS count
            FROM books
            WHERE genre IS NOT NULL AND genre <> ''
            GROUP BY genre
            ORDER BY count DESC, genre ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// ستون‌های لازم برای قیمت‌گذاری همه کتاب‌ها
    pub async fn pricing_rows(&self) -> Result<Vec<BookPricing>> {
        let rows = sqlx::query_as::<_, BookPricing>(
            r#"
            SELECT id, title, year, genre, original_language, publisher, pages, is_hot, rating
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// به‌روزرسانی قیمت‌ها در یک تراکنش
    pub async fn update_prices(&self, prices: &[(i64, f64)]) -> Result<u64> {
        let mut tx = self.db.begin().await?;
        let mut updated = 0;

        for (id, price) in prices {
            let result = sqlx::query(
                "UPDATE books SET price = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            )
            .bind(price)
            .bind(id)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// آمار کلی قیمت
    pub async fn price_stats(&self) -> Result<PriceStats> {
        let stats = sqlx::query_as::<_, PriceStats>(
            r#"
            SELECT
                MIN(price) AS min_price,
                MAX(price) AS max_price,
                AVG(price) AS avg_price,
                COUNT(*) AS total_books
            FROM books
            "#,
        )
        .fetch_one(self.db.pool())
        .await?;

        Ok(stats)
    }

    /// آمار قیمت به تفکیک زبان اصلی
    pub async fn language_price_stats(&self) -> Result<Vec<LanguagePriceStats>> {
        let stats = sqlx::query_as::<_, LanguagePriceStats>(
            r#"
            SELECT
                original_language,
                COALESCE(MIN(price), 0.0) AS min_price,
                COALESCE(MAX(price), 0.0) AS max_price,
                COALESCE(AVG(price), 0.0) AS avg_price,
                COUNT(*) AS count
            FROM books
            GROUP BY original_language
            ORDER BY original_language
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(stats)
    }
}

#[async_trait]
impl Repository for BookRepository {
    type Entity = BookRow;
    type Id = i64;

    async fn find_by_id(&self, id: &i64) -> Result<Option<BookRow>> {
        let sql = format!("{BOOK_SELECT} WHERE b.id = ?");

        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<BookRow>> {
        let sql = format!("{BOOK_SELECT} ORDER BY b.title, b.id");

        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows)
    }

}
