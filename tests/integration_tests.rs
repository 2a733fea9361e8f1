//! # Integration Tests
//!
//! تست‌های یکپارچه کاتالوگ
//!
//! ## انواع تست در Rust:
//! 1. **Unit Tests**: داخل همون فایل با `#[cfg(test)]`
//! 2. **Integration Tests**: در پوشه `tests/`
//! 3. **Doc Tests**: در documentation comments
//!
//! ## اجرای تست‌ها:
//! ```bash
//! cargo test                    # همه تست‌ها
//! cargo test api_tests          # فقط تست‌های HTTP
//! cargo test -- --nocapture     # نمایش println!
//! ```
//!
//! دیتابیس همه تست‌ها SQLite در حافظه هست و داده نمونه با RNG ثابت درج میشه.

use ketabkhaneh::{
    config::{Config, ConfigBuilder},
    database::{seed, Database},
    services::AppState,
};
use rand::{rngs::StdRng, SeedableRng};

/// دیتابیس در حافظه با کاتالوگ نمونه
async fn seeded_db() -> Database {
    let db = Database::in_memory().await.expect("in-memory database");
    let mut rng = StdRng::seed_from_u64(42);
    seed::seed_catalog(&db, &mut rng, false)
        .await
        .expect("seed catalog");
    db
}

/// تنظیمات تست با rate limit بالا
fn test_config() -> Config {
    ConfigBuilder::new().rate_limit(1_000, 1_000).build()
}

async fn seeded_state() -> AppState {
    AppState::new(seeded_db().await, test_config())
}

// =====================================
// تست‌های Utils
// =====================================
mod utils_tests {
    use ketabkhaneh::models::CoverStatus;
    use ketabkhaneh::utils;

    /// تست قیمت فارسی
    #[test]
    fn test_format_toman() {
        assert_eq!(utils::format_toman(1_250_000.0), "۱٬۲۵۰٬۰۰۰ تومان");
        assert_eq!(utils::format_toman(4_999.6), "۵٬۰۰۰ تومان");
    }

    /// تست پاکسازی عبارت جستجو
    #[test]
    fn test_normalize_query() {
        assert_eq!(utils::normalize_query("  بوف   کور "), "بوف کور");
    }

    /// تست دسته‌بندی تصویر جلد
    #[test]
    fn test_cover_classification() {
        assert_eq!(
            utils::classify_cover("https://via.placeholder.com/300"),
            CoverStatus::Placeholder
        );
        assert_eq!(utils::classify_cover("   "), CoverStatus::Missing);
    }
}

// =====================================
// تست‌های Config
// =====================================
mod config_tests {
    use ketabkhaneh::config::{ConfigBuilder, Environment};

    /// تست Builder Pattern
    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .port(8080)
            .host("0.0.0.0")
            .database_url("sqlite::memory:")
            .environment(Environment::Production)
            .build();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.environment.is_production());
    }

    /// تست اعتبارسنجی اندازه صفحه
    #[test]
    fn test_validation_page_size() {
        assert!(ConfigBuilder::new().page_size(12, 100).build_validated().is_ok());
        assert!(ConfigBuilder::new().page_size(0, 100).build_validated().is_err());
        assert!(ConfigBuilder::new().page_size(12, 0).build_validated().is_err());
    }
}

// =====================================
// تست‌های Error
// =====================================
mod error_tests {
    use axum::http::StatusCode;
    use ketabkhaneh::error::{AppError, OptionExt, ResultExt};
    use ketabkhaneh::models::BookCategory;

    /// تست status codes
    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::book_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("quantity".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert!(AppError::Internal("test".to_string()).is_server_error());
    }

    /// نام ناشناخته دسته‌بندی 404 میده
    #[test]
    fn test_unknown_category_parse() {
        let err = "staff-picks".parse::<BookCategory>().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!("man-booker".parse::<BookCategory>().is_ok());
    }

    /// تست Extension traits
    #[test]
    fn test_extensions() {
        let none: Option<i32> = None;
        assert!(matches!(none.ok_or_not_found("Book not found"), Err(AppError::NotFound(_))));

        let err: Result<i32, &str> = Err("boom");
        assert!(matches!(err.map_internal(), Err(AppError::Internal(_))));
    }
}

// =====================================
// تست‌های Models
// =====================================
mod model_tests {
    use ketabkhaneh::models::{BookCategory, BooksQuery, CartQuoteRequest, Pagination};
    use validator::Validate;

    /// تست Pagination
    #[test]
    fn test_pagination() {
        let pagination = Pagination::new(Some(3), Some(4), 12, 100);
        assert_eq!(pagination.offset(), 8);
        assert_eq!(pagination.total_pages(10), 3);
    }

    /// ترتیب و سریالایز دسته‌بندی‌ها
    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&BookCategory::ALL).unwrap();
        assert_eq!(
            json,
            r#"["hot-books","bestsellers","new-releases","le-monde-100","century-21-top-100","man-booker","houshang-golshiri","best-children-books"]"#
        );
    }

    /// query string خراب به پیش‌فرض برمیگرده
    #[test]
    fn test_books_query_defaults() {
        let query: BooksQuery =
            serde_json::from_str(r#"{"page":"x","sortBy":"nonsense","order":"DESC"}"#).unwrap();
        let params = query.to_search_params();

        assert_eq!(params.page, None);
        assert_eq!(params.sort_by.as_str(), "title");
        assert_eq!(params.order.as_str(), "desc");
    }

    /// اعتبارسنجی سبد خرید
    #[test]
    fn test_cart_validation() {
        let empty: CartQuoteRequest = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(empty.validate().is_err());

        let zero: CartQuoteRequest =
            serde_json::from_str(r#"{"items":[{"bookId":"1","quantity":0}]}"#).unwrap();
        assert!(zero.validate().is_err());

        let ok: CartQuoteRequest =
            serde_json::from_str(r#"{"items":[{"bookId":"1","quantity":99}]}"#).unwrap();
        assert!(ok.validate().is_ok());
    }
}

// =====================================
// تست‌های Async (با Database)
// =====================================
mod database_tests {
    use super::*;
    use ketabkhaneh::database::BookRepository;
    use ketabkhaneh::models::{BookCategory, CartQuoteRequest, SearchParams, SortField, SortOrder};
    use ketabkhaneh::services::{BookService, CartService, PricingService};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn service(db: &Database) -> BookService {
        BookService::new(BookRepository::new(db.clone()), Arc::new(test_config()))
    }

    /// درج دوباره داده نمونه کتاب تکراری نمیسازه
    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = seeded_db().await;
        let mut rng = StdRng::seed_from_u64(1);

        let report = seed::seed_catalog(&db, &mut rng, false).await.unwrap();
        assert_eq!(report.books_inserted, 0);
        assert_eq!(report.books_skipped, 10);

        let report = seed::seed_catalog(&db, &mut rng, true).await.unwrap();
        assert_eq!(report.books_inserted, 10);

        let books = service(&db).get_all_books().await.unwrap();
        assert_eq!(books.len(), 10);
    }

    /// صفحه‌بندی و totalPages
    #[tokio::test]
    async fn test_search_pagination() {
        let db = seeded_db().await;
        let params = SearchParams {
            page: Some(3),
            limit: Some(4),
            ..Default::default()
        };

        let result = service(&db).search_books(&params).await.unwrap();
        assert_eq!(result.total, 10);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.items.len(), 2);
    }

    /// limit بیشتر از سقف محدود میشه
    #[tokio::test]
    async fn test_search_limit_is_capped() {
        let db = seeded_db().await;
        let service = BookService::new(
            BookRepository::new(db.clone()),
            Arc::new(ConfigBuilder::new().page_size(2, 5).build()),
        );

        let capped = service
            .search_books(&SearchParams {
                limit: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(capped.limit, 5);
        assert_eq!(capped.items.len(), 5);

        let default = service.search_books(&SearchParams::default()).await.unwrap();
        assert_eq!(default.limit, 2);
    }

    /// جستجو روی نویسنده و ISBN
    #[tokio::test]
    async fn test_search_by_author_and_isbn() {
        let db = seeded_db().await;
        let service = service(&db);

        let by_author = service
            .search_books(&SearchParams {
                query: Some("rowling".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_author.total, 1);
        assert_eq!(by_author.items[0].author, "J.K. Rowling");

        let by_isbn = service
            .search_books(&SearchParams {
                query: Some("0156012195".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_isbn.total, 1);
        assert_eq!(by_isbn.items[0].title, "The Little Prince");
    }

    /// `%` و `_` به صورت حرفی جستجو میشن
    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let db = seeded_db().await;
        let service = service(&db);

        for query in ["%", "_", "%%_"] {
            let result = service
                .search_books(&SearchParams {
                    query: Some(query.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(result.total, 0, "query {query:?} should match nothing");
        }
    }

    /// فیلتر ژانر به حروف بزرگ و کوچک حساس نیست
    #[tokio::test]
    async fn test_genre_filter_is_case_insensitive() {
        let db = seeded_db().await;

        let result = service(&db)
            .search_books(&SearchParams {
                genre: Some("fiction".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.total, 5);
        assert!(result.items.iter().all(|book| book.genre == "Fiction"));
    }

    /// فیلتر دسته‌بندی و مرتب‌سازی نزولی قیمت
    #[tokio::test]
    async fn test_category_filter_with_price_sort() {
        let db = seeded_db().await;

        let result = service(&db)
            .search_books(&SearchParams {
                category: Some("hot-books".to_string()),
                sort_by: SortField::Price,
                order: SortOrder::Desc,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.total, 6);
        assert_eq!(result.items[0].title, "Atomic Habits");

        let prices: Vec<f64> = result.items.iter().map(|book| book.price).collect();
        assert!(prices.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(result
            .items
            .iter()
            .all(|book| book.categories.contains(&BookCategory::HotBooks)));
    }

    /// ژانرها با تعداد و بدون ژانر خالی
    #[tokio::test]
    async fn test_genres_are_counted() {
        let db = seeded_db().await;
        let genres = service(&db).get_genres().await.unwrap();

        assert_eq!(genres[0].genre, "Fiction");
        assert_eq!(genres[0].count, 5);
        assert_eq!(genres.iter().map(|g| g.count).sum::<i64>(), 10);
    }

    /// قیمت‌گذاری مجدد همه کتاب‌ها رو به مضرب ۵٬۰۰۰ میبره
    #[tokio::test]
    async fn test_reprice_catalog() {
        let db = seeded_db().await;
        let mut rng = StdRng::seed_from_u64(7);

        let report = PricingService::new(BookRepository::new(db.clone()))
            .reprice_all(&mut rng)
            .await
            .unwrap();
        assert_eq!(report.updated, 10);
        assert_eq!(report.stats.total_books, 10);

        let books = service(&db).get_all_books().await.unwrap();
        assert!(books
            .iter()
            .all(|book| book.price > 0.0 && book.price % 5_000.0 == 0.0));
    }

    /// کتاب‌های هم‌قیمت با شناسه مرتب میشن و صفحه‌ها هم‌پوشانی ندارن
    #[tokio::test]
    async fn test_paging_is_stable_on_ties() {
        let db = seeded_db().await;
        let same_price: Vec<(i64, f64)> = (1..=10).map(|id| (id, 100_000.0)).collect();
        BookRepository::new(db.clone())
            .update_prices(&same_price)
            .await
            .unwrap();

        let service = service(&db);
        let mut seen = Vec::new();
        for page in 1..=3 {
            let result = service
                .search_books(&SearchParams {
                    page: Some(page),
                    limit: Some(4),
                    sort_by: SortField::Price,
                    order: SortOrder::Desc,
                    ..Default::default()
                })
                .await
                .unwrap();
            seen.extend(result.items.into_iter().map(|book| book.id.parse::<i64>().unwrap()));
        }

        assert_eq!(seen, (1..=10).collect::<Vec<i64>>());
    }

    /// جستجو، ژانر و دسته‌بندی با هم
    #[tokio::test]
    async fn test_combined_filters() {
        let db = seeded_db().await;

        let result = service(&db)
            .search_books(&SearchParams {
                query: Some("novel".to_string()),
                genre: Some("FICTION".to_string()),
                category: Some("hot-books".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let titles: Vec<&str> = result.items.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(result.total, 2);
        assert_eq!(titles, vec!["The Alchemist", "To Kill a Mockingbird"]);
    }

    /// کتاب‌های بدون ژانر در لیست ژانرها نمیان
    #[tokio::test]
    async fn test_genres_skip_missing_genre() {
        let db = seeded_db().await;
        sqlx::query("INSERT INTO books (title, author, genre) VALUES ('Untitled', 'Anonymous', NULL), ('Blank', 'Anonymous', '')")
            .execute(db.pool())
            .await
            .unwrap();

        let genres = service(&db).get_genres().await.unwrap();

        assert!(genres.iter().all(|g| !g.genre.is_empty()));
        assert_eq!(genres.iter().map(|g| g.count).sum::<i64>(), 10);
    }

    /// برچسب و جایزه با کاما شکسته نمیشن
    #[tokio::test]
    async fn test_names_with_commas() {
        let db = seeded_db().await;
        sqlx::query("INSERT INTO tags (name) VALUES ('love, loss')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO book_tags (book_id, tag_id) SELECT 1, id FROM tags WHERE name = 'love, loss'")
            .execute(db.pool())
            .await
            .unwrap();

        let book = service(&db).get_book_by_id("1").await.unwrap().unwrap();

        assert!(book.tags.contains(&"love, loss".to_string()));
        assert!(!book.tags.iter().any(|tag| tag == "love" || tag == "loss"));
    }

    /// رتبه فروش صفر یعنی بدون رتبه
    #[tokio::test]
    async fn test_zero_sales_rank_is_unranked() {
        let db = seeded_db().await;
        sqlx::query("UPDATE books SET sales_rank = 0 WHERE id = 1")
            .execute(db.pool())
            .await
            .unwrap();
        let service = service(&db);

        let book = service.get_book_by_id("1").await.unwrap().unwrap();
        assert_eq!(book.sales_rank, None);

        let row = service
            .get_category_row(BookCategory::Bestsellers, None)
            .await
            .unwrap();
        assert_eq!(row.books.last().map(|b| b.id.as_str()), Some("1"));
        assert_ne!(row.books[0].id, "1");
    }

    /// شکل‌های مختلف یک شناسه در سبد یک ردیف میشن
    #[tokio::test]
    async fn test_cart_merges_numeric_forms() {
        let db = seeded_db().await;
        let cart = CartService::new(BookRepository::new(db.clone()));
        let request: CartQuoteRequest = serde_json::from_value(serde_json::json!({
            "items": [
                { "bookId": "1", "quantity": 99 },
                { "bookId": "01", "quantity": 99 },
                { "bookId": "abc", "quantity": 1 }
            ]
        }))
        .unwrap();

        let quote = cart.quote(request).await.unwrap();

        assert_eq!(quote.lines.len(), 1);
        assert_eq!(quote.lines[0].book.id, "1");
        assert_eq!(quote.total_quantity, 99);
        assert_eq!(quote.unavailable, vec!["abc".to_string()]);
    }
}

// =====================================
// تست‌های HTTP (بدون سوکت)
// =====================================
mod api_tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use ketabkhaneh::api::{router_with_state, REQUEST_ID_HEADER};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        router_with_state(seeded_state().await)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_json(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// پاسخ پیش‌فرض لیست کتاب‌ها
    #[tokio::test]
    async fn test_list_books() {
        let app = app().await;
        let (status, body) = get(&app, "/api/books?limit=3&sortBy=salesRank").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 10);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 3);
        assert_eq!(body["totalPages"], 4);
        assert_eq!(body["books"][0]["title"], "The Alchemist");
        assert_eq!(body["appliedFilters"]["sortBy"], "salesRank");
        assert_eq!(body["appliedFilters"]["order"], "asc");
    }

    /// `?id=` یک کتاب برمیگردونه
    #[tokio::test]
    async fn test_book_by_query_id() {
        let app = app().await;

        let (status, body) = get(&app, "/api/books?id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "1");
        assert_eq!(body["isbn"], "978-0062315007");

        let (status, body) = get(&app, "/api/books?id=abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Book not found");
    }

    /// کتاب با path و دسته‌های پیشنهادی
    #[tokio::test]
    async fn test_book_by_path() {
        let app = app().await;

        let (status, body) = get(&app, "/api/books/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"], "J.K. Rowling");

        let (status, _) = get(&app, "/api/books/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(&app, "/api/books/1/recommended-categories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bookId"], "1");
        assert_eq!(body["categories"][0], "hot-books");
    }

    /// وضعیت تصویر جلدها
    #[tokio::test]
    async fn test_check_images() {
        let app = app().await;
        let (status, body) = get(&app, "/api/books/check-images").await;

        assert_eq!(status, StatusCode::OK);
        let books = body["books"].as_array().unwrap();
        assert_eq!(books.len(), 10);
        assert!(books.iter().all(|b| b["coverStatus"] == "local"));
    }

    /// دسته‌بندی‌ها و ردیف‌ها
    #[tokio::test]
    async fn test_category_endpoints() {
        let app = app().await;

        let (status, body) = get(&app, "/api/categories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"].as_array().unwrap().len(), 8);

        let (status, body) = get(&app, "/api/categories/bestsellers/books?limit=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "پرفروش‌ترین کتاب‌ها");
        assert_eq!(body["books"].as_array().unwrap().len(), 3);
        assert_eq!(body["books"][0]["salesRank"], 1);

        let (status, body) = get(&app, "/api/categories/bestsellers/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalBooks"], 5);

        let (status, _) = get(&app, "/api/categories/staff-picks/books").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&app, "/api/categories/bestsellers/books?limit=0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    /// جستجو بین ردیف‌ها
    #[tokio::test]
    async fn test_category_search() {
        let app = app().await;

        let (status, body) = get(&app, "/api/categories/search?q=Hogwarts").await;
        assert_eq!(status, StatusCode::OK);
        let groups = body.as_array().unwrap();
        assert!(!groups.is_empty());
        assert!(groups
            .iter()
            .all(|g| g["books"][0]["title"] == "Harry Potter and the Philosopher's Stone"));

        let (status, _) = get(&app, "/api/categories/search?q=").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    /// ژانرها و برچسب‌ها
    #[tokio::test]
    async fn test_genres_and_tags() {
        let app = app().await;

        let (status, body) = get(&app, "/api/genres").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["genres"][0]["genre"], "Fiction");

        let (status, body) = get(&app, "/api/tags").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"].as_array().unwrap().len(), 15);
    }

    /// پیش‌فاکتور سبد
    #[tokio::test]
    async fn test_cart_quote() {
        let app = app().await;
        let body = json!({
            "items": [
                { "bookId": "1", "quantity": 2 },
                { "bookId": "999", "quantity": 1 },
                { "bookId": "1", "quantity": 1 }
            ]
        });

        let (status, quote) = post_json(&app, "/api/cart/quote", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quote["totalQuantity"], 3);
        assert_eq!(quote["totalPrice"], 450_000.0);
        assert_eq!(quote["formattedTotal"], "۴۵۰٬۰۰۰ تومان");
        assert_eq!(quote["unavailable"], json!(["999"]));
    }

    /// ورودی نامعتبر سبد
    #[tokio::test]
    async fn test_cart_quote_rejects_bad_input() {
        let app = app().await;

        let (status, _) = post_json(
            &app,
            "/api/cart/quote",
            json!({ "items": [{ "bookId": "1", "quantity": 0 }] }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = post_json(&app, "/api/cart/quote", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// health check و header‌های پاسخ
    #[tokio::test]
    async fn test_health_and_headers() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "trace-me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-me");
        assert_eq!(response.headers()["X-Content-Type-Options"], "nosniff");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], true);

        // بدون header یک شناسه تازه ساخته میشه
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER].len(), 12);
    }

    /// rate limiting روی مسیرهای `/api`
    #[tokio::test]
    async fn test_rate_limit() {
        let config = ConfigBuilder::new().rate_limit(1, 2).build();
        let app = router_with_state(AppState::new(seeded_db().await, config));

        assert_eq!(get(&app, "/api/tags").await.0, StatusCode::OK);
        assert_eq!(get(&app, "/api/tags").await.0, StatusCode::OK);

        let (status, body) = get(&app, "/api/tags").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["status_code"], 429);

        // health محدودیت نداره
        assert_eq!(get(&app, "/health").await.0, StatusCode::OK);
    }

    fn forwarded(uri: &str, ip: &str) -> Request<Body> {
        Request::get(uri)
            .header("X-Forwarded-For", ip)
            .body(Body::empty())
            .unwrap()
    }

    /// بدون proxy مطمئن، عوض کردن `X-Forwarded-For` از محدودیت رد نمیشه
    #[tokio::test]
    async fn test_rate_limit_ignores_forwarded_for_by_default() {
        let config = ConfigBuilder::new().rate_limit(1, 1).build();
        let app = router_with_state(AppState::new(seeded_db().await, config));

        let first = app.clone().oneshot(forwarded("/api/tags", "198.51.100.1")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        for i in 2..20 {
            let response = app
                .clone()
                .oneshot(forwarded("/api/tags", &format!("198.51.100.{i}")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        }
    }

    /// پشت proxy مطمئن هر IP سهمیه خودش رو داره
    #[tokio::test]
    async fn test_rate_limit_uses_forwarded_for_behind_trusted_proxy() {
        let config = ConfigBuilder::new()
            .rate_limit(1, 1)
            .trust_proxy_headers(true)
            .build();
        let app = router_with_state(AppState::new(seeded_db().await, config));

        for ip in ["198.51.100.1", "198.51.100.2"] {
            let response = app.clone().oneshot(forwarded("/api/tags", ip)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let again = app.oneshot(forwarded("/api/tags", "198.51.100.1")).await.unwrap();
        assert_eq!(again.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    /// `"1"` و `"01"` در سبد یک کتاب هستن
    #[tokio::test]
    async fn test_cart_quote_merges_zero_padded_ids() {
        let app = app().await;
        let body = json!({
            "items": [
                { "bookId": "1", "quantity": 99 },
                { "bookId": "01", "quantity": 99 }
            ]
        });

        let (status, quote) = post_json(&app, "/api/cart/quote", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quote["lines"].as_array().unwrap().len(), 1);
        assert_eq!(quote["totalQuantity"], 99);
    }
}

// =====================================
// End-to-end (با سوکت واقعی)
// =====================================
mod e2e_tests {
    use super::*;
    use ketabkhaneh::api::router_with_state;
    use serde_json::Value;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// سرور واقعی روی پورت تصادفی
    #[tokio::test]
    async fn test_server_over_http() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router_with_state(seeded_state().await);

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = reqwest::Client::new();
        let body: Value = client
            .get(format!("http://{addr}/api/books"))
            .query(&[("search", "Gatsby")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["total"], 1);
        assert_eq!(body["books"][0]["author"], "F. Scott Fitzgerald");
        assert_eq!(body["appliedFilters"]["search"], "Gatsby");
    }
}

// =====================================
// Property-Based Tests
// =====================================
mod property_tests {
    use ketabkhaneh::models::Pagination;
    use ketabkhaneh::services::pricing::{round_price, PRICE_STEP};
    use proptest::prelude::*;

    proptest! {
        /// صفحه‌بندی همیشه در بازه مجاز میمونه
        #[test]
        fn pagination_stays_in_bounds(page: Option<u32>, limit: Option<u32>, max in 1u32..500) {
            let p = Pagination::new(page, limit, 12.min(max), max);
            prop_assert!(p.page >= 1);
            prop_assert!(p.limit >= 1 && p.limit <= max);
        }

        /// totalPages همه آیتم‌ها رو پوشش میده
        #[test]
        fn total_pages_covers_items(total in 0u64..100_000, limit in 1u32..200) {
            let p = Pagination { page: 1, limit };
            let pages = p.total_pages(total);
            prop_assert!(pages * u64::from(limit) >= total);
            prop_assert!(pages == 0 || (pages - 1) * u64::from(limit) < total);
        }

        /// گرد کردن قیمت مضرب ۵٬۰۰۰ و نزدیک به مقدار اصلی هست
        #[test]
        fn rounded_prices_are_multiples(price in 0.0f64..10_000_000.0) {
            let rounded = round_price(price);
            prop_assert_eq!(rounded % PRICE_STEP, 0.0);
            prop_assert!((rounded - price).abs() <= PRICE_STEP / 2.0);
        }
    }
}
