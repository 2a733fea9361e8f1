//! # منطق ردیف‌های صفحه اصلی
//!
//! توابع خالص روی لیست کتاب‌ها: انتخاب و مرتب‌سازی هر ردیف،
//! آمار دسته، دسته‌های پیشنهادی و جستجو بین ردیف‌ها.
//!
//! سال جاری همیشه به عنوان پارامتر میاد تا نتیجه قابل تست باشه.

use std::cmp::Ordering;

use crate::models::{Book, BookCategory, CategoryMatches, CategoryStats, PriceRange};

/// رتبه فروش کتاب‌هایی که رتبه ندارن
const MISSING_SALES_RANK: i64 = 999;

/// ژانرهای ردیف «برترین کتاب‌های کودک»
const CHILDREN_GENRES: [&str; 4] = ["Children", "Fantasy", "داستان کودک", "فانتزی"];

/// برچسب‌های کودک
const CHILDREN_TAGS: [&str; 2] = ["children", "کودک"];

/// آیا این نام یکی از هشت دسته‌بندیه؟
#[must_use]
pub fn is_valid_category(name: &str) -> bool {
    BookCategory::is_valid(name)
}

/// کتاب تازه منتشر شده: `isNew` یا سال انتشار در یک سال اخیر
fn is_recent(book: &Book, current_year: i64) -> bool {
    book.is_new || book.published_year.is_some_and(|year| year >= current_year - 1)
}

fn is_for_children(book: &Book) -> bool {
    CHILDREN_GENRES.contains(&book.genre.as_str())
        || CHILDREN_TAGS.iter().any(|tag| book.has_tag(tag))
}

fn by_popularity_desc(a: &&Book, b: &&Book) -> Ordering {
    b.popularity.cmp(&a.popularity)
}

/// کتاب‌های یک ردیف با قواعد مخصوص همون ردیف
///
/// مرتب‌سازی پایداره، پس کتاب‌های هم‌رتبه ترتیب ورودی رو حفظ میکنن.
#[must_use]
pub fn books_for_category(
    books: &[Book],
    category: BookCategory,
    limit: Option<usize>,
    current_year: i64,
) -> Vec<Book> {
    let mut selected: Vec<&Book> = books
        .iter()
        .filter(|book| book.categories.contains(&category))
        .collect();

    match category {
        BookCategory::HotBooks => {
            selected.retain(|book| book.is_hot);
            selected.sort_by(by_popularity_desc);
        }
        BookCategory::Bestsellers => {
            selected.sort_by_key(|book| book.sales_rank.unwrap_or(MISSING_SALES_RANK));
        }
        BookCategory::NewReleases => {
            selected.retain(|book| is_recent(book, current_year));
            selected.sort_by(|a, b| b.published_year.unwrap_or(0).cmp(&a.published_year.unwrap_or(0)));
        }
        BookCategory::LeMonde100 | BookCategory::Century21Top100 => {
            selected.sort_by(by_popularity_desc);
        }
        BookCategory::ManBooker | BookCategory::HoushangGolshiri => {
            selected.retain(|book| !book.awards.is_empty());
            selected.sort_by(by_popularity_desc);
        }
        BookCategory::BestChildrenBooks => {
            selected.retain(|book| is_for_children(book));
            selected.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        }
    }

    if let Some(limit) = limit {
        selected.truncate(limit);
    }

    selected.into_iter().cloned().collect()
}

/// آمار کتاب‌های یک ردیف
///
/// ردیف خالی آمار صفر داره.
#[must_use]
pub fn category_stats(books: &[Book], category: BookCategory, current_year: i64) -> CategoryStats {
    let selected = books_for_category(books, category, None, current_year);
    if selected.is_empty() {
        return CategoryStats::default();
    }

    let total_books = selected.len();
    let rating_sum: f64 = selected.iter().map(|book| book.rating).sum();
    let min = selected.iter().map(|book| book.price).fold(f64::INFINITY, f64::min);
    let max = selected.iter().map(|book| book.price).fold(f64::NEG_INFINITY, f64::max);

    CategoryStats {
        total_books,
        average_rating: rating_sum / total_books as f64,
        total_reviews: selected.iter().map(|book| book.review_count).sum(),
        available_books: selected.iter().filter(|book| book.available).count(),
        price_range: PriceRange { min, max },
    }
}

/// دسته‌هایی که این کتاب میتونه توشون باشه
#[must_use]
pub fn recommended_categories(book: &Book, current_year: i64) -> Vec<BookCategory> {
    let mut recommendations = Vec::new();

    if book.is_hot || book.popularity > 90 {
        recommendations.push(BookCategory::HotBooks);
    }

    if book.sales_rank.is_some_and(|rank| rank > 0 && rank <= 50) {
        recommendations.push(BookCategory::Bestsellers);
    }

    if is_recent(book, current_year) {
        recommendations.push(BookCategory::NewReleases);
    }

    if is_for_children(book) {
        recommendations.push(BookCategory::BestChildrenBooks);
    }

    let has_award = |needle: &str| {
        book.awards
            .iter()
            .any(|award| award.to_lowercase().contains(needle))
    };
    if has_award("booker") {
        recommendations.push(BookCategory::ManBooker);
    }
    if has_award("golshiri") {
        recommendations.push(BookCategory::HoushangGolshiri);
    }

    recommendations
}

fn matches_query(book: &Book, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(&book.title)
        || contains(&book.author)
        || book.tags.iter().any(|tag| contains(tag))
        || contains(&book.description)
        || contains(&book.genre)
        || book.awards.iter().any(|award| contains(award))
}

/// جستجو در کتاب‌های هر ردیف
///
/// فقط ردیف‌هایی که نتیجه دارن برمیگردن. بدون `categories` همه ردیف‌ها جستجو میشن.
#[must_use]
pub fn search_books_in_categories(
    books: &[Book],
    query: &str,
    categories: Option<&[BookCategory]>,
    current_year: i64,
) -> Vec<CategoryMatches> {
    let query = query.to_lowercase();
    let categories = categories.unwrap_or(&BookCategory::ALL);

    categories
        .iter()
        .filter_map(|&category| {
            let matching: Vec<Book> = books_for_category(books, category, None, current_year)
                .into_iter()
                .filter(|book| matches_query(book, &query))
                .collect();

            (!matching.is_empty()).then_some(CategoryMatches {
                category,
                books: matching,
            })
        })
        .collect()
}
