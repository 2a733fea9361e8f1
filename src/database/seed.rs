//! داده نمونه کاتالوگ
//!
//! ده کتاب نمونه با برچسب‌ها، جوایز و دسته‌بندی‌هاشون درج میشن.
//! تصمیم‌های تصادفی (جایزه‌ها) از یک RNG تزریق شده میان تا تست‌ها قطعی باشن.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::Database;
use crate::error::Result;
use crate::models::BookCategory;

/// برچسب‌های نمونه
pub const SAMPLE_TAGS: [&str; 15] = [
    "fiction",
    "non-fiction",
    "classic",
    "children",
    "fantasy",
    "romance",
    "mystery",
    "thriller",
    "science-fiction",
    "biography",
    "history",
    "science",
    "self-help",
    "award-winning",
    "poetry",
];

pub const MAN_BOOKER_AWARD: &str = "Man Booker Prize";
pub const GOLSHIRI_AWARD: &str = "Houshang Golshiri Award";

/// جوایز نمونه
pub const SAMPLE_AWARDS: [&str; 6] = [
    MAN_BOOKER_AWARD,
    "Pulitzer Prize",
    "Nobel Prize in Literature",
    GOLSHIRI_AWARD,
    "National Book Award",
    "Hugo Award",
];

/// یک کتاب نمونه
#[derive(Debug, Clone, Copy)]
pub struct SampleBook {
    pub title: &'static str,
    pub author: &'static str,
    pub year: i64,
    pub genre: &'static str,
    pub original_language: &'static str,
    pub translator: Option<&'static str>,
    pub summary: &'static str,
    pub publisher: &'static str,
    pub pages: i64,
    pub isbn: &'static str,
    pub price: f64,
    pub cover_image: &'static str,
    pub rating: f64,
    pub review_count: i64,
    pub popularity: i64,
    pub sales_rank: i64,
    pub is_hot: bool,
    pub is_new: bool,
}

pub const SAMPLE_BOOKS: [SampleBook; 10] = [
    SampleBook {
        title: "The Alchemist",
        author: "Paulo Coelho",
        year: 1988,
        genre: "Fiction",
        original_language: "Portuguese",
        translator: Some("Alan R. Clarke"),
        summary: "A classic novel about following your dreams and listening to your heart.",
        publisher: "HarperOne",
        pages: 197,
        isbn: "978-0062315007",
        price: 150_000.0,
        cover_image: "/images/books/alchemist.jpg",
        rating: 4.7,
        review_count: 120,
        popularity: 95,
        sales_rank: 1,
        is_hot: true,
        is_new: false,
    },
    SampleBook {
        title: "To Kill a Mockingbird",
        author: "Harper Lee",
        year: 1960,
        genre: "Fiction",
        original_language: "English",
        translator: None,
        summary: "A novel about racial injustice and the loss of innocence in the American South.",
        publisher: "J.B. Lippincott & Co.",
        pages: 281,
        isbn: "978-0446310789",
        price: 180_000.0,
        cover_image: "/images/books/mockingbird.jpg",
        rating: 4.9,
        review_count: 150,
        popularity: 92,
        sales_rank: 3,
        is_hot: true,
        is_new: false,
    },
    SampleBook {
        title: "Harry Potter and the Philosopher's Stone",
        author: "J.K. Rowling",
        year: 1997,
        genre: "Fantasy",
        original_language: "English",
        translator: None,
        summary: "The first book in the Harry Potter series, introducing a young wizard and his adventures at Hogwarts School of Witchcraft and Wizardry.",
        publisher: "Bloomsbury",
        pages: 223,
        isbn: "978-0747532743",
        price: 200_000.0,
        cover_image: "/images/books/harry-potter.jpg",
        rating: 4.8,
        review_count: 200,
        popularity: 98,
        sales_rank: 2,
        is_hot: true,
        is_new: false,
    },
    SampleBook {
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        year: 1925,
        genre: "Fiction",
        original_language: "English",
        translator: None,
        summary: "A novel depicting the social and moral values of 1920s America.",
        publisher: "Charles Scribner's Sons",
        pages: 180,
        isbn: "978-0743273565",
        price: 120_000.0,
        cover_image: "/images/books/great-gatsby.jpg",
        rating: 4.5,
        review_count: 90,
        popularity: 85,
        sales_rank: 10,
        is_hot: false,
        is_new: false,
    },
    SampleBook {
        title: "The Little Prince",
        author: "Antoine de Saint-Exupéry",
        year: 1943,
        genre: "Children",
        original_language: "French",
        translator: Some("Katherine Woods"),
        summary: "A poetic tale about a young prince who visits various planets in space, including Earth.",
        publisher: "Reynal & Hitchcock",
        pages: 96,
        isbn: "978-0156012195",
        price: 90_000.0,
        cover_image: "/images/books/little-prince.jpg",
        rating: 4.9,
        review_count: 180,
        popularity: 90,
        sales_rank: 5,
        is_hot: true,
        is_new: false,
    },
    SampleBook {
        title: "Atomic Habits",
        author: "James Clear",
        year: 2018,
        genre: "Self-Help",
        original_language: "English",
        translator: None,
        summary: "A guide to building good habits and breaking bad ones.",
        publisher: "Avery",
        pages: 320,
        isbn: "978-0735211292",
        price: 220_000.0,
        cover_image: "/images/books/atomic-habits.jpg",
        rating: 4.8,
        review_count: 110,
        popularity: 96,
        sales_rank: 4,
        is_hot: true,
        is_new: true,
    },
    SampleBook {
        title: "The Kite Runner",
        author: "Khaled Hosseini",
        year: 2003,
        genre: "Fiction",
        original_language: "English",
        translator: None,
        summary: "A novel about friendship, betrayal, and redemption set against the backdrop of Afghanistan's history.",
        publisher: "Riverhead Books",
        pages: 371,
        isbn: "978-1594631931",
        price: 170_000.0,
        cover_image: "/images/books/kite-runner.jpg",
        rating: 4.7,
        review_count: 130,
        popularity: 88,
        sales_rank: 8,
        is_hot: false,
        is_new: false,
    },
    SampleBook {
        title: "Pride and Prejudice",
        author: "Jane Austen",
        year: 1813,
        genre: "Fiction",
        original_language: "English",
        translator: None,
        summary: "A romantic novel about the importance of marrying for love rather than social advancement.",
        publisher: "T. Egerton",
        pages: 432,
        isbn: "978-0141439518",
        price: 130_000.0,
        cover_image: "/images/books/pride-prejudice.jpg",
        rating: 4.6,
        review_count: 100,
        popularity: 80,
        sales_rank: 15,
        is_hot: false,
        is_new: false,
    },
    SampleBook {
        title: "The Hunger Games",
        author: "Suzanne Collins",
        year: 2008,
        genre: "Science Fiction",
        original_language: "English",
        translator: None,
        summary: "A dystopian novel where teenagers must fight to the death in a televised battle.",
        publisher: "Scholastic Press",
        pages: 374,
        isbn: "978-0439023481",
        price: 160_000.0,
        cover_image: "/images/books/hunger-games.jpg",
        rating: 4.5,
        review_count: 140,
        popularity: 87,
        sales_rank: 9,
        is_hot: false,
        is_new: false,
    },
    SampleBook {
        title: "Rich Dad Poor Dad",
        author: "Robert T. Kiyosaki",
        year: 1997,
        genre: "Personal Finance",
        original_language: "English",
        translator: None,
        summary: "A book advocating financial independence through investing, real estate, and starting businesses.",
        publisher: "Warner Books",
        pages: 207,
        isbn: "978-1612680194",
        price: 190_000.0,
        cover_image: "/images/books/rich-dad.jpg",
        rating: 4.6,
        review_count: 95,
        popularity: 89,
        sales_rank: 7,
        is_hot: true,
        is_new: false,
    },
];

/// دسته‌بندی‌ها، برچسب‌ها و جوایزی که به یک کتاب نمونه میرسه
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAssignment {
    pub categories: Vec<BookCategory>,
    pub tags: Vec<&'static str>,
    /// نام جایزه و سال دریافت
    pub awards: Vec<(&'static str, i64)>,
}

/// قواعد تخصیص دسته‌بندی، برچسب و جایزه
///
/// حدود ۳۰٪ کتاب‌ها به صورت تصادفی من بوکر یا گلشیری میگیرن.
pub fn assign<R: Rng + ?Sized>(book: &SampleBook, rng: &mut R) -> BookAssignment {
    let mut categories = Vec::new();

    if book.is_hot {
        categories.push(BookCategory::HotBooks);
    }
    if book.sales_rank <= 5 {
        categories.push(BookCategory::Bestsellers);
    }
    if book.is_new {
        categories.push(BookCategory::NewReleases);
    }
    if book.genre == "Children" {
        categories.push(BookCategory::BestChildrenBooks);
    }
    if book.year < 2000 && book.rating > 4.5 {
        categories.push(BookCategory::LeMonde100);
    }
    if book.year >= 2000 && book.rating > 4.5 {
        categories.push(BookCategory::Century21Top100);
    }

    let mut awards = Vec::new();
    if rng.gen_bool(0.3) {
        if rng.gen_bool(0.5) {
            categories.push(BookCategory::ManBooker);
            awards.push((MAN_BOOKER_AWARD, book.year + 1));
        } else {
            categories.push(BookCategory::HoushangGolshiri);
            awards.push((GOLSHIRI_AWARD, book.year + 2));
        }
    }

    let mut tags = Vec::new();
    if matches!(book.genre, "Fiction" | "Fantasy" | "Science Fiction") {
        tags.push("fiction");
    } else {
        tags.push("non-fiction");
    }
    match book.genre {
        "Children" => tags.push("children"),
        "Fantasy" => tags.push("fantasy"),
        "Science Fiction" => tags.push("science-fiction"),
        "Self-Help" => tags.push("self-help"),
        _ => {}
    }
    if book.year < 1950 {
        tags.push("classic");
    }
    if book.rating > 4.7 {
        tags.push("award-winning");
    }

    BookAssignment {
        categories,
        tags,
        awards,
    }
}

/// نتیجه درج داده نمونه
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub books_inserted: usize,
    pub books_skipped: usize,
}

/// درج کاتالوگ نمونه
///
/// با `reset` همه کتاب‌ها، برچسب‌ها و جوایز قبل از درج پاک میشن.
/// کتابی که ISBN‌اش از قبل هست دوباره درج نمیشه.
#[instrument(skip(db, rng))]
pub async fn seed_catalog<R: Rng + ?Sized>(
    db: &Database,
    rng: &mut R,
    reset: bool,
) -> Result<SeedReport> {
    // تصمیم‌های تصادفی قبل از شروع تراکنش گرفته میشن
    let plan: Vec<(SampleBook, BookAssignment)> = SAMPLE_BOOKS
        .iter()
        .map(|book| (*book, assign(book, rng)))
        .collect();

    let mut tx = db.begin().await?;

    if reset {
        for table in ["book_awards", "book_tags", "book_categories", "books", "tags", "awards"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('books', 'tags', 'awards')")
            .execute(&mut *tx)
            .await?;
        info!("Catalog reset");
    }

    for tag in SAMPLE_TAGS {
        sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
            .bind(tag)
            .execute(&mut *tx)
            .await?;
    }

    for award in SAMPLE_AWARDS {
        sqlx::query("INSERT OR IGNORE INTO awards (name) VALUES (?)")
            .bind(award)
            .execute(&mut *tx)
            .await?;
    }

    let mut report = SeedReport::default();

    for (book, assignment) in plan {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE isbn = ?")
            .bind(book.isbn)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            debug!(isbn = book.isbn, "Sample book already present");
            report.books_skipped += 1;
            continue;
        }

        let book_id = sqlx::query(
            r#"
            INSERT INTO books (
                title, author, year, genre, original_language, translator, summary,
                publisher, pages, isbn, price, cover_image, available, rating,
                review_count, popularity, sales_rank, is_hot, is_new
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(book.title)
        .bind(book.author)
        .bind(book.year)
        .bind(book.genre)
        .bind(book.original_language)
        .bind(book.translator)
        .bind(book.summary)
        .bind(book.publisher)
        .bind(book.pages)
        .bind(book.isbn)
        .bind(book.price)
        .bind(book.cover_image)
        .bind(book.rating)
        .bind(book.review_count)
        .bind(book.popularity)
        .bind(book.sales_rank)
        .bind(book.is_hot)
        .bind(book.is_new)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for category in &assignment.categories {
            sqlx::query(
                "INSERT OR IGNORE INTO book_categories (book_id, category_id) \
                 SELECT ?, id FROM categories WHERE name = ?",
            )
            .bind(book_id)
            .bind(category.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for tag in &assignment.tags {
            sqlx::query(
                "INSERT OR IGNORE INTO book_tags (book_id, tag_id) \
                 SELECT ?, id FROM tags WHERE name = ?",
            )
            .bind(book_id)
            .bind(*tag)
            .execute(&mut *tx)
            .await?;
        }

        for (award, year) in &assignment.awards {
            sqlx::query(
                "INSERT OR IGNORE INTO book_awards (book_id, award_id, year) \
                 SELECT ?, id, ? FROM awards WHERE name = ?",
            )
            .bind(book_id)
            .bind(*year)
            .bind(*award)
            .execute(&mut *tx)
            .await?;
        }

        report.books_inserted += 1;
    }

    tx.commit().await?;

    info!(
        inserted = report.books_inserted,
        skipped = report.books_skipped,
        "Sample catalog seeded"
    );

    Ok(report)
}
