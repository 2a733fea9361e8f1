//! # Ketabkhaneh - کتابخانه
//!
//! سرویس کاتالوگ یک کتاب‌فروشی آنلاین فارسی: جستجو و فیلتر کتاب‌ها،
//! ردیف‌های صفحه اصلی، قیمت‌گذاری به تومان و پیش‌فاکتور سبد خرید.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه
//! ├── main.rs         # خط فرمان (serve / migrate / seed / reprice)
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── database/       # اتصال، repository و داده نمونه
//! ├── models/         # مدل‌های داده و DTO‌ها
//! ├── services/       # منطق کسب‌وکار
//! ├── api/            # لایه HTTP
//! └── utils/          # توابع کمکی
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use ketabkhaneh::{config::Config, database::Database};
//!
//! #[tokio::main]
//! async fn main() -> ketabkhaneh::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     db.migrate().await?;
//!     Ok(())
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

pub use error::{AppError, Result};

/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
///
/// ```rust
/// use ketabkhaneh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::Database;
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::{AppState, BookService, CartService, PricingService};
}
