//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- Business logic (اینجا!)
//! ├─────────────────┤
//! │ Repository Layer│  <-- Data access
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```
//!
//! ## مفاهیم Rust:
//! - **Dependency Injection**: تزریق وابستگی‌ها
//! - **Arc<T>**: اشتراک امن بین threads

mod book_service;
mod cart_service;
pub mod categories;
pub mod pricing;

pub use book_service::*;
pub use cart_service::*;
pub use pricing::{PricingService, RepriceReport};

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    config::Config,
    database::{BookRepository, Database},
};

/// محدودکننده نرخ درخواست به ازای هر کلاینت
pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

/// ساخت rate limiter از تنظیمات
#[must_use]
pub fn build_rate_limiter(config: &Config) -> ClientRateLimiter {
    let per_second = NonZeroU32::new(config.rate_limit_per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(config.rate_limit_burst).unwrap_or(NonZeroU32::MIN);

    RateLimiter::keyed(Quota::per_second(per_second).allow_burst(burst))
}

/// فاصله پاکسازی کلاینت‌های قدیمی از rate limiter
pub const RATE_LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// حذف کلیدهایی که سهمیه‌شون کامل پر شده
///
/// بدون این کار map کلیدها با هر IP جدید بزرگ‌تر میشه.
pub fn prune_rate_limiter(limiter: &ClientRateLimiter) {
    let before = limiter.len();
    limiter.retain_recent();
    limiter.shrink_to_fit();
    debug!(before, after = limiter.len(), "Rate limiter pruned");
}

/// اجرای دوره‌ای `prune_rate_limiter` در پس‌زمینه
pub fn spawn_rate_limiter_cleanup(
    limiter: Arc<ClientRateLimiter>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // تیک اول فوری هست
        interval.tick().await;
        loop {
            interval.tick().await;
            prune_rate_limiter(&limiter);
        }
    })
}

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// clone کردنش فقط `Arc`‌ها رو clone میکنه، نه داده رو.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// برای health check
    pub db: Database,

    pub book_service: Arc<BookService>,

    pub cart_service: Arc<CartService>,

    pub rate_limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    /// ساخت AppState جدید
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        let config = Arc::new(config);
        let repo = BookRepository::new(db.clone());

        let book_service = Arc::new(BookService::new(repo.clone(), config.clone()));
        let cart_service = Arc::new(CartService::new(repo));
        let rate_limiter = Arc::new(build_rate_limiter(&config));

        Self {
            config,
            db,
            book_service,
            cart_service,
            rate_limiter,
        }
    }

    /// دسترسی به config
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
