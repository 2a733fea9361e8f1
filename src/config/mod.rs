//! # ماژول تنظیمات (Configuration)
//!
//! تنظیمات سرویس کاتالوگ از سه لایه ساخته میشه:
//! مقادیر پیش‌فرض، فایل `.env` (با `dotenvy` در `main`) و متغیرهای محیطی.
//!
//! ## مفاهیم Rust:
//! - **config crate**: ترکیب چند منبع تنظیمات
//! - **Default Trait**: مقادیر پیش‌فرض
//! - **Builder Pattern**: ساخت تدریجی آبجکت (برای تست‌ها)

use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use ketabkhaneh::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.default_page_size, 12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// تعداد درخواست مجاز در ثانیه برای هر کلاینت
    pub rate_limit_per_second: u32,

    /// حداکثر burst در rate limiting
    pub rate_limit_burst: u32,

    /// IP کلاینت از `X-Forwarded-For` / `X-Real-IP` خونده بشه؟
    ///
    /// فقط پشت reverse proxy مطمئن روشن بشه.
    pub trust_proxy_headers: bool,

    /// تعداد کتاب در هر صفحه وقتی `limit` نیومده
    pub default_page_size: u32,

    /// سقف `limit` در جستجو
    pub max_page_size: u32,

    /// حداکثر زمان پردازش یک درخواست (ثانیه)
    pub request_timeout_secs: u64,

    /// محیط اجرا (development, production)
    pub environment: Environment,
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// محیط توسعه - لاگ خوانا
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید - لاگ JSON
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: "sqlite://data/books.db?mode=rwc".to_string(),
            rate_limit_per_second: 10,
            rate_limit_burst: 30,
            trust_proxy_headers: false,
            default_page_size: 12,
            max_page_size: 100,
            request_timeout_secs: 30,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// ساخت تنظیمات از متغیرهای محیطی
    ///
    /// متغیرها: `HOST`, `PORT`, `DATABASE_URL`, `ENVIRONMENT`,
    /// `RATE_LIMIT_PER_SECOND`, `RATE_LIMIT_BURST`, `TRUST_PROXY_HEADERS`, `DEFAULT_PAGE_SIZE`,
    /// `MAX_PAGE_SIZE`, `REQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه مقدار یک متغیر عددی قابل parse نباشه
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        // اول پیش‌فرض‌ها، بعد محیط روی اون‌ها override میشه
        let settings = ::config::Config::builder()
            .set_default("host", defaults.host.clone())?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url.clone())?
            .set_default("environment", "development")?
            .set_default("rate_limit_per_second", i64::from(defaults.rate_limit_per_second))?
            .set_default("rate_limit_burst", i64::from(defaults.rate_limit_burst))?
            .set_default("trust_proxy_headers", defaults.trust_proxy_headers)?
            .set_default("default_page_size", i64::from(defaults.default_page_size))?
            .set_default("max_page_size", i64::from(defaults.max_page_size))?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .add_source(::config::Environment::default().try_parsing(true))
            .build()?;

        let config = Self {
            host: settings.get_string("host")?,
            port: to_number(&settings, "port")?,
            database_url: settings.get_string("database_url")?,
            rate_limit_per_second: to_number(&settings, "rate_limit_per_second")?,
            rate_limit_burst: to_number(&settings, "rate_limit_burst")?,
            trust_proxy_headers: settings.get_bool("trust_proxy_headers")?,
            default_page_size: to_number(&settings, "default_page_size")?,
            max_page_size: to_number(&settings, "max_page_size")?,
            request_timeout_secs: to_number(&settings, "request_timeout_secs")?,
            environment: settings.get_string("environment")?.into(),
        };

        config.validate()?;
        Ok(config)
    }

    /// اعتبارسنجی تنظیمات
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.rate_limit_per_second == 0 || self.rate_limit_burst == 0 {
            return Err(AppError::Config(
                "RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be positive".to_string()
            ));
        }

        if self.max_page_size == 0 {
            return Err(AppError::Config("MAX_PAGE_SIZE cannot be 0".to_string()));
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(AppError::Config(format!(
                "DEFAULT_PAGE_SIZE must be between 1 and {}",
                self.max_page_size
            )));
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// خوندن یک مقدار عددی و تبدیل امن به نوع مقصد
fn to_number<T: TryFrom<i64>>(settings: &::config::Config, key: &str) -> Result<T> {
    let value = settings.get_int(key)?;
    T::try_from(value)
        .map_err(|_| AppError::Config(format!("{} is out of range: {}", key.to_uppercase(), value)))
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use ketabkhaneh::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .host("0.0.0.0")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// تنظیم پورت
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// تنظیم هاست
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// تنظیم database_url
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    /// تنظیم rate limit
    #[must_use]
    pub fn rate_limit(mut self, per_second: u32, burst: u32) -> Self {
        self.config.rate_limit_per_second = per_second;
        self.config.rate_limit_burst = burst;
        self
    }

    /// اعتماد به header‌های proxy برای IP کلاینت
    #[must_use]
    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.config.trust_proxy_headers = trust;
        self
    }

    /// تنظیم اندازه صفحه
    #[must_use]
    pub fn page_size(mut self, default_size: u32, max_size: u32) -> Self {
        self.config.default_page_size = default_size;
        self.config.max_page_size = max_size;
        self
    }

    /// تنظیم محیط
    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اعتبارسنجی fail بشه
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
