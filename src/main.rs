//! # Ketabkhaneh - نقطه ورود برنامه
//!
//! زیرفرمان‌ها:
//! - `serve` (پیش‌فرض): اجرای سرور HTTP
//! - `migrate`: فقط اجرای migration‌ها
//! - `seed [--reset]`: درج کاتالوگ نمونه
//! - `reprice [--seed N]`: قیمت‌گذاری مجدد همه کتاب‌ها به تومان

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ketabkhaneh::{
    api::router_with_state,
    config::{Config, Environment},
    database::{seed, BookRepository, Database},
    services::{
        spawn_rate_limiter_cleanup, AppState, PricingService, RATE_LIMITER_CLEANUP_INTERVAL,
    },
    utils,
};

/// سرویس کاتالوگ کتاب‌فروشی
#[derive(Parser)]
#[command(name = "ketabkhaneh")]
#[command(about = "Catalog API for a Persian-language online bookstore")]
#[command(version)]
struct Cli {
    /// آدرس دیتابیس (روی DATABASE_URL اولویت داره)
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// اجرای سرور HTTP
    Serve,
    /// اجرای migration‌ها
    Migrate,
    /// درج کاتالوگ نمونه
    Seed {
        /// پاک کردن کتاب‌ها، برچسب‌ها و جوایز قبل از درج
        #[arg(long)]
        reset: bool,
    },
    /// قیمت‌گذاری مجدد همه کتاب‌ها
    Reprice {
        /// seed ثابت برای تولید قیمت‌های تکرارپذیر
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // نبودن فایل .env اشکالی نداره
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    init_tracing(config.environment);

    let database = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    database
        .migrate()
        .await
        .context("Failed to apply migrations")?;
    info!("Database migrations applied");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(database, config).await?,
        Commands::Migrate => {}
        Commands::Seed { reset } => {
            let mut rng = StdRng::from_entropy();
            let report = seed::seed_catalog(&database, &mut rng, reset)
                .await
                .context("Failed to seed catalog")?;
            info!(
                inserted = report.books_inserted,
                skipped = report.books_skipped,
                "Seed finished"
            );
        }
        Commands::Reprice { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let pricing = PricingService::new(BookRepository::new(database));
            let report = pricing
                .reprice_all(&mut rng)
                .await
                .context("Failed to reprice catalog")?;

            let fmt_price = |p: Option<f64>| utils::format_toman(p.unwrap_or(0.0).floor());
            info!(
                updated = report.updated,
                min = %fmt_price(report.stats.min_price),
                max = %fmt_price(report.stats.max_price),
                average = %fmt_price(report.stats.avg_price),
                total = report.stats.total_books,
                "Price statistics"
            );
            for stat in &report.by_language {
                info!(
                    language = stat.original_language.as_deref().unwrap_or("-"),
                    average = %utils::format_toman(stat.avg_price.floor()),
                    count = stat.count,
                    "Price by language"
                );
            }
        }
    }

    Ok(())
}

/// اجرای سرور تا دریافت Ctrl+C
async fn serve(database: Database, config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address: {}", config.server_addr()))?;

    let state = AppState::new(database, config);
    let cleanup =
        spawn_rate_limiter_cleanup(state.rate_limiter.clone(), RATE_LIMITER_CLEANUP_INTERVAL);
    let app = router_with_state(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    cleanup.abort();
    Ok(())
}

/// راه‌اندازی tracing
///
/// در production خروجی JSON و در بقیه محیط‌ها خروجی خوانا.
/// `RUST_LOG` روی فیلتر پیش‌فرض اولویت داره.
fn init_tracing(environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ketabkhaneh=debug,tower_http=debug,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if environment.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .init();
    }
}
