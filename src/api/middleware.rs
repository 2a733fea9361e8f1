//! # Middleware
//!
//! Middleware‌های سفارشی برای پردازش request/response
//!
//! ## مفاهیم:
//! - **Middleware**: کد که قبل/بعد از handler اجرا میشه
//! - **from_fn**: ساخت middleware از یک async fn
//! - **Layer**: wrapper برای اضافه کردن middleware

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::extractors::{ClientIp, REQUEST_ID_HEADER};
use crate::{error::AppError, services::AppState};

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به هر request و response
///
/// اگه کلاینت خودش `X-Request-Id` فرستاده باشه همون استفاده میشه.
pub async fn request_id(mut request: Request, next: Next) -> impl IntoResponse {
    let header = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= 64)
        .cloned();

    let header = match header {
        Some(value) => value,
        None => match HeaderValue::from_str(&nanoid::nanoid!(12)) {
            Ok(value) => value,
            Err(_) => return next.run(request).await,
        },
    };

    request.headers_mut().insert(REQUEST_ID_HEADER, header.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, header);
    response
}

// =====================================
// Rate Limiting
// =====================================
/// محدودیت نرخ درخواست به ازای IP کلاینت
///
/// # استفاده:
/// ```rust,ignore
/// let api = Router::new()
///     .route("/books", get(handler))
///     .route_layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit));
/// ```
pub async fn rate_limit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.rate_limiter.check_key(&ip).is_err() {
        warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

// =====================================
// Security Headers Middleware
// =====================================
/// اضافه کردن header‌های امنیتی
pub async fn security_headers(request: Request, next: Next) -> impl IntoResponse {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // جلوگیری از MIME sniffing
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));

    // جلوگیری از clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
