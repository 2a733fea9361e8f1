//! # HTTP Handlers
//!
//! در axum، هر handler یک async function هست که extractor‌ها رو میگیره
//! و هر چیزی که `IntoResponse` باشه برمیگردونه.

pub mod books;
pub mod cart;
pub mod catalog;
pub mod categories;
pub mod health;
