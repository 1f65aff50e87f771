//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod months;
pub mod spend;
pub mod subscriptions;
pub mod upcoming;

// Re-export all handlers for use in router
pub use months::*;
pub use spend::*;
pub use subscriptions::*;
pub use upcoming::*;

use std::str::FromStr;

use axum::Json;
use chrono::NaiveDate;

use crate::AppError;

/// GET /api/health - Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::not_found("Not found")
}

/// Parse an optional `YYYY-MM-DD` query value
pub(crate) fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::bad_request(&format!("Invalid {}: expected YYYY-MM-DD", field))
            }),
    }
}

/// Parse an optional enum-like query value through its `FromStr`
pub(crate) fn parse_param<T>(raw: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = String>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e: String| AppError::bad_request(&e)),
    }
}

/// Split a comma-separated query value, dropping empty items
pub(crate) fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
