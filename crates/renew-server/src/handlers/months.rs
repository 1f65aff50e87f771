//! Month view handler

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{parse_date, parse_param};
use crate::{today, AppError, AppState};
use renew_core::{
    group_by_date, subscriptions_for_month, summarize, DateBucket, MonthRef, SpendMode,
};

/// Query params for the month view
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// Reference date splitting past from upcoming (defaults to today)
    pub today: Option<String>,
    /// `average` or `occurrences`
    pub mode: Option<String>,
}

/// Billing dates of one month split around the reference date
#[derive(Debug, Serialize)]
pub struct MonthView {
    pub month: MonthRef,
    pub label: String,
    /// Ascending by date
    pub upcoming: Vec<DateBucket>,
    /// Descending by date
    pub past: Vec<DateBucket>,
    pub monthly_total: f64,
    pub yearly_total: f64,
    pub mode: SpendMode,
}

/// GET /api/months/:year/:month - Grouped billing dates and totals
pub async fn get_month(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthView>, AppError> {
    let month = MonthRef::from_number(year, month)
        .ok_or_else(|| AppError::bad_request("Month must be between 1 and 12"))?;
    let today = parse_date(query.today.as_deref(), "today")?.unwrap_or_else(today);
    let mode: SpendMode = parse_param(query.mode.as_deref())?.unwrap_or(state.config.spend_mode);

    let subscriptions = state.subscriptions.read().await;
    let occurrences = subscriptions_for_month(&subscriptions, month);
    let grouped = group_by_date(&occurrences, today);
    let totals = summarize(&subscriptions, month, mode);

    Ok(Json(MonthView {
        month,
        label: month.label(),
        upcoming: grouped.upcoming_buckets(),
        past: grouped.past_buckets(),
        monthly_total: totals.monthly_total,
        yearly_total: totals.yearly_total,
        mode,
    }))
}
