//! Spend summary handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::parse_param;
use crate::{today, AppError, AppState};
use renew_core::{
    spend::{spend_by_category, CategorySpend},
    summarize, MonthRef, SpendMode, SpendSummary,
};

/// Query params for the spend summary
#[derive(Debug, Deserialize)]
pub struct SpendQuery {
    pub mode: Option<String>,
    pub year: Option<i32>,
    /// 1-12, requires `year`
    pub month: Option<u32>,
}

/// GET /api/spend - Monthly and yearly totals
pub async fn get_spend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpendQuery>,
) -> Result<Json<SpendSummary>, AppError> {
    let mode: SpendMode = parse_param(query.mode.as_deref())?.unwrap_or(state.config.spend_mode);

    let month = match (query.year, query.month) {
        (None, None) => MonthRef::from_date(today()),
        (Some(year), Some(month)) => MonthRef::from_number(year, month)
            .ok_or_else(|| AppError::bad_request("Month must be between 1 and 12"))?,
        _ => return Err(AppError::bad_request("year and month must be given together")),
    };

    let subscriptions = state.subscriptions.read().await;
    Ok(Json(summarize(&subscriptions, month, mode)))
}

/// GET /api/spend/categories - Spend breakdown by category
pub async fn get_spend_by_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategorySpend>>, AppError> {
    let subscriptions = state.subscriptions.read().await;
    Ok(Json(spend_by_category(&subscriptions)))
}
