//! Upcoming charge forecast handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::parse_date;
use crate::{today, AppError, AppState, MAX_UPCOMING_DAYS};
use renew_core::UpcomingSummary;

/// Query params for the forecast
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    /// Window length in days (defaults to the configured window)
    pub days: Option<u32>,
    /// First day of the window (defaults to today)
    pub from: Option<String>,
}

/// GET /api/upcoming - Charges due in the next N days
pub async fn get_upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<UpcomingSummary>, AppError> {
    let days = query.days.unwrap_or(state.config.upcoming_days);
    if days > MAX_UPCOMING_DAYS {
        return Err(AppError::bad_request(&format!(
            "days must be at most {}",
            MAX_UPCOMING_DAYS
        )));
    }
    let from = parse_date(query.from.as_deref(), "from")?.unwrap_or_else(today);

    let subscriptions = state.subscriptions.read().await;
    Ok(Json(UpcomingSummary::build(&subscriptions, from, days)))
}
