//! Subscription list handlers

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{parse_date, parse_param, split_list};
use crate::{today, AppError, AppState};
use renew_core::{
    monthly_equivalent, next_billing_date, sort_subscriptions, spend::round_currency,
    yearly_equivalent, CycleKind, SortKey, StatusFilter, Subscription, SubscriptionFilter,
};

/// Query params for listing subscriptions
#[derive(Debug, Deserialize)]
pub struct ListSubscriptionsQuery {
    /// Sort key, e.g. `price-desc`
    pub sort: Option<String>,
    /// `all`, `active` or `cancelled`
    pub status: Option<String>,
    /// Comma-separated categories
    pub category: Option<String>,
    /// Comma-separated cadence kinds
    pub cycle: Option<String>,
    /// Case-insensitive name search
    pub q: Option<String>,
    /// Reference date for `next_billing` (defaults to today)
    pub today: Option<String>,
}

/// Subscription with derived cost and schedule fields
#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub cycle_label: String,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub next_billing: Option<NaiveDate>,
}

impl SubscriptionView {
    fn new(subscription: &Subscription, today: NaiveDate) -> Self {
        Self {
            cycle_label: subscription.billing_cycle.label(),
            monthly_cost: round_currency(monthly_equivalent(subscription)),
            yearly_cost: round_currency(yearly_equivalent(subscription)),
            next_billing: next_billing_date(subscription, today),
            subscription: subscription.clone(),
        }
    }
}

/// GET /api/subscriptions - Filtered and sorted subscription list
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> Result<Json<Vec<SubscriptionView>>, AppError> {
    let sort: SortKey = parse_param(query.sort.as_deref())?.unwrap_or(state.config.sort);
    let status: StatusFilter = parse_param(query.status.as_deref())?.unwrap_or_default();
    let today = parse_date(query.today.as_deref(), "today")?.unwrap_or_else(today);

    let cycles: HashSet<CycleKind> = split_list(query.cycle.as_deref())
        .into_iter()
        .map(|c| c.parse::<CycleKind>().map_err(|e| AppError::bad_request(&e)))
        .collect::<Result<_, AppError>>()?;

    let filter = SubscriptionFilter {
        query: query.q,
        status,
        categories: split_list(query.category.as_deref())
            .into_iter()
            .map(String::from)
            .collect(),
        cycles,
    };

    let subscriptions = state.subscriptions.read().await;
    let mut matched = filter.apply(&subscriptions);
    sort_subscriptions(&mut matched, sort);

    Ok(Json(
        matched
            .into_iter()
            .map(|s| SubscriptionView::new(s, today))
            .collect(),
    ))
}

/// GET /api/subscriptions/:id - Single subscription
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionView>, AppError> {
    let subscriptions = state.subscriptions.read().await;
    let subscription = subscriptions
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::not_found("Subscription not found"))?;

    Ok(Json(SubscriptionView::new(subscription, today())))
}

/// Response for reloading from the store
#[derive(Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub count: usize,
}

/// POST /api/subscriptions/reload - Re-read the backing store
pub async fn reload_subscriptions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, AppError> {
    let store = state
        .store
        .as_ref()
        .ok_or_else(|| AppError::bad_request("Server is not backed by a store"))?;

    let loaded = store.load()?;
    let count = loaded.len();
    *state.subscriptions.write().await = loaded;

    info!(count, "Reloaded subscriptions");
    Ok(Json(ReloadResponse {
        success: true,
        count,
    }))
}
