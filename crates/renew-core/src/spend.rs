//! Spend aggregation
//!
//! Normalizes prices of different cadences onto a common monthly or yearly
//! basis and sums them. Two monthly views exist:
//! - **Average**: sum of monthly equivalents (a flat month-average)
//! - **Occurrences**: sum of prices of charges that actually land in a month
//!
//! Yearly totals always use annualized equivalents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::calendar::MonthRef;
use crate::models::{BillingCycle, CustomUnit, Subscription};
use crate::recurrence::{subscriptions_for_month, Occurrence};

/// Average weeks per month
pub const WEEKS_PER_MONTH: f64 = 52.0 / 12.0;

/// Average days per month
pub const DAYS_PER_MONTH: f64 = 365.0 / 12.0;

/// Cost of one subscription per average month.
///
/// A custom cadence without a period is treated as already monthly.
pub fn monthly_equivalent(subscription: &Subscription) -> f64 {
    let price = subscription.price;
    match subscription.billing_cycle {
        BillingCycle::Weekly => price * WEEKS_PER_MONTH,
        BillingCycle::Monthly => price,
        BillingCycle::Quarterly => price / 3.0,
        BillingCycle::Yearly => price / 12.0,
        BillingCycle::Custom(Some(period)) => {
            let n = period.every.get() as f64;
            match period.unit {
                CustomUnit::Day => price * (DAYS_PER_MONTH / n),
                CustomUnit::Week => price * (WEEKS_PER_MONTH / n),
                CustomUnit::Month => price / n,
                CustomUnit::Year => price / (12.0 * n),
            }
        }
        BillingCycle::Custom(None) => price,
    }
}

/// Cost of one subscription per year.
///
/// A custom cadence without a period is treated as already yearly.
pub fn yearly_equivalent(subscription: &Subscription) -> f64 {
    let price = subscription.price;
    match subscription.billing_cycle {
        BillingCycle::Weekly => price * 52.0,
        BillingCycle::Monthly => price * 12.0,
        BillingCycle::Quarterly => price * 4.0,
        BillingCycle::Yearly => price,
        BillingCycle::Custom(Some(period)) => {
            let n = period.every.get() as f64;
            match period.unit {
                CustomUnit::Day => price * 365.0 / n,
                CustomUnit::Week => price * 52.0 / n,
                CustomUnit::Month => price * 12.0 / n,
                CustomUnit::Year => price / n,
            }
        }
        BillingCycle::Custom(None) => price,
    }
}

/// Round to cents, halves away from zero.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Sum of monthly equivalents over active subscriptions, in cents precision.
pub fn total_monthly(subscriptions: &[Subscription]) -> f64 {
    round_currency(
        subscriptions
            .iter()
            .filter(|s| s.is_active)
            .map(monthly_equivalent)
            .sum(),
    )
}

/// Sum of yearly equivalents over active subscriptions, in cents precision.
pub fn total_yearly(subscriptions: &[Subscription]) -> f64 {
    round_currency(
        subscriptions
            .iter()
            .filter(|s| s.is_active)
            .map(yearly_equivalent)
            .sum(),
    )
}

/// Sum of full prices for every occurrence, in cents precision.
pub fn month_occurrence_total(occurrences: &[Occurrence<'_>]) -> f64 {
    round_currency(occurrences.iter().map(|o| o.subscription.price).sum())
}

/// How the monthly total is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendMode {
    /// Monthly equivalents of every active subscription
    #[default]
    Average,
    /// Prices of charges landing in the selected month
    Occurrences,
}

impl SpendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Occurrences => "occurrences",
        }
    }
}

impl std::str::FromStr for SpendMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" => Ok(Self::Average),
            "occurrences" => Ok(Self::Occurrences),
            _ => Err(format!(
                "Unknown spend mode: {} (valid: average, occurrences)",
                s
            )),
        }
    }
}

impl std::fmt::Display for SpendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monthly and yearly totals for a selected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendSummary {
    pub month: MonthRef,
    pub mode: SpendMode,
    pub monthly_total: f64,
    pub yearly_total: f64,
    pub active_count: usize,
}

/// Compute the summary header figures for `month`.
pub fn summarize(subscriptions: &[Subscription], month: MonthRef, mode: SpendMode) -> SpendSummary {
    let monthly_total = match mode {
        SpendMode::Average => total_monthly(subscriptions),
        SpendMode::Occurrences => {
            month_occurrence_total(&subscriptions_for_month(subscriptions, month))
        }
    };

    SpendSummary {
        month,
        mode,
        monthly_total,
        yearly_total: total_yearly(subscriptions),
        active_count: subscriptions.iter().filter(|s| s.is_active).count(),
    }
}

/// Spend attributed to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub monthly: f64,
    pub yearly: f64,
    /// Share of the total monthly spend, 0-100
    pub percentage: f64,
    pub count: usize,
}

/// Break active spend down by category, largest first.
///
/// Blank categories are reported as "Uncategorized".
pub fn spend_by_category(subscriptions: &[Subscription]) -> Vec<CategorySpend> {
    let mut by_category: HashMap<String, (f64, f64, usize)> = HashMap::new();

    for sub in subscriptions.iter().filter(|s| s.is_active) {
        let name = match sub.category.trim() {
            "" => "Uncategorized".to_string(),
            other => other.to_string(),
        };
        let entry = by_category.entry(name).or_insert((0.0, 0.0, 0));
        entry.0 += monthly_equivalent(sub);
        entry.1 += yearly_equivalent(sub);
        entry.2 += 1;
    }

    let total: f64 = by_category.values().map(|(monthly, _, _)| monthly).sum();

    let mut categories: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(category, (monthly, yearly, count))| CategorySpend {
            category,
            monthly: round_currency(monthly),
            yearly: round_currency(yearly),
            percentage: if total > 0.0 {
                round_currency(monthly / total * 100.0)
            } else {
                0.0
            },
            count,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.monthly
            .partial_cmp(&a.monthly)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    categories
}
