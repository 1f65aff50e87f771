//! Subscription list helpers: cadence labels, filtering and sorting

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BillingCycle, CycleKind, Subscription};

impl BillingCycle {
    /// Display label for the cadence, e.g. "Monthly" or "3 weeks".
    pub fn label(&self) -> String {
        match self {
            Self::Weekly => "Weekly".to_string(),
            Self::Monthly => "Monthly".to_string(),
            Self::Quarterly => "Quarterly".to_string(),
            Self::Yearly => "Yearly".to_string(),
            Self::Custom(Some(period)) => {
                let n = period.every.get();
                let plural = if n > 1 { "s" } else { "" };
                format!("{} {}{}", n, period.unit.as_str(), plural)
            }
            Self::Custom(None) => "Custom".to_string(),
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Active/cancelled filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Cancelled,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        match self {
            Self::All => true,
            Self::Active => subscription.is_active,
            Self::Cancelled => !subscription.is_active,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "cancelled" | "canceled" | "inactive" => Ok(Self::Cancelled),
            _ => Err(format!(
                "Unknown status: {} (valid: all, active, cancelled)",
                s
            )),
        }
    }
}

/// Criteria for narrowing the subscription list
///
/// Empty category and cycle sets match everything.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    /// Case-insensitive substring of the name
    pub query: Option<String>,
    pub status: StatusFilter,
    pub categories: HashSet<String>,
    pub cycles: HashSet<CycleKind>,
}

impl SubscriptionFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if let Some(query) = self.query.as_deref() {
            let query = query.trim().to_lowercase();
            if !query.is_empty() && !subscription.name.to_lowercase().contains(&query) {
                return false;
            }
        }
        if !self.status.matches(subscription) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&subscription.category) {
            return false;
        }
        if !self.cycles.is_empty() && !self.cycles.contains(&subscription.billing_cycle.kind()) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, subscriptions: &'a [Subscription]) -> Vec<&'a Subscription> {
        subscriptions.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Subscription list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[default]
    #[serde(rename = "nextbill-asc")]
    NextBillAsc,
    #[serde(rename = "nextbill-desc")]
    NextBillDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NextBillAsc => "nextbill-asc",
            Self::NextBillDesc => "nextbill-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NameAsc => "Name (A-Z)",
            Self::NameDesc => "Name (Z-A)",
            Self::PriceAsc => "Price (Low to High)",
            Self::PriceDesc => "Price (High to Low)",
            Self::NextBillAsc => "Next Bill (Soonest)",
            Self::NextBillDesc => "Next Bill (Latest)",
        }
    }

    pub fn all() -> &'static [SortKey] {
        &[
            Self::NameAsc,
            Self::NameDesc,
            Self::PriceAsc,
            Self::PriceDesc,
            Self::NextBillAsc,
            Self::NextBillDesc,
        ]
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown sort key: {} (valid: name-asc, name-desc, price-asc, price-desc, nextbill-asc, nextbill-desc)",
                    s
                )
            })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort in place. Subscriptions without a next bill date sort as if billed in
/// the far future; ties keep their input order.
pub fn sort_subscriptions(subscriptions: &mut [&Subscription], key: SortKey) {
    subscriptions.sort_by(|a, b| match key {
        SortKey::NameAsc => compare_names(a, b),
        SortKey::NameDesc => compare_names(b, a),
        SortKey::PriceAsc => compare_prices(a, b),
        SortKey::PriceDesc => compare_prices(b, a),
        SortKey::NextBillAsc => next_bill_key(a).cmp(&next_bill_key(b)),
        SortKey::NextBillDesc => next_bill_key(b).cmp(&next_bill_key(a)),
    });
}

fn compare_names(a: &Subscription, b: &Subscription) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn compare_prices(a: &Subscription, b: &Subscription) -> Ordering {
    a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
}

fn next_bill_key(subscription: &Subscription) -> NaiveDate {
    subscription.anchor.unwrap_or(NaiveDate::MAX)
}

/// Distinct categories in first-seen order, blanks skipped
pub fn categories(subscriptions: &[Subscription]) -> Vec<String> {
    let mut seen = HashSet::new();
    subscriptions
        .iter()
        .map(|s| s.category.trim())
        .filter(|c| !c.is_empty() && seen.insert(c.to_string()))
        .map(str::to_string)
        .collect()
}
