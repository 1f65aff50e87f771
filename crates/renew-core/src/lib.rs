//! Renew Core Library
//!
//! Shared functionality for the Renew subscription tracker:
//! - Calendar primitives (month windows, clamped month stepping)
//! - Recurrence engine enumerating billing dates within a month
//! - Past/upcoming grouping of occurrences by date key
//! - Spend aggregation across heterogeneous billing cadences
//! - Catalog helpers for filtering, sorting and labelling subscriptions
//! - Upcoming-charge forecast over a rolling window
//! - Layered TOML configuration and a file-backed subscription store

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod grouping;
pub mod models;
pub mod recurrence;
pub mod spend;
pub mod store;

pub use calendar::{date_key, MonthRef};
pub use catalog::{sort_subscriptions, SortKey, StatusFilter, SubscriptionFilter};
pub use config::Config;
pub use error::{Error, Result};
pub use forecast::{upcoming_charges, UpcomingSummary};
pub use grouping::{group_by_date, DateBucket, GroupedOccurrences, OccurrenceStatus};
pub use models::{
    BillingCycle, CustomPeriod, CustomUnit, CycleKind, NewSubscription, Subscription,
    SubscriptionPatch,
};
pub use recurrence::{
    next_billing_date, occurrences_in_month, subscriptions_for_month, Occurrence, Step,
};
pub use spend::{
    monthly_equivalent, summarize, total_monthly, total_yearly, yearly_equivalent, SpendMode,
    SpendSummary,
};
pub use store::SubscriptionStore;
