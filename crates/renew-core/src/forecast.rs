//! Upcoming charges over a rolling window
//!
//! Walks every month the window touches through the recurrence engine, so
//! charges are the same dates the month view shows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{add_days, date_key, MonthRef};
use crate::models::Subscription;
use crate::recurrence::{subscriptions_for_month, Occurrence};
use crate::spend::round_currency;

/// Occurrences dated within `[from, from + days]`, ordered by date and then
/// input order. The window end clamps to the last representable date.
pub fn upcoming_charges(
    subscriptions: &[Subscription],
    from: NaiveDate,
    days: u32,
) -> Vec<Occurrence<'_>> {
    let to = window_end(from, days);
    let last = MonthRef::from_date(to);

    let mut month = MonthRef::from_date(from);
    let mut charges = Vec::new();
    loop {
        charges.extend(
            subscriptions_for_month(subscriptions, month)
                .into_iter()
                .filter(|o| o.date >= from && o.date <= to),
        );
        if month >= last {
            break;
        }
        month = month.next();
    }

    // Stable sort keeps input order for same-day charges
    charges.sort_by_key(|o| o.date);
    charges
}

fn window_end(from: NaiveDate, days: u32) -> NaiveDate {
    add_days(from, days as u64).unwrap_or(NaiveDate::MAX)
}

/// A single forecast line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingCharge {
    pub date: String,
    pub subscription_id: String,
    pub name: String,
    pub amount: f64,
    pub cycle: String,
}

/// Upcoming charges with their total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: f64,
    pub charges: Vec<UpcomingCharge>,
}

impl UpcomingSummary {
    pub fn build(subscriptions: &[Subscription], from: NaiveDate, days: u32) -> Self {
        let occurrences = upcoming_charges(subscriptions, from, days);
        let charges: Vec<UpcomingCharge> = occurrences
            .iter()
            .map(|o| UpcomingCharge {
                date: date_key(o.date),
                subscription_id: o.subscription.id.clone(),
                name: o.subscription.name.clone(),
                amount: o.subscription.price,
                cycle: o.subscription.billing_cycle.label(),
            })
            .collect();

        Self {
            from,
            to: window_end(from, days),
            total: round_currency(charges.iter().map(|c| c.amount).sum()),
            charges,
        }
    }
}
