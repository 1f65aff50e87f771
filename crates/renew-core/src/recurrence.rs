//! Recurrence engine
//!
//! Enumerates the calendar dates a subscription bills on within one month.
//! Every occurrence is derived from the anchor date by a whole number of
//! cadence steps, so the same `(subscription, month)` always yields the same
//! dates and month-based cadences keep the anchor's day-of-month (clamped to
//! shorter months) instead of drifting.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{add_days, add_months_clamped, months_between, MonthRef};
use crate::models::{BillingCycle, CustomUnit, Subscription};

/// A resolved cadence step. Exactly one unit applies per cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u32),
    Months(u32),
}

impl BillingCycle {
    /// Resolve the cadence into a day or month step. `None` for a custom
    /// cadence without a usable period.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Weekly => Some(Step::Days(7)),
            Self::Monthly => Some(Step::Months(1)),
            Self::Quarterly => Some(Step::Months(3)),
            Self::Yearly => Some(Step::Months(12)),
            Self::Custom(Some(period)) => {
                let n = period.every.get();
                let step = match period.unit {
                    CustomUnit::Day => Step::Days(n),
                    CustomUnit::Week => Step::Days(n.checked_mul(7)?),
                    CustomUnit::Month => Step::Months(n),
                    CustomUnit::Year => Step::Months(n.checked_mul(12)?),
                };
                Some(step)
            }
            Self::Custom(None) => None,
        }
    }

    /// Whether the cadence can bill at most once in any month.
    pub fn at_most_once_per_month(&self) -> bool {
        !matches!(self.step(), Some(Step::Days(_)))
    }
}

/// A subscription billing on a specific date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Occurrence<'a> {
    pub subscription: &'a Subscription,
    pub date: NaiveDate,
}

/// All billing dates of a cadence within `month`, ascending.
///
/// Anchors after the month produce nothing: occurrences only step forward.
pub fn occurrences_in_month(
    anchor: NaiveDate,
    cycle: &BillingCycle,
    month: MonthRef,
) -> Vec<NaiveDate> {
    let Some((start, end)) = month.bounds() else {
        return Vec::new();
    };

    match cycle.step() {
        Some(Step::Months(step)) => month_step_occurrence(anchor, step, start, end)
            .into_iter()
            .collect(),
        Some(Step::Days(step)) => day_step_occurrences(anchor, step, start, end),
        None => {
            // Unresolvable cadence: keep a manually entered date visible
            if anchor >= start && anchor <= end {
                vec![anchor]
            } else {
                Vec::new()
            }
        }
    }
}

fn month_step_occurrence(
    anchor: NaiveDate,
    step: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<NaiveDate> {
    if step == 0 {
        return None;
    }

    let mut steps: u64 = 0;
    if anchor < start {
        let gap = months_between(anchor, start).max(0) as u64;
        steps = gap.div_ceil(step as u64);
    }

    let mut candidate = add_months_clamped(anchor, u32::try_from(steps * step as u64).ok()?)?;
    // Clamping can only pull the day earlier within the target month
    while candidate < start {
        steps += 1;
        candidate = add_months_clamped(anchor, u32::try_from(steps * step as u64).ok()?)?;
    }

    (candidate <= end).then_some(candidate)
}

fn day_step_occurrences(
    anchor: NaiveDate,
    step: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if step == 0 {
        return dates;
    }
    let step = step as u64;

    let mut candidate = anchor;
    if anchor < start {
        let gap = (start - anchor).num_days() as u64;
        let Some(next) = add_days(anchor, gap.div_ceil(step) * step) else {
            return dates;
        };
        candidate = next;
    }

    while candidate <= end {
        if candidate >= start {
            dates.push(candidate);
        }
        match add_days(candidate, step) {
            Some(next) => candidate = next,
            None => break,
        }
    }

    dates
}

/// Billing dates of one subscription in `month`. Inactive or anchor-less
/// subscriptions have none.
pub fn occurrences_for(subscription: &Subscription, month: MonthRef) -> Vec<NaiveDate> {
    match subscription.anchor {
        Some(anchor) if subscription.is_active => {
            occurrences_in_month(anchor, &subscription.billing_cycle, month)
        }
        _ => Vec::new(),
    }
}

/// Occurrence records for every active subscription in `month`, in input
/// order and then date order.
pub fn subscriptions_for_month(
    subscriptions: &[Subscription],
    month: MonthRef,
) -> Vec<Occurrence<'_>> {
    subscriptions
        .iter()
        .flat_map(|subscription| {
            occurrences_for(subscription, month)
                .into_iter()
                .map(move |date| Occurrence { subscription, date })
        })
        .collect()
}

/// First billing date on or after `from`.
///
/// Searches month by month for at most one full cadence period plus a month,
/// which always covers the next occurrence of a resolvable cadence.
pub fn next_billing_date(subscription: &Subscription, from: NaiveDate) -> Option<NaiveDate> {
    let anchor = subscription.anchor?;
    if anchor >= from {
        return Some(anchor);
    }

    let span_months = match subscription.billing_cycle.step()? {
        Step::Months(n) => n as i32 + 1,
        Step::Days(n) => (n / 28) as i32 + 2,
    };

    let first = MonthRef::from_date(from);
    (0..=span_months)
        .map(|offset| MonthRef::new(first.year, first.month0 as i32 + offset))
        .flat_map(|month| occurrences_in_month(anchor, &subscription.billing_cycle, month))
        .find(|date| *date >= from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomUnit;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn july_2024() -> MonthRef {
        MonthRef::new(2024, 6)
    }

    #[test]
    fn test_step_resolution() {
        assert_eq!(BillingCycle::Weekly.step(), Some(Step::Days(7)));
        assert_eq!(BillingCycle::Monthly.step(), Some(Step::Months(1)));
        assert_eq!(BillingCycle::Quarterly.step(), Some(Step::Months(3)));
        assert_eq!(BillingCycle::Yearly.step(), Some(Step::Months(12)));
        assert_eq!(BillingCycle::custom(10, CustomUnit::Day).step(), Some(Step::Days(10)));
        assert_eq!(BillingCycle::custom(2, CustomUnit::Week).step(), Some(Step::Days(14)));
        assert_eq!(BillingCycle::custom(5, CustomUnit::Month).step(), Some(Step::Months(5)));
        assert_eq!(BillingCycle::custom(2, CustomUnit::Year).step(), Some(Step::Months(24)));
        assert_eq!(BillingCycle::Custom(None).step(), None);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let anchor = ymd(2024, 1, 31);
        let feb = occurrences_in_month(anchor, &BillingCycle::Monthly, MonthRef::new(2024, 1));
        assert_eq!(feb, vec![ymd(2024, 2, 29)]);

        let apr = occurrences_in_month(anchor, &BillingCycle::Monthly, MonthRef::new(2024, 3));
        assert_eq!(apr, vec![ymd(2024, 4, 30)]);

        // Clamping never carries over: March is back on the 31st
        let mar = occurrences_in_month(anchor, &BillingCycle::Monthly, MonthRef::new(2024, 2));
        assert_eq!(mar, vec![ymd(2024, 3, 31)]);

        let feb_2023 =
            occurrences_in_month(ymd(2023, 1, 31), &BillingCycle::Monthly, MonthRef::new(2023, 1));
        assert_eq!(feb_2023, vec![ymd(2023, 2, 28)]);
    }

    #[test]
    fn test_weekly_enumerates_every_week() {
        let dates = occurrences_in_month(ymd(2024, 7, 1), &BillingCycle::Weekly, july_2024());
        assert_eq!(
            dates,
            vec![
                ymd(2024, 7, 1),
                ymd(2024, 7, 8),
                ymd(2024, 7, 15),
                ymd(2024, 7, 22),
                ymd(2024, 7, 29),
            ]
        );
    }

    #[test]
    fn test_weekly_from_earlier_anchor() {
        // 2024-06-05 + 4 weeks = 2024-07-03
        let dates = occurrences_in_month(ymd(2024, 6, 5), &BillingCycle::Weekly, july_2024());
        assert_eq!(dates.first(), Some(&ymd(2024, 7, 3)));
        assert_eq!(dates.len(), 5);
        assert_eq!(dates.last(), Some(&ymd(2024, 7, 31)));
    }

    #[test]
    fn test_quarterly_only_in_billing_months() {
        let anchor = ymd(2024, 1, 15);
        let hits: Vec<u32> = (0..12)
            .filter(|m| {
                !occurrences_in_month(anchor, &BillingCycle::Quarterly, MonthRef::new(2024, *m))
                    .is_empty()
            })
            .map(|m| m as u32 + 1)
            .collect();
        assert_eq!(hits, vec![1, 4, 7, 10]);
    }

    #[test]
    fn test_yearly_leap_day_anchor() {
        let anchor = ymd(2024, 2, 29);
        let feb_2025 =
            occurrences_in_month(anchor, &BillingCycle::Yearly, MonthRef::new(2025, 1));
        assert_eq!(feb_2025, vec![ymd(2025, 2, 28)]);
        let feb_2028 =
            occurrences_in_month(anchor, &BillingCycle::Yearly, MonthRef::new(2028, 1));
        assert_eq!(feb_2028, vec![ymd(2028, 2, 29)]);
        let mar_2025 =
            occurrences_in_month(anchor, &BillingCycle::Yearly, MonthRef::new(2025, 2));
        assert!(mar_2025.is_empty());
    }

    #[test]
    fn test_anchor_after_month_yields_nothing() {
        let anchor = ymd(2024, 8, 10);
        assert!(occurrences_in_month(anchor, &BillingCycle::Monthly, july_2024()).is_empty());
        assert!(occurrences_in_month(anchor, &BillingCycle::Weekly, july_2024()).is_empty());
    }

    #[test]
    fn test_custom_day_and_week_steps() {
        let every_ten_days = BillingCycle::custom(10, CustomUnit::Day);
        let dates = occurrences_in_month(ymd(2024, 6, 25), &every_ten_days, july_2024());
        assert_eq!(dates, vec![ymd(2024, 7, 5), ymd(2024, 7, 15), ymd(2024, 7, 25)]);

        let fortnightly = BillingCycle::custom(2, CustomUnit::Week);
        let dates = occurrences_in_month(ymd(2024, 7, 2), &fortnightly, july_2024());
        assert_eq!(dates, vec![ymd(2024, 7, 2), ymd(2024, 7, 16), ymd(2024, 7, 30)]);
    }

    #[test]
    fn test_custom_month_and_year_steps() {
        let bimonthly = BillingCycle::custom(2, CustomUnit::Month);
        let anchor = ymd(2024, 1, 31);
        assert!(occurrences_in_month(anchor, &bimonthly, MonthRef::new(2024, 1)).is_empty());
        assert_eq!(
            occurrences_in_month(anchor, &bimonthly, MonthRef::new(2024, 2)),
            vec![ymd(2024, 3, 31)]
        );
        assert_eq!(
            occurrences_in_month(anchor, &bimonthly, MonthRef::new(2024, 10)),
            vec![ymd(2024, 11, 30)]
        );

        let biennial = BillingCycle::custom(2, CustomUnit::Year);
        let anchor = ymd(2023, 5, 20);
        assert!(occurrences_in_month(anchor, &biennial, MonthRef::new(2024, 4)).is_empty());
        assert_eq!(
            occurrences_in_month(anchor, &biennial, MonthRef::new(2025, 4)),
            vec![ymd(2025, 5, 20)]
        );
    }

    #[test]
    fn test_unresolved_custom_falls_back_to_anchor() {
        let cycle = BillingCycle::Custom(None);
        assert_eq!(
            occurrences_in_month(ymd(2024, 7, 9), &cycle, july_2024()),
            vec![ymd(2024, 7, 9)]
        );
        assert!(occurrences_in_month(ymd(2024, 6, 9), &cycle, july_2024()).is_empty());
    }

    #[test]
    fn test_window_containment_and_cardinality() {
        let cycles = [
            BillingCycle::Weekly,
            BillingCycle::Monthly,
            BillingCycle::Quarterly,
            BillingCycle::Yearly,
            BillingCycle::custom(3, CustomUnit::Day),
            BillingCycle::custom(2, CustomUnit::Week),
            BillingCycle::custom(7, CustomUnit::Month),
            BillingCycle::custom(3, CustomUnit::Year),
        ];
        let anchors = [ymd(2020, 1, 31), ymd(2022, 2, 28), ymd(2023, 8, 30), ymd(2024, 12, 1)];

        for cycle in &cycles {
            for anchor in &anchors {
                for index in 0..36 {
                    let month = MonthRef::new(2023, index);
                    let (start, end) = month.bounds().unwrap();
                    let dates = occurrences_in_month(*anchor, cycle, month);

                    assert!(dates.iter().all(|d| *d >= start && *d <= end));
                    if cycle.at_most_once_per_month() {
                        assert!(dates.len() <= 1, "{:?} from {} in {}", cycle, anchor, month);
                    }
                    if let Some(Step::Days(step)) = cycle.step() {
                        for pair in dates.windows(2) {
                            assert_eq!((pair[1] - pair[0]).num_days(), step as i64);
                        }
                    }

                    // Deterministic
                    assert_eq!(dates, occurrences_in_month(*anchor, cycle, month));
                }
            }
        }
    }

    #[test]
    fn test_subscriptions_for_month_skips_inactive_and_missing_anchor() {
        let subs = vec![
            Subscription::new("1", "Netflix", 15.0, BillingCycle::Monthly)
                .with_anchor(ymd(2024, 6, 20)),
            Subscription::new("2", "Gym", 10.0, BillingCycle::Weekly)
                .with_anchor(ymd(2024, 7, 1))
                .with_active(false),
            Subscription::new("3", "Draft", 5.0, BillingCycle::Monthly),
            Subscription::new("4", "Paper", 3.0, BillingCycle::Weekly)
                .with_anchor(ymd(2024, 7, 24)),
        ];

        let occurrences = subscriptions_for_month(&subs, july_2024());
        let summary: Vec<(&str, NaiveDate)> = occurrences
            .iter()
            .map(|o| (o.subscription.name.as_str(), o.date))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Netflix", ymd(2024, 7, 20)),
                ("Paper", ymd(2024, 7, 24)),
                ("Paper", ymd(2024, 7, 31)),
            ]
        );
    }

    #[test]
    fn test_next_billing_date() {
        let monthly = Subscription::new("1", "Netflix", 15.0, BillingCycle::Monthly)
            .with_anchor(ymd(2024, 1, 31));
        assert_eq!(next_billing_date(&monthly, ymd(2024, 2, 10)), Some(ymd(2024, 2, 29)));
        assert_eq!(next_billing_date(&monthly, ymd(2024, 3, 31)), Some(ymd(2024, 3, 31)));
        assert_eq!(next_billing_date(&monthly, ymd(2023, 12, 1)), Some(ymd(2024, 1, 31)));

        let yearly = Subscription::new("2", "Domain", 12.0, BillingCycle::Yearly)
            .with_anchor(ymd(2023, 3, 1));
        assert_eq!(next_billing_date(&yearly, ymd(2024, 3, 2)), Some(ymd(2025, 3, 1)));

        let weekly = Subscription::new("3", "Paper", 3.0, BillingCycle::Weekly)
            .with_anchor(ymd(2024, 7, 29));
        assert_eq!(next_billing_date(&weekly, ymd(2024, 7, 31)), Some(ymd(2024, 8, 5)));

        let broken = Subscription::new("4", "Odd", 3.0, BillingCycle::Custom(None))
            .with_anchor(ymd(2024, 7, 1));
        assert_eq!(next_billing_date(&broken, ymd(2024, 7, 2)), None);
    }
}
