//! Past/upcoming classification of occurrences, bucketed by date key

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::date_key;
use crate::models::Subscription;
use crate::recurrence::Occurrence;

/// Whether an occurrence has already happened relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceStatus {
    Past,
    Upcoming,
}

impl OccurrenceStatus {
    /// Strictly before the reference day is past; the reference day itself
    /// is upcoming.
    pub fn classify(date: NaiveDate, reference: NaiveDate) -> Self {
        if date < reference {
            Self::Past
        } else {
            Self::Upcoming
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Upcoming => "upcoming",
        }
    }
}

/// Occurrences split into past and upcoming buckets keyed by `YYYY-MM-DD`
#[derive(Debug, Clone, Default)]
pub struct GroupedOccurrences<'a> {
    pub past: BTreeMap<String, Vec<&'a Subscription>>,
    pub upcoming: BTreeMap<String, Vec<&'a Subscription>>,
}

impl<'a> GroupedOccurrences<'a> {
    /// Upcoming buckets, soonest first
    pub fn upcoming_ascending(
        &self,
    ) -> impl Iterator<Item = (&String, &Vec<&'a Subscription>)> + '_ {
        self.upcoming.iter()
    }

    /// Past buckets, most recent first
    pub fn past_descending(&self) -> impl Iterator<Item = (&String, &Vec<&'a Subscription>)> + '_ {
        self.past.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.upcoming.is_empty()
    }

    /// Owned upcoming buckets in display order
    pub fn upcoming_buckets(&self) -> Vec<DateBucket> {
        self.upcoming_ascending().map(DateBucket::from_entry).collect()
    }

    /// Owned past buckets in display order
    pub fn past_buckets(&self) -> Vec<DateBucket> {
        self.past_descending().map(DateBucket::from_entry).collect()
    }
}

/// One calendar day of occurrences, for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateBucket {
    pub date: String,
    pub subscriptions: Vec<Subscription>,
}

impl DateBucket {
    fn from_entry((key, subs): (&String, &Vec<&Subscription>)) -> Self {
        Self {
            date: key.clone(),
            subscriptions: subs.iter().map(|s| (*s).clone()).collect(),
        }
    }
}

/// Partition occurrences into past and upcoming buckets relative to
/// `reference`. Subscriptions sharing a day keep their input order.
pub fn group_by_date<'a>(
    occurrences: &[Occurrence<'a>],
    reference: NaiveDate,
) -> GroupedOccurrences<'a> {
    let mut grouped = GroupedOccurrences::default();

    for occurrence in occurrences {
        let bucket = match OccurrenceStatus::classify(occurrence.date, reference) {
            OccurrenceStatus::Past => &mut grouped.past,
            OccurrenceStatus::Upcoming => &mut grouped.upcoming,
        };
        bucket
            .entry(date_key(occurrence.date))
            .or_default()
            .push(occurrence.subscription);
    }

    grouped
}
