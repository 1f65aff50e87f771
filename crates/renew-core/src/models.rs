//! Domain models for Renew

use std::num::NonZeroU32;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::date_key;

/// A tracked subscription
///
/// Serialized through [`SubscriptionRecord`], the flat row shape used by
/// stores and the API. Core computations treat it as an immutable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SubscriptionRecord", into = "SubscriptionRecord")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Price of one billing cycle
    pub price: f64,
    pub billing_cycle: BillingCycle,
    /// Anchor billing date all occurrences step from
    pub anchor: Option<NaiveDate>,
    pub is_active: bool,
    pub link: Option<String>,
    pub logo: Option<String>,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        billing_cycle: BillingCycle,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            price,
            billing_cycle,
            anchor: None,
            is_active: true,
            link: None,
            logo: None,
        }
    }

    pub fn with_anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// How often a subscription bills
///
/// Only `Custom` carries a period. `Custom(None)` is a custom cadence whose
/// period or unit is missing; it never steps and costs fall back to `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom(Option<CustomPeriod>),
}

impl BillingCycle {
    /// Well-formed custom cadence of `every` units. Zero yields `Custom(None)`.
    pub fn custom(every: u32, unit: CustomUnit) -> Self {
        Self::Custom(NonZeroU32::new(every).map(|every| CustomPeriod { every, unit }))
    }

    /// Build a cycle from its stored parts.
    ///
    /// Unknown cycle names degrade to `Custom(None)` so malformed rows still
    /// display instead of failing the whole list.
    pub fn from_parts(cycle: &str, every: Option<u32>, unit: Option<&str>) -> Self {
        match cycle.trim().to_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            "yearly" | "annual" | "annually" => Self::Yearly,
            "custom" => {
                let unit = unit.and_then(|u| u.parse::<CustomUnit>().ok());
                match (every, unit) {
                    (Some(every), Some(unit)) => Self::custom(every, unit),
                    _ => {
                        debug!(?every, ?unit, "Custom cadence missing period or unit");
                        Self::Custom(None)
                    }
                }
            }
            other => {
                warn!(cycle = %other, "Unknown billing cycle, treating as unresolved custom");
                Self::Custom(None)
            }
        }
    }

    pub fn kind(&self) -> CycleKind {
        match self {
            Self::Weekly => CycleKind::Weekly,
            Self::Monthly => CycleKind::Monthly,
            Self::Quarterly => CycleKind::Quarterly,
            Self::Yearly => CycleKind::Yearly,
            Self::Custom(_) => CycleKind::Custom,
        }
    }

    pub fn custom_period(&self) -> Option<CustomPeriod> {
        match self {
            Self::Custom(period) => *period,
            _ => None,
        }
    }
}

/// Period of a custom cadence, e.g. every 3 weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomPeriod {
    pub every: NonZeroU32,
    pub unit: CustomUnit,
}

/// Unit of a custom cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomUnit {
    Day,
    Week,
    Month,
    Year,
}

impl CustomUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl std::str::FromStr for CustomUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches('s') {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(format!(
                "Unknown custom unit: {} (valid: day, week, month, year)",
                s
            )),
        }
    }
}

impl std::fmt::Display for CustomUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field-less kind of a billing cycle, used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl CycleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }

    pub fn all() -> &'static [CycleKind] {
        &[
            Self::Weekly,
            Self::Monthly,
            Self::Quarterly,
            Self::Yearly,
            Self::Custom,
        ]
    }
}

impl std::str::FromStr for CycleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Unknown billing cycle: {} (valid: weekly, monthly, quarterly, yearly, custom)",
                s
            )),
        }
    }
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored row shape of a subscription
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub billing_cycle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_every: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_unit: Option<String>,
    /// Anchor billing date (`YYYY-MM-DD` or RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_bill: Option<String>,
    /// Missing means active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl From<SubscriptionRecord> for Subscription {
    fn from(record: SubscriptionRecord) -> Self {
        let billing_cycle = BillingCycle::from_parts(
            &record.billing_cycle,
            record.custom_every,
            record.custom_unit.as_deref(),
        );

        let anchor = record.next_bill.as_deref().and_then(|raw| {
            let parsed = parse_anchor(raw);
            if parsed.is_none() {
                debug!(id = %record.id, next_bill = %raw, "Unparseable anchor date, no occurrences");
            }
            parsed
        });

        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            price: record.price,
            billing_cycle,
            anchor,
            is_active: record.is_active != Some(false),
            link: record.link,
            logo: record.logo,
        }
    }
}

impl From<Subscription> for SubscriptionRecord {
    fn from(sub: Subscription) -> Self {
        let mut record = Self {
            id: sub.id,
            name: sub.name,
            category: sub.category,
            price: sub.price,
            next_bill: sub.anchor.map(date_key),
            is_active: Some(sub.is_active),
            link: sub.link,
            logo: sub.logo,
            ..Self::default()
        };
        record.set_cycle(&sub.billing_cycle);
        record
    }
}

impl SubscriptionRecord {
    /// Overwrite the stored cadence columns with `cycle`
    pub fn set_cycle(&mut self, cycle: &BillingCycle) {
        let period = cycle.custom_period();
        self.billing_cycle = cycle.kind().as_str().to_string();
        self.custom_every = period.map(|p| p.every.get());
        self.custom_unit = period.map(|p| p.unit.as_str().to_string());
    }

    /// Apply the fields set in `patch`, leaving every other column as stored
    pub fn apply(&mut self, patch: &SubscriptionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(cycle) = &patch.billing_cycle {
            self.set_cycle(cycle);
        }
        if let Some(anchor) = patch.anchor {
            self.next_bill = Some(date_key(anchor));
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = Some(is_active);
        }
        if let Some(link) = &patch.link {
            let link = link.trim();
            self.link = (!link.is_empty()).then(|| link.to_string());
        }
    }
}

/// Changes to an existing subscription. `None` leaves a field untouched;
/// an empty `link` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub billing_cycle: Option<BillingCycle>,
    pub anchor: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub link: Option<String>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fields for a subscription that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub billing_cycle: BillingCycle,
    pub anchor: Option<NaiveDate>,
    pub link: Option<String>,
}

/// Parse a stored anchor date into a local calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the date in the timestamp's own
/// offset) and naive `YYYY-MM-DDTHH:MM:SS` timestamps. Anything else is `None`.
pub fn parse_anchor(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
