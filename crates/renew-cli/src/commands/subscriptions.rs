//! Subscription command implementations

use std::collections::HashSet;

use anyhow::{bail, Result};
use chrono::NaiveDate;

use renew_core::{
    next_billing_date, sort_subscriptions, store::find, total_monthly,
    BillingCycle, CustomUnit, CycleKind, NewSubscription, SortKey, StatusFilter,
    SubscriptionFilter, SubscriptionPatch, SubscriptionStore,
};

use super::{parse_date, truncate};
use crate::cli::EditArgs;

/// Filter from `list` arguments
pub fn build_filter(
    status: &str,
    categories: &[String],
    cycles: &[String],
    query: Option<String>,
) -> Result<SubscriptionFilter> {
    let status: StatusFilter = status.parse().map_err(anyhow::Error::msg)?;
    let cycles: HashSet<CycleKind> = cycles
        .iter()
        .map(|c| c.parse::<CycleKind>().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()?;

    Ok(SubscriptionFilter {
        query,
        status,
        categories: categories.iter().cloned().collect(),
        cycles,
    })
}

pub fn cmd_list(
    store: &SubscriptionStore,
    filter: &SubscriptionFilter,
    sort: SortKey,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let subscriptions = store.load()?;

    if subscriptions.is_empty() {
        println!("No subscriptions yet. Add one with:");
        println!("  renew add --name Netflix --price 15.49 --cycle monthly --anchor 2024-01-31");
        return Ok(());
    }

    let mut matched = filter.apply(&subscriptions);
    sort_subscriptions(&mut matched, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&matched)?);
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions ({})", sort.label());
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &matched {
        let status_icon = if sub.is_active { "✅" } else { "⏸️ " };
        let next = next_billing_date(sub, today)
            .filter(|_| sub.is_active)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "   {} {:>4} {:20} │ {:>9} │ {:<10} │ next {}",
            status_icon,
            sub.id,
            truncate(&sub.name, 20),
            format!("${:.2}", sub.price),
            sub.billing_cycle.label(),
            next
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {} shown, {} total, ${:.2}/month average",
        matched.len(),
        subscriptions.len(),
        total_monthly(&subscriptions)
    );

    Ok(())
}

/// Cadence from `--cycle`, with `--every`/`--unit` for custom cadences
pub fn parse_cycle(cycle: &str, every: Option<u32>, unit: Option<&str>) -> Result<BillingCycle> {
    let kind: CycleKind = cycle.parse().map_err(anyhow::Error::msg)?;

    if kind != CycleKind::Custom && (every.is_some() || unit.is_some()) {
        bail!("--every and --unit only apply to --cycle custom");
    }

    let billing_cycle = match kind {
        CycleKind::Weekly => BillingCycle::Weekly,
        CycleKind::Monthly => BillingCycle::Monthly,
        CycleKind::Quarterly => BillingCycle::Quarterly,
        CycleKind::Yearly => BillingCycle::Yearly,
        CycleKind::Custom => {
            let (Some(every), Some(unit)) = (every, unit) else {
                bail!("Custom cadence needs --every and --unit");
            };
            if every == 0 {
                bail!("--every must be at least 1");
            }
            let unit: CustomUnit = unit.parse().map_err(anyhow::Error::msg)?;
            BillingCycle::custom(every, unit)
        }
    };

    Ok(billing_cycle)
}

/// Validate `add` arguments into a new subscription
pub fn parse_new_subscription(
    name: &str,
    price: f64,
    billing_cycle: BillingCycle,
    anchor: Option<&str>,
    category: &str,
    link: Option<String>,
) -> Result<NewSubscription> {
    Ok(NewSubscription {
        name: name.to_string(),
        category: category.to_string(),
        price,
        billing_cycle,
        anchor: parse_date(anchor, "--anchor")?,
        link,
    })
}

/// Collect `edit` arguments into a patch
pub fn parse_patch(changes: &EditArgs) -> Result<SubscriptionPatch> {
    let every = changes.every;
    let unit = changes.unit.as_deref();
    let billing_cycle = match changes.cycle.as_deref() {
        Some(cycle) => Some(parse_cycle(cycle, every, unit)?),
        None if every.is_some() || unit.is_some() => {
            bail!("--every and --unit need --cycle custom")
        }
        None => None,
    };

    Ok(SubscriptionPatch {
        name: changes.name.clone(),
        category: changes.category.clone(),
        price: changes.price,
        billing_cycle,
        anchor: parse_date(changes.anchor.as_deref(), "--anchor")?,
        is_active: None,
        link: changes.link.clone(),
    })
}

pub fn cmd_add(store: &SubscriptionStore, new: NewSubscription) -> Result<()> {
    let sub = store.add(new)?;

    println!(
        "✅ Added {} (ID: {}) - ${:.2} {}",
        sub.name,
        sub.id,
        sub.price,
        sub.billing_cycle.label()
    );
    if sub.anchor.is_none() {
        println!("   💡 Tip: Set --anchor so it shows up in month views");
    }

    Ok(())
}

pub fn cmd_edit(
    store: &SubscriptionStore,
    id_or_name: &str,
    patch: &SubscriptionPatch,
) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to change (pass --name, --price, --cycle, --anchor, --category or --link)");
    }

    let sub = store.update(id_or_name, patch)?;
    println!(
        "✏️  Updated {} (ID: {}) - ${:.2} {}",
        sub.name,
        sub.id,
        sub.price,
        sub.billing_cycle.label()
    );
    if let Some(anchor) = sub.anchor {
        println!("   Next bill anchor: {}", anchor);
    }

    Ok(())
}

pub fn cmd_remove(store: &SubscriptionStore, id_or_name: &str) -> Result<()> {
    let removed = store.remove(id_or_name)?;
    println!("🗑️  Removed {} (ID: {})", removed.name, removed.id);
    Ok(())
}

pub fn cmd_set_active(store: &SubscriptionStore, id_or_name: &str, is_active: bool) -> Result<()> {
    let subscriptions = store.load()?;
    if let Some(index) = find(&subscriptions, id_or_name) {
        if subscriptions[index].is_active == is_active {
            let state = if is_active { "active" } else { "paused" };
            println!("   {} is already {}", subscriptions[index].name, state);
            return Ok(());
        }
    }

    let sub = store.set_active(id_or_name, is_active)?;
    if is_active {
        println!("▶️  Resumed {} (ID: {})", sub.name, sub.id);
    } else {
        println!("⏸️  Paused {} (ID: {})", sub.name, sub.id);
    }

    Ok(())
}
