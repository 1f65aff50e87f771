//! Month view command

use anyhow::Result;
use chrono::NaiveDate;

use renew_core::{
    group_by_date, subscriptions_for_month, summarize, DateBucket, MonthRef, SpendMode,
    SubscriptionStore,
};

use super::truncate;

pub fn cmd_month(
    store: &SubscriptionStore,
    month: MonthRef,
    today: NaiveDate,
    mode: SpendMode,
    json: bool,
) -> Result<()> {
    let subscriptions = store.load()?;
    let occurrences = subscriptions_for_month(&subscriptions, month);
    let grouped = group_by_date(&occurrences, today);
    let totals = summarize(&subscriptions, month, mode);

    if json {
        let view = serde_json::json!({
            "month": month,
            "label": month.label(),
            "upcoming": grouped.upcoming_buckets(),
            "past": grouped.past_buckets(),
            "monthly_total": totals.monthly_total,
            "yearly_total": totals.yearly_total,
            "mode": mode,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!();
    println!("📅 {}", month.label());
    println!("   ─────────────────────────────────────────────────────────────");

    if grouped.is_empty() {
        println!("   No billing dates this month");
    } else {
        print_section("Upcoming", &grouped.upcoming_buckets());
        print_section("Past", &grouped.past_buckets());
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   💰 Monthly: ${:.2} ({})   Yearly: ${:.2}",
        totals.monthly_total, mode, totals.yearly_total
    );

    Ok(())
}

fn print_section(title: &str, buckets: &[DateBucket]) {
    if buckets.is_empty() {
        return;
    }

    println!("   {}", title);
    for bucket in buckets {
        for (i, sub) in bucket.subscriptions.iter().enumerate() {
            let date = if i == 0 { bucket.date.as_str() } else { "" };
            println!(
                "   {:10}  {:24} {:>9}  {}",
                date,
                truncate(&sub.name, 24),
                format!("${:.2}", sub.price),
                sub.billing_cycle.label()
            );
        }
    }
}
