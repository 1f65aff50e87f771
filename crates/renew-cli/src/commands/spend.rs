//! Spend reporting commands

use anyhow::Result;
use chrono::NaiveDate;

use renew_core::{
    spend::spend_by_category, summarize, MonthRef, SpendMode, SubscriptionStore, UpcomingSummary,
};

use super::truncate;

pub fn cmd_summary(
    store: &SubscriptionStore,
    month: MonthRef,
    mode: SpendMode,
    json: bool,
) -> Result<()> {
    let subscriptions = store.load()?;
    let summary = summarize(&subscriptions, month, mode);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("💰 Spend Summary - {}", month.label());
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Active subscriptions: {}", summary.active_count);
    println!("   Monthly ({}):  ${:.2}", mode, summary.monthly_total);
    println!("   Yearly:               ${:.2}", summary.yearly_total);

    Ok(())
}

pub fn cmd_categories(store: &SubscriptionStore, json: bool) -> Result<()> {
    let subscriptions = store.load()?;
    let categories = spend_by_category(&subscriptions);

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No active subscriptions.");
        return Ok(());
    }

    println!();
    println!("📊 Spend by Category");
    println!("   ─────────────────────────────────────────────────────────────");

    for cat in &categories {
        let bar_len = (cat.percentage / 5.0).round() as usize;
        println!(
            "   {:20} │ {:>9}/mo │ {:>10}/yr │ {:>5.1}% {}",
            truncate(&cat.category, 20),
            format!("${:.2}", cat.monthly),
            format!("${:.2}", cat.yearly),
            cat.percentage,
            "█".repeat(bar_len)
        );
    }

    Ok(())
}

pub fn cmd_upcoming(
    store: &SubscriptionStore,
    from: NaiveDate,
    days: u32,
    json: bool,
) -> Result<()> {
    let subscriptions = store.load()?;
    let summary = UpcomingSummary::build(&subscriptions, from, days);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("🔔 Upcoming Charges ({} to {})", summary.from, summary.to);
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.charges.is_empty() {
        println!("   Nothing due in the next {} days", days);
        return Ok(());
    }

    for charge in &summary.charges {
        println!(
            "   {}  {:24} {:>9}  {}",
            charge.date,
            truncate(&charge.name, 24),
            format!("${:.2}", charge.amount),
            charge.cycle
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2}", summary.total);

    Ok(())
}
