//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use renew_core::{BillingCycle, CustomUnit, MonthRef, SortKey, SpendMode, SubscriptionStore};
use tempfile::TempDir;

use crate::cli::EditArgs;
use crate::commands::{self, truncate};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup_test_store(dir: &TempDir) -> SubscriptionStore {
    let store = SubscriptionStore::new(dir.path().join("subscriptions.json"));
    for (name, price, cycle, anchor) in [
        ("Netflix", 15.49, BillingCycle::Monthly, "2024-01-31"),
        ("Local Paper", 3.0, BillingCycle::Weekly, "2024-07-01"),
        ("Insurance", 90.0, BillingCycle::Quarterly, "2024-04-10"),
    ] {
        let new =
            commands::parse_new_subscription(name, price, cycle, Some(anchor), "Bills", None)
                .unwrap();
        commands::cmd_add(&store, new).unwrap();
    }
    store
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_cycle() {
    assert_eq!(
        commands::parse_cycle("custom", Some(3), Some("weeks")).unwrap(),
        BillingCycle::custom(3, CustomUnit::Week)
    );
    assert_eq!(
        commands::parse_cycle("Yearly", None, None).unwrap(),
        BillingCycle::Yearly
    );

    // Custom without a period
    assert!(commands::parse_cycle("custom", None, None).is_err());
    // Zero-length period
    assert!(commands::parse_cycle("custom", Some(0), Some("week")).is_err());
    // Period on a fixed cadence
    assert!(commands::parse_cycle("monthly", Some(2), Some("week")).is_err());
    // Unknown cadence and unit
    assert!(commands::parse_cycle("fortnightly", None, None).is_err());
    assert!(commands::parse_cycle("custom", Some(2), Some("decade")).is_err());
}

#[test]
fn test_parse_new_subscription() {
    let new = commands::parse_new_subscription(
        "Gym",
        9.0,
        BillingCycle::custom(3, CustomUnit::Week),
        Some("2024-06-20"),
        "Health",
        Some("https://gym.example/account".to_string()),
    )
    .unwrap();
    assert_eq!(new.anchor, Some(ymd(2024, 6, 20)));
    assert_eq!(new.link.as_deref(), Some("https://gym.example/account"));

    assert!(commands::parse_new_subscription(
        "Gym",
        9.0,
        BillingCycle::Monthly,
        Some("07/01/2024"),
        "",
        None
    )
    .is_err());
}

#[test]
fn test_parse_patch() {
    let patch = commands::parse_patch(&EditArgs {
        price: Some(17.99),
        cycle: Some("custom".to_string()),
        every: Some(2),
        unit: Some("month".to_string()),
        anchor: Some("2024-03-01".to_string()),
        ..EditArgs::default()
    })
    .unwrap();
    assert_eq!(patch.price, Some(17.99));
    assert_eq!(
        patch.billing_cycle,
        Some(BillingCycle::custom(2, CustomUnit::Month))
    );
    assert_eq!(patch.anchor, Some(ymd(2024, 3, 1)));
    assert_eq!(patch.name, None);

    assert!(commands::parse_patch(&EditArgs::default()).unwrap().is_empty());
    // A period without a cadence
    assert!(commands::parse_patch(&EditArgs {
        every: Some(2),
        ..EditArgs::default()
    })
    .is_err());
    assert!(commands::parse_patch(&EditArgs {
        anchor: Some("tomorrow".to_string()),
        ..EditArgs::default()
    })
    .is_err());
}

#[test]
fn test_resolve_month() {
    let today = ymd(2024, 7, 15);
    assert_eq!(
        commands::resolve_month(None, None, today).unwrap(),
        MonthRef::new(2024, 6)
    );
    assert_eq!(
        commands::resolve_month(Some(2025), Some(2), today).unwrap(),
        MonthRef::new(2025, 1)
    );
    assert_eq!(
        commands::resolve_month(None, Some(12), today).unwrap(),
        MonthRef::new(2024, 11)
    );
    assert!(commands::resolve_month(Some(2024), Some(13), today).is_err());
    assert!(commands::resolve_month(Some(2024), Some(0), today).is_err());
}

#[test]
fn test_parse_helpers() {
    assert_eq!(
        commands::parse_date(Some("2024-02-29"), "--today").unwrap(),
        Some(ymd(2024, 2, 29))
    );
    assert_eq!(commands::parse_date(None, "--today").unwrap(), None);
    assert!(commands::parse_date(Some("2023-02-29"), "--today").is_err());

    let mode: SpendMode = commands::parse_or(Some("occurrences"), SpendMode::Average).unwrap();
    assert_eq!(mode, SpendMode::Occurrences);
    let sort: SortKey = commands::parse_or(None, SortKey::PriceDesc).unwrap();
    assert_eq!(sort, SortKey::PriceDesc);
    assert!(commands::parse_or::<SpendMode>(Some("median"), SpendMode::Average).is_err());
}

#[test]
fn test_build_filter() {
    let filter = commands::build_filter(
        "active",
        &["Bills".to_string()],
        &["weekly".to_string(), "monthly".to_string()],
        Some("net".to_string()),
    )
    .unwrap();
    assert_eq!(filter.categories.len(), 1);
    assert_eq!(filter.cycles.len(), 2);

    assert!(commands::build_filter("paused", &[], &[], None).is_err());
    assert!(commands::build_filter("all", &[], &["hourly".to_string()], None).is_err());
}

#[test]
fn test_load_config_missing_explicit_path() {
    let dir = TempDir::new().unwrap();
    let result = commands::load_config(Some(dir.path().join("nope.toml").as_path()));
    assert!(result.is_err());
}

#[test]
fn test_load_config_and_open_store() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("renew.toml");
    let data_path = dir.path().join("subs.toml");
    std::fs::write(
        &config_path,
        format!(
            "[data]\nfile = {:?}\n\n[display]\nspend_mode = \"average\"\n\n[forecast]\nupcoming_days = 14\n",
            data_path.display().to_string()
        ),
    )
    .unwrap();

    let config = commands::load_config(Some(config_path.as_path())).unwrap();
    assert_eq!(config.spend_mode, SpendMode::Average);
    assert_eq!(config.upcoming_days, 14);

    let store = commands::open_store(&config, None);
    assert_eq!(store.path(), data_path.as_path());

    let other = dir.path().join("other.json");
    let store = commands::open_store(&config, Some(other.as_path()));
    assert_eq!(store.path(), other.as_path());
}

// ========== Subscription Command Tests ==========

#[test]
fn test_cmd_add_and_list() {
    let dir = TempDir::new().unwrap();
    let store = setup_test_store(&dir);

    let subs = store.load().unwrap();
    assert_eq!(subs.len(), 3);
    assert_eq!(subs[2].id, "3");

    let filter = commands::build_filter("all", &[], &[], None).unwrap();
    let result = commands::cmd_list(&store, &filter, SortKey::NextBillAsc, ymd(2024, 7, 15), false);
    assert!(result.is_ok());
    let result = commands::cmd_list(&store, &filter, SortKey::NameAsc, ymd(2024, 7, 15), true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_list_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = SubscriptionStore::new(dir.path().join("empty.json"));
    let filter = commands::build_filter("all", &[], &[], None).unwrap();
    assert!(commands::cmd_list(&store, &filter, SortKey::NameAsc, ymd(2024, 7, 1), false).is_ok());
}

#[test]
fn test_cmd_add_rejects_negative_price() {
    let dir = TempDir::new().unwrap();
    let store = SubscriptionStore::new(dir.path().join("subs.json"));
    let new = commands::parse_new_subscription("Bad", -5.0, BillingCycle::Monthly, None, "", None)
        .unwrap();
    assert!(commands::cmd_add(&store, new).is_err());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_cmd_pause_resume_remove() {
    let dir = TempDir::new().unwrap();
    let store = setup_test_store(&dir);

    commands::cmd_set_active(&store, "netflix", false).unwrap();
    assert!(!store.load().unwrap()[0].is_active);

    // Pausing twice is a no-op
    commands::cmd_set_active(&store, "1", false).unwrap();
    assert!(!store.load().unwrap()[0].is_active);

    commands::cmd_set_active(&store, "Netflix", true).unwrap();
    assert!(store.load().unwrap()[0].is_active);

    commands::cmd_remove(&store, "2").unwrap();
    let names: Vec<String> = store.load().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Netflix", "Insurance"]);

    assert!(commands::cmd_remove(&store, "Hulu").is_err());
    assert!(commands::cmd_set_active(&store, "Hulu", true).is_err());
}

#[test]
fn test_cmd_edit_keeps_id() {
    let dir = TempDir::new().unwrap();
    let store = setup_test_store(&dir);

    let patch = commands::parse_patch(&EditArgs {
        price: Some(17.99),
        anchor: Some("2024-02-15".to_string()),
        link: Some("https://netflix.com/account".to_string()),
        ..EditArgs::default()
    })
    .unwrap();
    commands::cmd_edit(&store, "Netflix", &patch).unwrap();

    let subs = store.load().unwrap();
    assert_eq!(subs.len(), 3);
    assert_eq!(subs[0].id, "1");
    assert_eq!(subs[0].price, 17.99);
    assert_eq!(subs[0].anchor, Some(ymd(2024, 2, 15)));
    assert_eq!(subs[0].link.as_deref(), Some("https://netflix.com/account"));
    assert_eq!(subs[0].category, "Bills");

    // Nothing to change, unknown target, invalid value
    assert!(commands::cmd_edit(&store, "1", &commands::parse_patch(&EditArgs::default()).unwrap()).is_err());
    assert!(commands::cmd_edit(&store, "Hulu", &patch).is_err());
    let negative = commands::parse_patch(&EditArgs {
        price: Some(-1.0),
        ..EditArgs::default()
    })
    .unwrap();
    assert!(commands::cmd_edit(&store, "1", &negative).is_err());
    assert_eq!(store.load().unwrap()[0].price, 17.99);
}

// ========== Month / Spend Command Tests ==========

#[test]
fn test_cmd_month() {
    let dir = TempDir::new().unwrap();
    let store = setup_test_store(&dir);

    let july = MonthRef::new(2024, 6);
    assert!(commands::cmd_month(&store, july, ymd(2024, 7, 15), SpendMode::Average, false).is_ok());
    assert!(
        commands::cmd_month(&store, july, ymd(2024, 7, 15), SpendMode::Occurrences, true).is_ok()
    );

    // A month before every anchor has nothing to show
    let old = MonthRef::new(2023, 0);
    assert!(commands::cmd_month(&store, old, ymd(2024, 7, 15), SpendMode::Average, false).is_ok());
}

#[test]
fn test_cmd_summary_and_categories() {
    let dir = TempDir::new().unwrap();
    let store = setup_test_store(&dir);

    let july = MonthRef::new(2024, 6);
    assert!(commands::cmd_summary(&store, july, SpendMode::Occurrences, false).is_ok());
    assert!(commands::cmd_summary(&store, july, SpendMode::Average, true).is_ok());
    assert!(commands::cmd_categories(&store, false).is_ok());
    assert!(commands::cmd_categories(&store, true).is_ok());
}

#[test]
fn test_cmd_upcoming() {
    let dir = TempDir::new().unwrap();
    let store = setup_test_store(&dir);

    assert!(commands::cmd_upcoming(&store, ymd(2024, 7, 25), 10, false).is_ok());
    assert!(commands::cmd_upcoming(&store, ymd(2024, 7, 25), 0, true).is_ok());
}

#[test]
fn test_cmd_on_corrupt_store_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subs.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = SubscriptionStore::new(&path);

    assert!(commands::cmd_categories(&store, false).is_err());
    assert!(commands::cmd_upcoming(&store, ymd(2024, 7, 1), 30, false).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Netflix", 10), "Netflix");
    assert_eq!(truncate("A very long subscription name", 10), "A very ...");
    assert_eq!(truncate("Café Crème Monthly", 8), "Café ...");
}
