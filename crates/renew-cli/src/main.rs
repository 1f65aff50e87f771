//! Renew CLI - Subscription renewal tracker
//!
//! Usage:
//!   renew add --name Netflix --price 15.49 --cycle monthly --anchor 2024-01-31
//!   renew edit Netflix --price 17.99     Change fields, keeping the ID
//!   renew month --year 2024 --month 7    Billing dates grouped by day
//!   renew summary --mode occurrences     Monthly and yearly totals
//!   renew serve --port 3000              Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let store = commands::open_store(&config, cli.file.as_deref());

    match cli.command {
        Commands::List {
            sort,
            status,
            category,
            cycle,
            query,
        } => {
            let sort = commands::parse_or(sort.as_deref(), config.sort)?;
            let filter = commands::build_filter(&status, &category, &cycle, query)?;
            commands::cmd_list(&store, &filter, sort, commands::today(), cli.json)
        }
        Commands::Add {
            name,
            price,
            cycle,
            every,
            unit,
            anchor,
            category,
            link,
        } => {
            let billing_cycle = commands::parse_cycle(&cycle, every, unit.as_deref())?;
            let new = commands::parse_new_subscription(
                &name,
                price,
                billing_cycle,
                anchor.as_deref(),
                &category,
                link,
            )?;
            commands::cmd_add(&store, new)
        }
        Commands::Edit {
            id_or_name,
            changes,
        } => {
            let patch = commands::parse_patch(&changes)?;
            commands::cmd_edit(&store, &id_or_name, &patch)
        }
        Commands::Remove { id_or_name } => commands::cmd_remove(&store, &id_or_name),
        Commands::Pause { id_or_name } => commands::cmd_set_active(&store, &id_or_name, false),
        Commands::Resume { id_or_name } => commands::cmd_set_active(&store, &id_or_name, true),
        Commands::Month {
            year,
            month,
            today,
            mode,
        } => {
            let today = commands::parse_date(today.as_deref(), "--today")?
                .unwrap_or_else(commands::today);
            let month = commands::resolve_month(year, month, today)?;
            let mode = commands::parse_or(mode.as_deref(), config.spend_mode)?;
            commands::cmd_month(&store, month, today, mode, cli.json)
        }
        Commands::Summary { mode } => {
            let mode = commands::parse_or(mode.as_deref(), config.spend_mode)?;
            let month = renew_core::MonthRef::from_date(commands::today());
            commands::cmd_summary(&store, month, mode, cli.json)
        }
        Commands::Categories => commands::cmd_categories(&store, cli.json),
        Commands::Upcoming { days, from } => {
            let from = commands::parse_date(from.as_deref(), "--from")?
                .unwrap_or_else(commands::today);
            let days = days.unwrap_or(config.upcoming_days);
            commands::cmd_upcoming(&store, from, days, cli.json)
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            commands::cmd_serve(store, &config, &host, port).await
        }
    }
}
