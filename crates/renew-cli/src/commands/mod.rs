//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, store, argument parsing)
//! - `month` - Month view grouped into upcoming and past billing dates
//! - `serve` - Web server command
//! - `spend` - Summary, category breakdown and upcoming charges
//! - `subscriptions` - Subscription management commands (list, add, remove, pause)

pub mod core;
pub mod month;
pub mod serve;
pub mod spend;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use core::*;
pub use month::*;
pub use serve::*;
pub use spend::*;
pub use subscriptions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
