//! ANSI color helper utilities for terminal output.

use crate::models::record::SyncStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

pub fn color_for_status(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Pending => YELLOW,
        SyncStatus::Synced => GREEN,
    }
}

pub fn colorize_status(status: SyncStatus) -> String {
    format!("{}{}{}", color_for_status(status), status.to_db_str(), RESET)
}

/// Grey for placeholders such as "--", unchanged otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
