use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for attendsync
/// Offline-first attendance capture with sync to a shared remote sheet
#[derive(Parser)]
#[command(
    name = "attendsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Capture attendance records offline and sync them to a remote sheet",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Treat the device as offline: capture locally, never contact the remote
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filtering and paging shared by local and remote listings.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// all, pending, synced, today or week
    #[arg(long, default_value = "all")]
    pub filter: String,

    /// Case-insensitive match on first name, last name or action
    #[arg(long)]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Print the effective configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Capture an attendance record and upload it when possible
    Capture {
        /// First name
        first_name: String,

        /// Last name
        last_name: String,

        /// TIME_IN, LUNCH_OUT, LUNCH_IN, TIME_OUT, UNIVERSITY_ACTIVITY
        /// (or IN, LOUT, LIN, OUT, UA). Suggested from the hour when omitted.
        #[arg(long = "action", short = 'a')]
        action: Option<String>,

        /// Instant of the event (RFC 3339); defaults to now
        #[arg(long = "at")]
        at: Option<String>,
    },

    /// List local records
    List {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Show how many records are waiting to sync
    Pending,

    /// Upload pending records
    Sync {
        /// Upload only this record
        #[arg(long = "id")]
        id: Option<i64>,
    },

    /// Show the organization-wide records held by the remote
    Remote {
        #[command(flatten)]
        history: HistoryArgs,

        /// Ignore the cached copy and fetch again
        #[arg(long = "refresh")]
        refresh: bool,
    },

    /// Keep running and sync pending records periodically
    Watch {
        /// Seconds between sync attempts (defaults to the configured interval)
        #[arg(long = "interval")]
        interval: Option<u64>,
    },
}
