//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rmkit - inspect the daemon utility primitives
#[derive(Parser)]
#[command(name = "rmkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the rmkit lock, byte-order and time primitives")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render a time pattern into a bounded buffer
    TimeFormat {
        /// strftime-style pattern (defaults to the configured format)
        #[arg(short, long)]
        format: Option<String>,

        /// Buffer size in bytes; zero or less writes nothing
        #[arg(short, long, allow_negative_numbers = true)]
        max: Option<isize>,

        /// RFC 3339 timestamp to render instead of the current time
        #[arg(long, value_name = "TIME")]
        at: Option<String>,
    },

    /// Show the byte-order conversions of a 64-bit value
    Swap {
        /// Decimal or 0x-prefixed hexadecimal value
        value: String,
    },

    /// Compare two values with the sentinel tolerance
    #[command(allow_negative_numbers = true)]
    Fuzzy { a: f64, b: f64 },

    /// Increment a shared counter from several threads under the lock
    LockCheck {
        /// Number of threads
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Increments per thread
        #[arg(short, long, default_value_t = 10_000)]
        rounds: u64,
    },

    /// Parse a decimal prefix the way strtoul does
    Atoul { text: String },
}
