pub mod output;
pub mod query;
pub mod sensors;
pub mod setup;
pub mod watch;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ptwater",
    version,
    about = "Putian Water CLI - query water meter balance, bills and sensor state"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable table instead of JSON
    #[arg(short = 't', long = "table", global = true)]
    pub table: bool,

    /// Verbose output (show HTTP requests/responses)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure portal credentials and meter settings
    Setup,

    /// Show what is configured
    Status,

    /// Remove stored credentials and settings
    Clear,

    /// Verify the stored credentials against the portal
    Test,

    /// Current meter balance
    Balance,

    /// Latest settled bill for the configured year
    Bill,

    /// Run one refresh cycle and print the sensor readings
    Sensors,

    /// Poll the portal on a schedule, printing sensor state each cycle
    Watch {
        /// Hours between refresh cycles
        #[arg(long = "interval-hours", default_value_t = 24)]
        interval_hours: u64,
    },
}
