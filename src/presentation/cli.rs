// Command-line surface
use crate::infrastructure::config::DEFAULT_CONFIG;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "quota-monitor",
    version,
    about = "Dashboard and threshold alarms for Bedrock service quotas"
)]
pub struct Cli {
    /// Configuration file, extension optional
    #[arg(long, global = true, env = "QUOTA_MONITOR_CONFIG", default_value = DEFAULT_CONFIG)]
    pub config: String,

    /// AWS region, overrides aws.region and the SDK environment
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Fetch quotas and print the dashboard and alarms that would be written
    Plan,
    /// Fetch quotas, then create or update the topic, dashboard and alarms
    Apply,
}
