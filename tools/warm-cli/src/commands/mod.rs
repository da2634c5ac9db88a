//! CLI command implementations.

pub mod config;
pub mod warm;

use clap::{Args, Subcommand};

/// Arguments for the warm command.
#[derive(Args, Debug, Default)]
pub struct WarmArgs {
    /// Queue each request as a job instead of visiting inline.
    #[arg(long)]
    pub queue: bool,

    /// Only warm URLs matching these patterns (`*` wildcard).
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Skip URLs matching these patterns (`*` wildcard).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Skip URLs deeper than this many path segments.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Warm at most this many URLs.
    #[arg(long)]
    pub max_requests: Option<usize>,

    /// HTTP basic auth user.
    #[arg(short, long)]
    pub user: Option<String>,

    /// HTTP basic auth password.
    #[arg(short, long, requires = "user")]
    pub password: Option<String>,

    /// Accept invalid TLS certificates.
    #[arg(long)]
    pub insecure: bool,

    /// Ignore proxy environment variables.
    #[arg(long)]
    pub no_proxy: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Base URL of the site.
        #[arg(long, default_value = "http://localhost")]
        base_url: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
