//! Warm CLI - Static cache warming for edge SSR sites.
//!
//! Commands:
//! - `warm warm` - Visit every route (or queue a job per route)
//! - `warm config` - Manage configuration
//!
//! Exit codes: 0 on success, 1 when static caching is disabled or the run
//! cannot start, 2 when a warm job could not be queued.

mod commands;
mod config;
mod context;
mod fetcher;
mod logging;
mod output;
mod queue;
mod report;
mod sitemap;

use clap::{Parser, Subcommand};
use edge_warm::{EXIT_FAILURE, EXIT_SUCCESS};

use commands::{ConfigArgs, WarmArgs};

/// Warm CLI - Warm the static cache of an edge SSR site
#[derive(Parser)]
#[command(name = "warm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Warm the static cache
    Warm(WarmArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(EXIT_FAILURE);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Warm(args) => commands::warm::run(args, &ctx).await.map(|s| s.code()),
        Commands::Config(args) => commands::config::run(args, &ctx).await.map(|_| EXIT_SUCCESS),
    };

    match result {
        Ok(EXIT_SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            std::process::exit(EXIT_FAILURE);
        }
    }
}
