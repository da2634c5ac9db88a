//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use edge_warm::{resolve, ConfigProvider, FeatureGate, SYNC_CONNECTION};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};
use crate::output::plural;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { base_url, force } => init_config(&base_url, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    if let Some(path) = &ctx.config_path {
        ctx.output.kv("file", &path.display().to_string());
    }

    let config = &ctx.config;

    ctx.output.info("[site]");
    ctx.output.kv("base_url", config.site.base_url.as_deref().unwrap_or("(none)"));
    ctx.output.kv("routes", &plural(config.site.routes.len(), "route", "routes"));
    if let Some(file) = &config.site.routes_file {
        ctx.output.kv("routes_file", file);
    }

    ctx.output.info("[static_caching]");
    ctx.output.kv(
        "strategy",
        config.static_caching.strategy.as_deref().unwrap_or("(disabled)"),
    );
    let connection = resolve(
        config.static_caching.queue_connection.as_deref(),
        config.default_queue_connection(),
    );
    ctx.output.kv("warm connection", connection.as_str());
    if let Some(queue) = &config.static_caching.queue {
        ctx.output.kv("warm queue", queue);
    }

    ctx.output.info("[queue]");
    ctx.output.kv("default", &config.queue.default);
    for (name, connection) in &config.queue.connections {
        ctx.output
            .list_item(&format!("{} ({:?})", name, connection.driver).to_lowercase());
    }

    Ok(())
}

fn init_config(base_url: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(base_url))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config, ctx);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn check_config(config: &CliConfig, ctx: &Context) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if !FeatureGate::new(config).is_enabled() {
        warnings.push("static_caching.strategy is not set; warming is disabled".to_string());
    }

    match &config.site.base_url {
        Some(url) if reqwest::Url::parse(url).is_err() => {
            errors.push(format!("site.base_url '{}' is not a valid URL", url));
        }
        Some(_) => {}
        None => warnings.push("site.base_url is not set; routes must be absolute URLs".to_string()),
    }

    if config.site.routes.is_empty() && config.site.routes_file.is_none() {
        warnings.push("no routes configured".to_string());
    }

    if let Some(file) = &config.site.routes_file {
        if !ctx.resolve_path(file).exists() {
            errors.push(format!("site.routes_file '{}' does not exist", file));
        }
    }

    if config.static_caching.timeout_secs == 0 {
        errors.push("static_caching.timeout_secs must be greater than 0".to_string());
    }

    let connection = resolve(
        config.static_caching.queue_connection.as_deref(),
        config.default_queue_connection(),
    );
    if !config.is_sync_connection(connection.as_str())
        && !config.queue.connections.contains_key(connection.as_str())
    {
        errors.push(format!(
            "queue connection '{}' is not defined under [queue.connections] (use '{}' to disable queueing)",
            connection, SYNC_CONNECTION
        ));
    }

    (errors, warnings)
}
