//! Wave search - command line entry point
//!
//! Compiles search queries, builds them from form-style flags, and sorts wave
//! summary files with the compiled ordering.

mod commands;

use clap::Command;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wave_search::{config::Config, error};

fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    error::install_error_handlers()?;

    // Load configuration from file and/or environment variables
    let config = Config::load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load configuration: {}", e))?;
    config.validate().map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    // Initialize logging
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.default_level));

    // Apply dependency filters if configured
    if let Some(dep_filter) = &config.logging.dependency_filter {
        let filter_string = format!("{},{}", env_filter, dep_filter);
        env_filter = EnvFilter::try_new(&filter_string).unwrap_or(env_filter);
    }

    // Logs go to stderr so stdout stays machine-readable
    let registry = tracing_subscriber::registry().with(env_filter);
    if config.logging.format == "json" {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_target(false).with_writer(std::io::stderr)).init();
    }

    // Define base CLI structure
    let base_app = Command::new("wave-search")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Official Unofficial, Inc.")
        .about("Wave search query compiler")
        .subcommand_required(true)
        .arg_required_else_help(true);

    // Register all command modules
    let app = commands::register_commands(base_app);

    // Parse command line arguments
    let matches = app.get_matches();

    // Handle commands based on matches
    commands::handle_commands(matches, &config)?;

    debug!("Execution completed successfully");
    Ok(())
}
