//! Thai Food MCP Server
//!
//! An MCP server exposing four read-only Thai food collections (a food-term
//! dictionary, cookbook metadata, a recipe library and a food encyclopedia),
//! each fetched from a remote JSON document and cached in memory with a TTL.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod server;
pub mod tools;
pub mod utils;

/// Re-export common types
pub use crate::config::AppConfig;
pub use crate::data::FoodService;
pub use crate::error::{Error, Result};
pub use crate::server::FoodServer;

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const NAME: &str = "thai-food-mcp";

const DEFAULT_LOG_FILE: &str = "thai-food-mcp.log";

/// Initialize logging system with configuration
///
/// Console output goes to stderr so the stdio transport keeps stdout for
/// protocol messages. File output rolls daily.
///
/// # Errors
/// Returns an error if logging system initialization fails
pub fn init_logging_with_config(config: &crate::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match config.level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = match (&config.file_path, config.enable_file) {
        (Some(file_path), true) => {
            let path = std::path::Path::new(file_path);
            let log_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let log_file_name = path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new(DEFAULT_LOG_FILE));

            std::fs::create_dir_all(log_dir).map_err(|e| {
                error::Error::Initialization(format!("Failed to create log directory: {e}"))
            })?;
            Some(tracing_appender::rolling::daily(log_dir, log_file_name))
        }
        _ => None,
    };

    // Fall back to the console when no other sink is configured
    let console = config.enable_console || file_appender.is_none();

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .compact()
    });
    let file_layer = file_appender.map(|appender| {
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| error::Error::Initialization(e.to_string()))?;

    Ok(())
}
