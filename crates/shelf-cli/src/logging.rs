//! Diagnostic logging
//!
//! Logging is off unless `SHELF_LOG` is set to a level such as `debug`.
//! Output goes to the configured `log_file`, or to stderr when none is set.

use std::fs::File;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_core::Config;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "SHELF_LOG";

/// Initialize logging if `SHELF_LOG` is set
pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "shelf_core={},shelf_cli={}",
        log_level, log_level
    ));

    // Ignore the error if a subscriber is already installed
    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();
            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
