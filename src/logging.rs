//! Logging setup for the application.

use crate::config::{AppConfig, LogLevel};
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the logger from the application settings.
///
/// The `--log-level` argument sets the global filter; RUST_LOG, when set,
/// is still honored for per-module overrides.
pub fn init_logger(config: &AppConfig) {
    let level = match config.log_level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    };

    let env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = Builder::from_env(env);
    builder.filter_level(level);
    builder.init();

    log::debug!("logger initialized at {:?}", config.log_level);
}
