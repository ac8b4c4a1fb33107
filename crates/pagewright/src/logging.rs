//! Subscriber setup for suite runs.
//!
//! `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` in
//! showcase mode. Output goes to stderr, or without ANSI colors to a log
//! file (time, level, target, message per line).

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::SuiteConfig;
use crate::result::PagewrightResult;

/// Log file name used when a suite asks for file logging without a path
pub const DEFAULT_LOG_FILE: &str = "logfile.log";

/// Logging options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Log at `debug` instead of `info`
    pub debug: bool,
    /// Append to this file instead of writing to stderr
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    /// `info` to stderr
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug level in showcase mode; [`DEFAULT_LOG_FILE`] when the suite
    /// asks for file logging
    #[must_use]
    pub fn from_suite(suite: &SuiteConfig) -> Self {
        Self {
            debug: suite.debug_showcase,
            log_file: suite.log_to_file.then(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// Log at `debug`
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Append to `path`
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Filter directive used when `RUST_LOG` is unset
    #[must_use]
    pub const fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed; the call is then
/// a no-op.
pub fn init(config: &LogConfig) -> PagewrightResult<bool> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let (stderr_layer, file_layer) = match config.log_file {
        Some(ref path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => (Some(fmt::layer().with_writer(std::io::stderr)), None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(?config, "logging initialized");
    }
    Ok(installed)
}
