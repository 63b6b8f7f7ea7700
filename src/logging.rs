//! Logging
//!
//! The cache engine and the manager never log through a global: they hold an
//! injected [`ContentLogger`]. [`TracingLogger`] forwards to `tracing`, and
//! [`init_logging`] installs a scoped `tracing-subscriber` for the lifetime of
//! the returned [`LoggingGuard`].
//!
//! ```ignore
//! let _logging = init_logging(&LogConfig::default())?;
//! let manager = ContentManager::new(Rc::new(TracingLogger));
//! ```

use crate::error::{ContentError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Logging capability handed to the cache engine and manager at construction.
pub trait ContentLogger {
    fn info(&self, category: &str, message: &str);
    fn warn(&self, category: &str, message: &str);
    fn error(&self, category: &str, message: &str);
}

/// Forwards every message to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl ContentLogger for TracingLogger {
    fn info(&self, category: &str, message: &str) {
        tracing::info!(category = category, "{message}");
    }

    fn warn(&self, category: &str, message: &str) {
        tracing::warn!(category = category, "{message}");
    }

    fn error(&self, category: &str, message: &str) {
        tracing::error!(category = category, "{message}");
    }
}

/// Subscriber settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of the human readable format
    pub json: bool,
    /// Write to this file through a non-blocking appender instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

/// Keeps the subscriber installed; logging is torn down when dropped.
pub struct LoggingGuard {
    _default: tracing::subscriber::DefaultGuard,
    _writer: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Install a `tracing-subscriber` as the default for the current thread.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| ContentError::Config(format!("Invalid log filter: {e}")))?;

    let (writer, worker) = match &config.file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.file.is_none());

    let default = if config.json {
        tracing::subscriber::set_default(builder.json().finish())
    } else {
        tracing::subscriber::set_default(builder.finish())
    };

    Ok(LoggingGuard {
        _default: default,
        _writer: worker,
    })
}
