//! Configuration and logging setup for Nova's model change detection.
//!
//! Config lives in a TOML file:
//!
//! ```toml
//! [classpath]
//! null_analysis = false
//! retry_uncached_resolution = true
//!
//! [delta]
//! log_trees = false
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every section and key is optional.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod diagnostics;
mod validation;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};

const LEVEL_NAMES: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovaConfig {
    #[serde(default)]
    pub classpath: ClasspathConfig,
    #[serde(default)]
    pub delta: DeltaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Options for classpath change detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathConfig {
    /// Treat external annotation paths as part of an entry's identity.
    ///
    /// Matches projects that run annotation-based null analysis.
    #[serde(default)]
    pub null_analysis: bool,

    /// Retry once against an uncached resolution when the resolved classpath
    /// cache was cleared while it was being read.
    #[serde(default = "ClasspathConfig::default_retry_uncached_resolution")]
    pub retry_uncached_resolution: bool,
}

impl ClasspathConfig {
    fn default_retry_uncached_resolution() -> bool {
        true
    }
}

impl Default for ClasspathConfig {
    fn default() -> Self {
        Self {
            null_analysis: false,
            retry_uncached_resolution: Self::default_retry_uncached_resolution(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaConfig {
    /// Dump every finished delta tree at `debug` level.
    #[serde(default)]
    pub log_trees: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging level for all Nova crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file path.
    ///
    /// If the file cannot be opened, file logging is disabled while other sinks
    /// remain active.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// Maps the configured level onto `EnvFilter` directives.
    ///
    /// Bare level names are matched case-insensitively and `warning` is
    /// accepted for `warn`. Anything else is passed through as a directive
    /// string such as `info,nova.classpath=debug`.
    pub(crate) fn level_directives(level: &str) -> String {
        let level = level.trim();
        if level.is_empty() {
            return Self::default_level();
        }

        let lowered = level.to_ascii_lowercase();
        if lowered == "warning" {
            "warn".to_owned()
        } else if LEVEL_NAMES.contains(&lowered.as_str()) {
            lowered
        } else {
            level.to_owned()
        }
    }

    /// Effective filter: the configured level with `RUST_LOG` appended.
    ///
    /// Falls back to `RUST_LOG` alone, then to the configured level alone,
    /// then to `info` when the earlier candidates do not parse.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = Self::level_directives(&self.level);
        let mut candidates = Vec::with_capacity(3);
        if let Some(from_env) = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
        {
            candidates.push(format!("{configured},{from_env}"));
            candidates.push(from_env);
        }
        candidates.push(configured);

        candidates
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // `Display` includes a source snippet of the input; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl NovaConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a config file and return diagnostics (unknown keys, invalid
    /// values) alongside it.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::parse_collecting_unknown_keys::<NovaConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.warnings.extend(validation::validate(&config));

        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "nova.config", key = %key, "ignoring unknown config key");
        }

        Ok((config, diagnostics))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Append-mode log file shared by every event.
///
/// Each formatted event reaches the file in a single `write` on `&File`, so no
/// lock is taken.
struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.0
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber described by `config`.
///
/// Only the first call in a process has an effect; later calls are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            // `cargo test` only captures output written through the stdlib print macros.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(io::stderr));
            }
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(LogFile(file)));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "nova.config",
                    path = %path.display(),
                    "failed to open log file; file logging is disabled"
                );
            }
        }
    });
}
