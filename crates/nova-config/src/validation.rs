use crate::{ConfigWarning, LoggingConfig, NovaConfig};

/// Recoverable problems in an otherwise well-formed config.
pub(crate) fn validate(config: &NovaConfig) -> Vec<ConfigWarning> {
    logging_level_warning(&config.logging).into_iter().collect()
}

/// A level that `EnvFilter` rejects; `init_tracing` then falls back to `info`.
fn logging_level_warning(logging: &LoggingConfig) -> Option<ConfigWarning> {
    if logging.level.trim().is_empty() {
        return None;
    }
    let directives = LoggingConfig::level_directives(&logging.level);
    match tracing_subscriber::EnvFilter::try_new(&directives) {
        Ok(_) => None,
        Err(_) => Some(ConfigWarning::LoggingLevelInvalid {
            value: logging.level.clone(),
            normalized: directives,
        }),
    }
}
