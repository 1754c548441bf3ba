use std::collections::BTreeSet;

use serde::de::DeserializeOwned;

/// Diagnostics produced while loading a Nova config.
///
/// Loading is best effort: callers always get a `NovaConfig` when
/// deserialization succeeds, plus whatever looked wrong in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the input TOML that `NovaConfig` does not know.
    ///
    /// Collected via `serde_ignored`, so nested tables use the full path (for
    /// example `classpath.null_analyss`).
    pub unknown_keys: Vec<String>,
    /// Invalid but recoverable values.
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.warnings.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    LoggingLevelInvalid { value: String, normalized: String },
}

/// Parses `text` as `T`, collecting every key `T` does not declare.
///
/// Keys come back sorted as dotted table paths (`classpath.null_analyss`).
pub(crate) fn parse_collecting_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = BTreeSet::new();
    let value = serde_ignored::deserialize(toml::de::Deserializer::new(text), |path| {
        unknown.insert(dotted_key(&path));
    })?;
    Ok((value, unknown.into_iter().collect()))
}

/// `serde_ignored` renders paths with a leading separator.
fn dotted_key(path: &serde_ignored::Path<'_>) -> String {
    path.to_string().trim_start_matches('.').to_owned()
}
