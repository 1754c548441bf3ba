use std::fmt;
use std::path::{Path, PathBuf};

use crate::ChangeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceDeltaKind {
    Added,
    Removed,
    Changed,
}

impl ResourceDeltaKind {
    fn marker(self) -> char {
        match self {
            ResourceDeltaKind::Added => '+',
            ResourceDeltaKind::Removed => '-',
            ResourceDeltaKind::Changed => '*',
        }
    }
}

/// A raw change to a non-Java resource, reported by the resource layer.
///
/// The delta tree only stores these; it never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDelta {
    path: PathBuf,
    kind: ResourceDeltaKind,
}

impl ResourceDelta {
    pub fn new(path: impl Into<PathBuf>, kind: ResourceDeltaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ResourceDeltaKind {
        self.kind
    }
}

impl fmt::Display for ResourceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.path.display(), self.kind.marker())
    }
}

/// Change to a single extra classpath attribute of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDelta {
    pub name: String,
    pub kind: ChangeKind,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl AttributeDelta {
    pub fn added(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ChangeKind::Added,
            old_value: None,
            new_value: Some(value.into()),
        }
    }

    pub fn removed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ChangeKind::Removed,
            old_value: Some(value.into()),
            new_value: None,
        }
    }

    pub fn changed(
        name: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ChangeKind::Changed,
            old_value: Some(old_value.into()),
            new_value: Some(new_value.into()),
        }
    }
}

impl fmt::Display for AttributeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}[{}]", self.name, self.kind.marker())
    }
}
