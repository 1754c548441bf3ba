use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nova_delta::ElementHandle;
use thiserror::Error;

use crate::entry::ClasspathEntryView;

#[derive(Debug, Error)]
pub enum RootError {
    #[error("no package fragment roots for `{path}`: {message}")]
    Unavailable { path: PathBuf, message: String },
    #[error("io error while computing roots: {0}")]
    Io(#[from] std::io::Error),
}

/// Model-side queries the classpath diff needs.
pub trait RootProvider {
    /// Package fragment roots `entry` contributes to `project`.
    fn compute_roots(
        &self,
        project: &ElementHandle,
        entry: &ClasspathEntryView,
    ) -> Result<Vec<ElementHandle>, RootError>;

    /// Package fragments living under `output_location`.
    fn affected_fragments(
        &self,
        project: &ElementHandle,
        output_location: &Path,
    ) -> Vec<ElementHandle>;

    /// Whether a root at `path` is still referenced by a project other than
    /// `project`.
    fn is_shared_root(&self, _project: &ElementHandle, _path: &Path) -> bool {
        false
    }
}

/// Roots of entries that are no longer resolvable, keyed by entry path.
///
/// Owned by the caller and invalidated explicitly; nothing here is global.
#[derive(Clone, Debug, Default)]
pub struct RootCache {
    roots: HashMap<PathBuf, ElementHandle>,
}

impl RootCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        path: impl Into<PathBuf>,
        root: ElementHandle,
    ) -> Option<ElementHandle> {
        self.roots.insert(path.into(), root)
    }

    pub fn get(&self, path: &Path) -> Option<&ElementHandle> {
        self.roots.get(path)
    }

    pub fn invalidate(&mut self, path: &Path) -> Option<ElementHandle> {
        self.roots.remove(path)
    }

    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
