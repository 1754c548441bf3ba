use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use nova_classpath::{ClasspathEntryView, RootError, RootProvider};
use nova_delta::{ElementHandle, ElementKind};

mod diff_scenarios;

/// One package fragment root per entry, named after the entry path.
#[derive(Default)]
pub struct PathRoots {
    fragments: HashMap<PathBuf, Vec<ElementHandle>>,
    shared: HashSet<PathBuf>,
}

impl PathRoots {
    pub fn with_fragments(mut self, output: &str, fragments: Vec<ElementHandle>) -> Self {
        self.fragments.insert(PathBuf::from(output), fragments);
        self
    }

    pub fn with_shared(mut self, path: &str) -> Self {
        self.shared.insert(PathBuf::from(path));
        self
    }
}

impl RootProvider for PathRoots {
    fn compute_roots(
        &self,
        project: &ElementHandle,
        entry: &ClasspathEntryView,
    ) -> Result<Vec<ElementHandle>, RootError> {
        Ok(vec![root(project, &entry.path.to_string_lossy())])
    }

    fn affected_fragments(&self, _project: &ElementHandle, output: &Path) -> Vec<ElementHandle> {
        self.fragments.get(output).cloned().unwrap_or_default()
    }

    fn is_shared_root(&self, _project: &ElementHandle, path: &Path) -> bool {
        self.shared.contains(path)
    }
}

pub fn root(project: &ElementHandle, path: &str) -> ElementHandle {
    project.child(ElementKind::PackageFragmentRoot, path)
}
