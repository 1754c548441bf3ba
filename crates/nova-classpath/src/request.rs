use std::path::{Path, PathBuf};

use nova_delta::ElementHandle;
use serde::{Deserialize, Serialize};

use crate::entry::ClasspathEntryView;

/// Raw and resolved classpath of one project at a point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathSnapshot {
    pub raw: Vec<ClasspathEntryView>,
    /// Default output folder of the project.
    #[serde(default)]
    pub output_location: Option<PathBuf>,
    pub resolved: Vec<ClasspathEntryView>,
}

impl ClasspathSnapshot {
    pub fn new(
        raw: Vec<ClasspathEntryView>,
        output_location: Option<PathBuf>,
        resolved: Vec<ClasspathEntryView>,
    ) -> Self {
        Self {
            raw,
            output_location,
            resolved,
        }
    }
}

/// The "old" half of a classpath change, captured before a build cycle.
#[derive(Clone, Debug)]
pub struct PendingClasspathChange {
    project: ElementHandle,
    old_raw: Vec<ClasspathEntryView>,
    old_output_location: Option<PathBuf>,
    old_resolved: Option<Vec<ClasspathEntryView>>,
}

impl PendingClasspathChange {
    pub fn new(project: ElementHandle, old: ClasspathSnapshot) -> Self {
        Self {
            project,
            old_raw: old.raw,
            old_output_location: old.output_location,
            old_resolved: Some(old.resolved),
        }
    }

    /// A project whose classpath was never resolved before.
    pub fn unresolved(
        project: ElementHandle,
        old_raw: Vec<ClasspathEntryView>,
        old_output_location: Option<PathBuf>,
    ) -> Self {
        Self {
            project,
            old_raw,
            old_output_location,
            old_resolved: None,
        }
    }

    pub fn project(&self) -> &ElementHandle {
        &self.project
    }

    /// Pairs the captured state with a freshly resolved snapshot.
    pub fn complete(self, new: ClasspathSnapshot) -> ClasspathChangeRequest {
        ClasspathChangeRequest {
            project: self.project,
            old_raw: self.old_raw,
            old_output_location: self.old_output_location,
            old_resolved: self.old_resolved,
            new,
        }
    }
}

/// Old and new classpath state of one project for one build cycle.
#[derive(Clone, Debug)]
pub struct ClasspathChangeRequest {
    project: ElementHandle,
    old_raw: Vec<ClasspathEntryView>,
    old_output_location: Option<PathBuf>,
    old_resolved: Option<Vec<ClasspathEntryView>>,
    new: ClasspathSnapshot,
}

impl ClasspathChangeRequest {
    pub fn project(&self) -> &ElementHandle {
        &self.project
    }

    pub fn old_raw(&self) -> &[ClasspathEntryView] {
        &self.old_raw
    }

    pub fn old_output_location(&self) -> Option<&Path> {
        self.old_output_location.as_deref()
    }

    /// `None` when the project had no resolved classpath yet.
    pub fn old_resolved(&self) -> Option<&[ClasspathEntryView]> {
        self.old_resolved.as_deref()
    }

    pub fn new_raw(&self) -> &[ClasspathEntryView] {
        &self.new.raw
    }

    pub fn new_output_location(&self) -> Option<&Path> {
        self.new.output_location.as_deref()
    }

    pub fn new_resolved(&self) -> &[ClasspathEntryView] {
        &self.new.resolved
    }
}
