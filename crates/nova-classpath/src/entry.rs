use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Extra attribute carrying the location of a prebuilt library index.
pub const INDEX_LOCATION_ATTRIBUTE: &str = "index_location";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Source,
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Source,
    Library,
    Project,
    Variable,
    Container,
}

/// One entry of a project classpath, raw or resolved.
///
/// Entries are immutable snapshots; a diff always compares two of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathEntryView {
    pub content_kind: ContentKind,
    pub entry_kind: EntryKind,
    pub path: PathBuf,
    #[serde(default)]
    pub exported: bool,
    /// Per-entry output folder overriding the project's default one.
    #[serde(default)]
    pub output_location: Option<PathBuf>,
    #[serde(default)]
    pub inclusion_patterns: Vec<String>,
    #[serde(default)]
    pub exclusion_patterns: Vec<String>,
    #[serde(default)]
    pub source_attachment_path: Option<PathBuf>,
    #[serde(default)]
    pub source_attachment_root_path: Option<PathBuf>,
    /// Only significant when null analysis is enabled for the owning project.
    #[serde(default)]
    pub external_annotation_path: Option<String>,
    #[serde(default)]
    pub is_modular: bool,
    #[serde(default)]
    pub extra_attributes: IndexMap<String, String>,
}

impl ClasspathEntryView {
    fn new(content_kind: ContentKind, entry_kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        Self {
            content_kind,
            entry_kind,
            path: path.into(),
            exported: false,
            output_location: None,
            inclusion_patterns: Vec::new(),
            exclusion_patterns: Vec::new(),
            source_attachment_path: None,
            source_attachment_root_path: None,
            external_annotation_path: None,
            is_modular: false,
            extra_attributes: IndexMap::new(),
        }
    }

    pub fn source(path: impl Into<PathBuf>) -> Self {
        Self::new(ContentKind::Source, EntryKind::Source, path)
    }

    pub fn library(path: impl Into<PathBuf>) -> Self {
        Self::new(ContentKind::Binary, EntryKind::Library, path)
    }

    pub fn project(path: impl Into<PathBuf>) -> Self {
        Self::new(ContentKind::Source, EntryKind::Project, path)
    }

    pub fn container(path: impl Into<PathBuf>) -> Self {
        Self::new(ContentKind::Source, EntryKind::Container, path)
    }

    pub fn variable(path: impl Into<PathBuf>) -> Self {
        Self::new(ContentKind::Binary, EntryKind::Variable, path)
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    pub fn modular(mut self, is_modular: bool) -> Self {
        self.is_modular = is_modular;
        self
    }

    pub fn with_output_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_location = Some(path.into());
        self
    }

    pub fn with_inclusion_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusion_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclusion_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_attachment(
        mut self,
        path: Option<PathBuf>,
        root_path: Option<PathBuf>,
    ) -> Self {
        self.source_attachment_path = path;
        self.source_attachment_root_path = root_path;
        self
    }

    pub fn with_external_annotation_path(mut self, path: impl Into<String>) -> Self {
        self.external_annotation_path = Some(path.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_attributes.insert(name.into(), value.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of a prebuilt index for this library, if one is configured.
    pub fn index_location(&self) -> Option<&str> {
        self.extra_attributes
            .get(INDEX_LOCATION_ATTRIBUTE)
            .map(String::as_str)
    }

    /// Inclusion patterns made absolute against this entry's path.
    pub fn full_inclusion_patterns(&self) -> Vec<String> {
        full_patterns(&self.path, &self.inclusion_patterns)
    }

    /// Exclusion patterns made absolute against this entry's path.
    pub fn full_exclusion_patterns(&self) -> Vec<String> {
        full_patterns(&self.path, &self.exclusion_patterns)
    }
}

fn full_patterns(base: &Path, patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|pattern| base.join(pattern).to_string_lossy().into_owned())
        .collect()
}
