use std::path::Path;

use crate::entry::ClasspathEntryView;

/// Structural equivalence between classpath entries.
///
/// Two entries are equivalent when every field that influences what the
/// project sees on its build path is identical. Extra attributes and source
/// attachments are not compared here; they are diffed separately on entries
/// that already matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryMatcher {
    null_analysis: bool,
}

impl EntryMatcher {
    /// `null_analysis` makes external annotation paths significant.
    pub fn new(null_analysis: bool) -> Self {
        Self { null_analysis }
    }

    pub fn null_analysis(&self) -> bool {
        self.null_analysis
    }

    pub fn matches(&self, a: &ClasspathEntryView, b: &ClasspathEntryView) -> bool {
        if a.content_kind != b.content_kind
            || a.entry_kind != b.entry_kind
            || a.exported != b.exported
        {
            return false;
        }
        if a.path != b.path {
            return false;
        }
        if a.output_location != b.output_location {
            return false;
        }
        if a.inclusion_patterns != b.inclusion_patterns {
            return false;
        }
        if a.exclusion_patterns != b.exclusion_patterns {
            return false;
        }
        if self.null_analysis && a.external_annotation_path != b.external_annotation_path {
            return false;
        }
        a.is_modular == b.is_modular
    }

    /// Position of the first entry in `list` equivalent to `entry`.
    pub fn find_index(
        &self,
        list: &[ClasspathEntryView],
        entry: &ClasspathEntryView,
    ) -> Option<usize> {
        list.iter().position(|candidate| self.matches(candidate, entry))
    }

    pub fn contains(&self, list: &[ClasspathEntryView], entry: &ClasspathEntryView) -> bool {
        self.find_index(list, entry).is_some()
    }
}

/// Full structural equality of two classpaths together with their default
/// output locations. Unlike [`EntryMatcher`], attachments and attributes
/// count.
pub fn classpaths_equal(
    old: &[ClasspathEntryView],
    old_output: Option<&Path>,
    new: &[ClasspathEntryView],
    new_output: Option<&Path>,
) -> bool {
    old_output == new_output && old == new
}
