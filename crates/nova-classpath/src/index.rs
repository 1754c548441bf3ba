use std::path::PathBuf;

use nova_delta::ElementHandle;
use url::Url;

use crate::entry::{ClasspathEntryView, EntryKind};
use crate::matcher::EntryMatcher;
use crate::request::ClasspathChangeRequest;
use crate::roots::RootProvider;

/// Request for the search index manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexCommand {
    IndexSourceFolder {
        project: ElementHandle,
        path: PathBuf,
        inclusion_patterns: Vec<String>,
        exclusion_patterns: Vec<String>,
    },
    RemoveSourceFolderFromIndex {
        project: ElementHandle,
        path: PathBuf,
        inclusion_patterns: Vec<String>,
        exclusion_patterns: Vec<String>,
    },
    IndexLibrary {
        project: ElementHandle,
        path: PathBuf,
        index_url: Option<String>,
    },
    RemoveIndex {
        path: PathBuf,
    },
    /// Cancel queued indexing jobs whose target lives under `path`.
    DiscardJobs {
        path: String,
    },
}

/// Derives index maintenance commands from a classpath change.
///
/// Runs over the same request as [`crate::ClasspathDiff`] but never touches
/// the delta tree.
pub struct IndexCommandEmitter<'a> {
    roots: &'a dyn RootProvider,
    matcher: EntryMatcher,
}

impl<'a> IndexCommandEmitter<'a> {
    pub fn new(roots: &'a dyn RootProvider, matcher: EntryMatcher) -> Self {
        Self { roots, matcher }
    }

    pub fn emit(&self, request: &ClasspathChangeRequest) -> Vec<IndexCommand> {
        let project = request.project();
        let old = request.old_resolved().unwrap_or_default();
        let new = request.new_resolved();
        let mut commands = Vec::new();

        for old_entry in old {
            if self.matcher.contains(new, old_entry) {
                continue;
            }
            match old_entry.entry_kind {
                EntryKind::Source => commands.push(IndexCommand::RemoveSourceFolderFromIndex {
                    project: project.clone(),
                    path: old_entry.path.clone(),
                    inclusion_patterns: old_entry.full_inclusion_patterns(),
                    exclusion_patterns: old_entry.full_exclusion_patterns(),
                }),
                EntryKind::Library => {
                    let still_present = new.iter().any(|entry| entry.path == old_entry.path);
                    if !still_present && !self.roots.is_shared_root(project, &old_entry.path) {
                        commands.push(IndexCommand::DiscardJobs {
                            path: old_entry.path.to_string_lossy().into_owned(),
                        });
                        commands.push(IndexCommand::RemoveIndex {
                            path: old_entry.path.clone(),
                        });
                    }
                }
                EntryKind::Project | EntryKind::Variable | EntryKind::Container => {}
            }
        }

        for new_entry in new {
            let matched = self.matcher.find_index(old, new_entry);
            match new_entry.entry_kind {
                EntryKind::Library => {
                    self.library_commands(project, old, new_entry, &mut commands)
                }
                EntryKind::Source if matched.is_none() => {
                    commands.push(IndexCommand::IndexSourceFolder {
                        project: project.clone(),
                        path: new_entry.path.clone(),
                        inclusion_patterns: new_entry.full_inclusion_patterns(),
                        exclusion_patterns: new_entry.full_exclusion_patterns(),
                    })
                }
                _ => {}
            }
        }

        tracing::debug!(
            target: "nova.classpath",
            project = %project,
            commands = commands.len(),
            "index commands emitted"
        );
        commands
    }

    fn library_commands(
        &self,
        project: &ElementHandle,
        old: &[ClasspathEntryView],
        entry: &ClasspathEntryView,
        commands: &mut Vec<IndexCommand>,
    ) {
        let new_url = entry.index_location();
        let mut changed = true;

        if let Some(old_entry) = old.iter().find(|old_entry| old_entry.path == entry.path) {
            match (old_entry.index_location(), new_url) {
                (None, None) => changed = false,
                (Some(old_url), Some(new_url)) => changed = !index_urls_equal(old_url, new_url),
                (Some(_), None) => commands.push(IndexCommand::RemoveIndex {
                    path: entry.path.clone(),
                }),
                (None, Some(_)) => {}
            }
        }

        if changed {
            commands.push(IndexCommand::IndexLibrary {
                project: project.clone(),
                path: entry.path.clone(),
                index_url: new_url.map(str::to_owned),
            });
        }
    }
}

/// URL equality of two index locations, falling back to plain string
/// equality when either side does not parse.
pub fn index_urls_equal(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
