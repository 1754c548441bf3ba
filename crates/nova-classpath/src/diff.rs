use std::path::{Path, PathBuf};

use bitflags::bitflags;
use nova_delta::{ChangeFlags, ChangeKind, DeltaNode, ElementHandle};

use crate::attributes::{diff_extra_attributes, source_attachment_flags};
use crate::entry::{ClasspathEntryView, EntryKind};
use crate::matcher::{classpaths_equal, EntryMatcher};
use crate::request::ClasspathChangeRequest;
use crate::roots::{RootCache, RootProvider};

bitflags! {
    /// Aggregate outcome of diffing one project's classpath.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ResultFlags: u32 {
        const HAS_DELTA = 1;
        const HAS_PROJECT_CHANGE = 1 << 1;
        const HAS_LIBRARY_CHANGE = 1 << 2;
    }
}

impl ResultFlags {
    pub const NO_DELTA: Self = Self::empty();
}

/// Root flags that invalidate whatever a root has cached about its contents.
const CLOSING_FLAGS: ChangeFlags = ChangeFlags::SOURCE_ATTACHED
    .union(ChangeFlags::SOURCE_DETACHED)
    .union(ChangeFlags::REMOVED_FROM_CLASSPATH);

/// One step produced by [`ClasspathDiff::diff`], in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEvent {
    /// Leaf delta to insert into the cycle's delta tree.
    Delta(DeltaNode),
    /// Discard the cached value of a classpath container.
    ForgetContainer {
        project: ElementHandle,
        path: PathBuf,
    },
    RefreshExternalArchives {
        project: ElementHandle,
    },
    ResetDependentCaches {
        project: ElementHandle,
    },
    CloseRoot {
        root: ElementHandle,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasspathDiffOutcome {
    pub events: Vec<ClasspathEvent>,
    pub flags: ResultFlags,
}

impl ClasspathDiffOutcome {
    pub fn deltas(&self) -> impl Iterator<Item = &DeltaNode> {
        self.events.iter().filter_map(|event| match event {
            ClasspathEvent::Delta(delta) => Some(delta),
            _ => None,
        })
    }

    pub fn closed_roots(&self) -> impl Iterator<Item = &ElementHandle> {
        self.events.iter().filter_map(|event| match event {
            ClasspathEvent::CloseRoot { root } => Some(root),
            _ => None,
        })
    }

    fn push_delta(&mut self, element: ElementHandle, kind: ChangeKind, flags: ChangeFlags) {
        self.events
            .push(ClasspathEvent::Delta(DeltaNode::leaf(element, kind, flags)));
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffOptions {
    pub null_analysis: bool,
}

/// Computes the events describing how one project's classpath changed.
///
/// The diff is pure: it reads the request, the root provider and the root
/// cache, and returns events for a caller to apply.
pub struct ClasspathDiff<'a> {
    roots: &'a dyn RootProvider,
    cache: &'a RootCache,
    matcher: EntryMatcher,
}

impl<'a> ClasspathDiff<'a> {
    pub fn new(roots: &'a dyn RootProvider, cache: &'a RootCache, options: DiffOptions) -> Self {
        Self {
            roots,
            cache,
            matcher: EntryMatcher::new(options.null_analysis),
        }
    }

    pub fn matcher(&self) -> EntryMatcher {
        self.matcher
    }

    pub fn diff(&self, request: &ClasspathChangeRequest) -> ClasspathDiffOutcome {
        let project = request.project();
        let mut out = ClasspathDiffOutcome::default();

        self.diff_raw(request, &mut out);

        let Some(old_resolved) = request.old_resolved() else {
            // First resolution: nothing to compare entries against.
            out.push_delta(
                project.clone(),
                ChangeKind::Changed,
                ChangeFlags::RESOLVED_CLASSPATH_CHANGED,
            );
            out.flags |= ResultFlags::HAS_DELTA;
            out.events.push(ClasspathEvent::RefreshExternalArchives {
                project: project.clone(),
            });
            self.log_outcome(project, &out);
            return out;
        };
        let new_resolved = request.new_resolved();

        if classpaths_equal(
            old_resolved,
            request.old_output_location(),
            new_resolved,
            request.new_output_location(),
        ) {
            self.log_outcome(project, &out);
            return out;
        }

        out.push_delta(
            project.clone(),
            ChangeKind::Changed,
            ChangeFlags::RESOLVED_CLASSPATH_CHANGED,
        );
        out.flags |= ResultFlags::HAS_DELTA;
        out.events.push(ClasspathEvent::RefreshExternalArchives {
            project: project.clone(),
        });
        out.events.push(ClasspathEvent::ResetDependentCaches {
            project: project.clone(),
        });

        for (i, old_entry) in old_resolved.iter().enumerate() {
            match self.matcher.find_index(new_resolved, old_entry) {
                None => self.removed_entry(project, old_entry, &mut out),
                Some(j) => {
                    self.matched_entry(project, old_entry, &new_resolved[j], i == j, &mut out)
                }
            }
        }

        for new_entry in new_resolved {
            if self.matcher.contains(old_resolved, new_entry) {
                continue;
            }
            match new_entry.entry_kind {
                EntryKind::Project => {
                    out.flags |= ResultFlags::HAS_PROJECT_CHANGE;
                    continue;
                }
                EntryKind::Library => out.flags |= ResultFlags::HAS_LIBRARY_CHANGE,
                _ => {}
            }
            let roots = self.compute_roots(project, new_entry);
            emit_root_deltas(&mut out, roots, ChangeFlags::ADDED_TO_CLASSPATH);
        }

        self.diff_output_location(
            project,
            request.old_output_location(),
            request.new_output_location(),
            &mut out,
        );

        self.log_outcome(project, &out);
        out
    }

    fn diff_raw(&self, request: &ClasspathChangeRequest, out: &mut ClasspathDiffOutcome) {
        if classpaths_equal(
            request.old_raw(),
            request.old_output_location(),
            request.new_raw(),
            request.new_output_location(),
        ) {
            return;
        }

        let project = request.project();
        out.push_delta(project.clone(), ChangeKind::Changed, ChangeFlags::CLASSPATH_CHANGED);
        out.flags |= ResultFlags::HAS_DELTA;

        for entry in request.old_raw() {
            if entry.entry_kind == EntryKind::Container
                && !self.matcher.contains(request.new_raw(), entry)
            {
                out.events.push(ClasspathEvent::ForgetContainer {
                    project: project.clone(),
                    path: entry.path.clone(),
                });
            }
        }
    }

    fn removed_entry(
        &self,
        project: &ElementHandle,
        entry: &ClasspathEntryView,
        out: &mut ClasspathDiffOutcome,
    ) {
        match entry.entry_kind {
            EntryKind::Project => {
                out.flags |= ResultFlags::HAS_PROJECT_CHANGE;
                return;
            }
            EntryKind::Library => out.flags |= ResultFlags::HAS_LIBRARY_CHANGE,
            _ => {}
        }

        let roots = match self.cache.get(&entry.path) {
            Some(root) => vec![root.clone()],
            None => self.compute_roots(project, entry),
        };
        emit_root_deltas(out, roots, ChangeFlags::REMOVED_FROM_CLASSPATH);
    }

    fn matched_entry(
        &self,
        project: &ElementHandle,
        old_entry: &ClasspathEntryView,
        new_entry: &ClasspathEntryView,
        same_position: bool,
        out: &mut ClasspathDiffOutcome,
    ) {
        // A required project contributes no roots of its own here.
        if old_entry.entry_kind == EntryKind::Project {
            return;
        }

        let roots = self.compute_roots(project, old_entry);

        if !same_position {
            emit_root_deltas(out, roots.iter().cloned(), ChangeFlags::REORDER);
        } else {
            let flags = source_attachment_flags(
                old_entry.source_attachment_path.as_deref(),
                new_entry.source_attachment_path.as_deref(),
            ) | source_attachment_flags(
                old_entry.source_attachment_root_path.as_deref(),
                new_entry.source_attachment_root_path.as_deref(),
            );

            if !flags.is_empty() {
                emit_root_deltas(out, roots.iter().cloned(), flags);
            } else if old_entry.source_attachment_root_path.is_none()
                && new_entry.source_attachment_root_path.is_none()
            {
                // The attachment root is computed lazily by the root itself.
                out.events.extend(
                    roots
                        .iter()
                        .cloned()
                        .map(|root| ClasspathEvent::CloseRoot { root }),
                );
            }
        }

        let attribute_deltas =
            diff_extra_attributes(&old_entry.extra_attributes, &new_entry.extra_attributes);
        if !attribute_deltas.is_empty() {
            for root in roots {
                let leaf =
                    DeltaNode::leaf(root, ChangeKind::Changed, ChangeFlags::CLASSPATH_ATTRIBUTES)
                        .with_attribute_deltas(attribute_deltas.clone());
                out.events.push(ClasspathEvent::Delta(leaf));
            }
        }
    }

    fn diff_output_location(
        &self,
        project: &ElementHandle,
        old: Option<&Path>,
        new: Option<&Path>,
        out: &mut ClasspathDiffOutcome,
    ) {
        if old == new {
            return;
        }

        if let Some(old) = old {
            for fragment in self.roots.affected_fragments(project, old) {
                if let Some(root) = fragment.parent() {
                    out.events.push(ClasspathEvent::CloseRoot { root: root.clone() });
                }
                out.push_delta(fragment, ChangeKind::Added, ChangeFlags::empty());
            }
        }

        if let Some(new) = new {
            for fragment in self.roots.affected_fragments(project, new) {
                out.push_delta(fragment, ChangeKind::Removed, ChangeFlags::empty());
            }
        }
    }

    fn compute_roots(
        &self,
        project: &ElementHandle,
        entry: &ClasspathEntryView,
    ) -> Vec<ElementHandle> {
        match self.roots.compute_roots(project, entry) {
            Ok(roots) => roots,
            Err(err) => {
                tracing::debug!(
                    target: "nova.classpath",
                    project = %project,
                    path = %entry.path.display(),
                    error = %err,
                    "failed to compute package fragment roots; treating entry as rootless"
                );
                Vec::new()
            }
        }
    }

    fn log_outcome(&self, project: &ElementHandle, out: &ClasspathDiffOutcome) {
        tracing::debug!(
            target: "nova.classpath",
            project = %project,
            flags = ?out.flags,
            events = out.events.len(),
            "classpath diff complete"
        );
    }
}

fn emit_root_deltas(
    out: &mut ClasspathDiffOutcome,
    roots: impl IntoIterator<Item = ElementHandle>,
    flags: ChangeFlags,
) {
    let close = flags.intersects(CLOSING_FLAGS);
    for root in roots {
        if close {
            out.events.push(ClasspathEvent::CloseRoot { root: root.clone() });
        }
        out.push_delta(root, ChangeKind::Changed, flags);
    }
}
