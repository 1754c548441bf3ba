use std::fmt;

/// What happened to an element between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangeKind {
    /// Nothing recorded yet. Synthesized ancestors start here.
    #[default]
    None,
    Added,
    Removed,
    Changed,
}

impl ChangeKind {
    /// Single character used by debug dumps.
    pub fn marker(self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
            ChangeKind::Changed => '*',
            ChangeKind::None => '?',
        }
    }
}

bitflags::bitflags! {
    /// Details attached to a [`ChangeKind::Changed`] delta (and a few move
    /// markers on added/removed ones).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u32 {
        const CHILDREN = 1 << 0;
        const CONTENT = 1 << 1;
        const MODIFIERS = 1 << 2;
        const MOVED_FROM = 1 << 3;
        const MOVED_TO = 1 << 4;
        const ADDED_TO_CLASSPATH = 1 << 5;
        const REMOVED_FROM_CLASSPATH = 1 << 6;
        const REORDER = 1 << 7;
        const OPENED = 1 << 8;
        const CLOSED = 1 << 9;
        const SUPER_TYPES = 1 << 10;
        const SOURCE_ATTACHED = 1 << 11;
        const SOURCE_DETACHED = 1 << 12;
        const FINE_GRAINED = 1 << 13;
        const ARCHIVE_CONTENT_CHANGED = 1 << 14;
        const PRIMARY_WORKING_COPY = 1 << 15;
        const CLASSPATH_CHANGED = 1 << 16;
        const PRIMARY_RESOURCE = 1 << 17;
        const AST_AFFECTED = 1 << 18;
        const CATEGORIES = 1 << 19;
        const RESOLVED_CLASSPATH_CHANGED = 1 << 20;
        const ANNOTATIONS = 1 << 21;
        const CLASSPATH_ATTRIBUTES = 1 << 22;
    }
}

impl Default for ChangeFlags {
    fn default() -> Self {
        ChangeFlags::empty()
    }
}

const LABELS: &[(ChangeFlags, &str)] = &[
    (ChangeFlags::CHILDREN, "CHILDREN"),
    (ChangeFlags::CONTENT, "CONTENT"),
    (ChangeFlags::MODIFIERS, "MODIFIERS CHANGED"),
    (ChangeFlags::MOVED_FROM, "MOVED_FROM"),
    (ChangeFlags::MOVED_TO, "MOVED_TO"),
    (ChangeFlags::ADDED_TO_CLASSPATH, "ADDED TO CLASSPATH"),
    (ChangeFlags::REMOVED_FROM_CLASSPATH, "REMOVED FROM CLASSPATH"),
    (ChangeFlags::REORDER, "REORDERED"),
    (ChangeFlags::OPENED, "OPENED"),
    (ChangeFlags::CLOSED, "CLOSED"),
    (ChangeFlags::SUPER_TYPES, "SUPER TYPES CHANGED"),
    (ChangeFlags::SOURCE_ATTACHED, "SOURCE ATTACHED"),
    (ChangeFlags::SOURCE_DETACHED, "SOURCE DETACHED"),
    (ChangeFlags::FINE_GRAINED, "FINE GRAINED"),
    (ChangeFlags::ARCHIVE_CONTENT_CHANGED, "ARCHIVE CONTENT CHANGED"),
    (ChangeFlags::PRIMARY_WORKING_COPY, "PRIMARY WORKING COPY"),
    (ChangeFlags::CLASSPATH_CHANGED, "CLASSPATH CHANGED"),
    (ChangeFlags::PRIMARY_RESOURCE, "PRIMARY RESOURCE"),
    (ChangeFlags::AST_AFFECTED, "AST AFFECTED"),
    (ChangeFlags::CATEGORIES, "CATEGORIES"),
    (ChangeFlags::RESOLVED_CLASSPATH_CHANGED, "RESOLVED CLASSPATH CHANGED"),
    (ChangeFlags::ANNOTATIONS, "ANNOTATIONS"),
    (ChangeFlags::CLASSPATH_ATTRIBUTES, "CLASSPATH ATTRIBUTES CHANGED"),
];

impl ChangeFlags {
    /// Human readable labels of the set flags, in bit order.
    pub fn labels(self) -> impl Iterator<Item = (ChangeFlags, &'static str)> {
        LABELS
            .iter()
            .copied()
            .filter(move |(flag, _)| self.contains(*flag))
    }
}

impl fmt::Display for ChangeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, label)) in self.labels().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(label)?;
        }
        Ok(())
    }
}
