//! Classpath change detection for Nova projects.
//!
//! Given the classpath a project had before a build cycle and the one it has
//! now, this crate works out which entries were added, removed, reordered or
//! re-attached ([`ClasspathDiff`]) and which search index maintenance follows
//! from that ([`IndexCommandEmitter`]). Both passes are pure and return
//! events; applying them is up to the caller.

mod attributes;
mod diff;
mod entry;
mod index;
mod matcher;
mod request;
mod roots;

pub use attributes::{diff_extra_attributes, source_attachment_flags};
pub use diff::{ClasspathDiff, ClasspathDiffOutcome, ClasspathEvent, DiffOptions, ResultFlags};
pub use entry::{ClasspathEntryView, ContentKind, EntryKind, INDEX_LOCATION_ATTRIBUTE};
pub use index::{index_urls_equal, IndexCommand, IndexCommandEmitter};
pub use matcher::{classpaths_equal, EntryMatcher};
pub use request::{ClasspathChangeRequest, ClasspathSnapshot, PendingClasspathChange};
pub use roots::{RootCache, RootError, RootProvider};
