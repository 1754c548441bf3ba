//! Project-level orchestration of classpath change detection.
//!
//! [`ProjectChangeCoordinator`] resolves a project's new classpath, diffs it
//! against the state captured before the build cycle, records the resulting
//! deltas in the cycle's delta tree and forwards model and index updates to
//! the collaborators. Nothing here aborts a build cycle: failures degrade to
//! `ResultFlags::NO_DELTA` or are logged and skipped.

mod apply;
mod collaborators;
mod coordinator;
mod error;

pub use apply::{apply_events, apply_index_commands};
pub use collaborators::{ClasspathResolver, IndexManager, ModelCollaborator};
pub use coordinator::{ProjectChangeCoordinator, ProjectChangeReport};
pub use error::{CollaboratorError, CollaboratorResult, ResolveError};
