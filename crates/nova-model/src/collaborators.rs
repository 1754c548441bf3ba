use std::path::Path;

use nova_classpath::ClasspathSnapshot;
use nova_delta::ElementHandle;

use crate::error::{CollaboratorResult, ResolveError};

/// Classpath resolution for a project.
pub trait ClasspathResolver {
    /// Resolves through the shared resolution cache.
    ///
    /// `Ok(None)` means the cache was reset between being populated and being
    /// read by this call.
    fn resolve_cached(
        &self,
        project: &ElementHandle,
    ) -> Result<Option<ClasspathSnapshot>, ResolveError>;

    /// Resolves into a throwaway snapshot without touching the shared cache.
    fn resolve_uncached(&self, project: &ElementHandle)
        -> Result<ClasspathSnapshot, ResolveError>;
}

/// Side effects on the in-memory Java model.
pub trait ModelCollaborator {
    /// Drops the cached contents of a package fragment root.
    fn close_root(&self, root: &ElementHandle) -> CollaboratorResult;

    fn forget_container(&self, project: &ElementHandle, path: &Path) -> CollaboratorResult;

    /// Schedules a refresh of the external archives on `project`'s classpath.
    fn refresh_external_archives(&self, project: &ElementHandle) -> CollaboratorResult;

    /// Resets caches of projects that depend on `project`.
    fn reset_dependent_caches(&self, project: &ElementHandle) -> CollaboratorResult;
}

/// The search index manager.
pub trait IndexManager {
    fn index_source_folder(
        &self,
        project: &ElementHandle,
        path: &Path,
        inclusion_patterns: &[String],
        exclusion_patterns: &[String],
    ) -> CollaboratorResult;

    fn remove_source_folder_from_index(
        &self,
        project: &ElementHandle,
        path: &Path,
        inclusion_patterns: &[String],
        exclusion_patterns: &[String],
    ) -> CollaboratorResult;

    fn index_library(
        &self,
        path: &Path,
        project: &ElementHandle,
        index_url: Option<&str>,
    ) -> CollaboratorResult;

    fn remove_index(&self, path: &Path) -> CollaboratorResult;

    fn discard_jobs(&self, path: &str) -> CollaboratorResult;
}
