use nova_classpath::{
    ClasspathDiff, ClasspathEvent, ClasspathSnapshot, DiffOptions, IndexCommand,
    IndexCommandEmitter, PendingClasspathChange, ResultFlags, RootCache, RootProvider,
};
use nova_config::{ClasspathConfig, DeltaConfig};
use nova_delta::{DeltaNode, ElementHandle};

use crate::apply::{apply_events, apply_index_commands};
use crate::collaborators::{ClasspathResolver, IndexManager, ModelCollaborator};
use crate::error::ResolveError;

/// What one project's classpath change produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChangeReport {
    pub result: ResultFlags,
    pub events: Vec<ClasspathEvent>,
    pub index_commands: Vec<IndexCommand>,
}

impl ProjectChangeReport {
    fn no_delta() -> Self {
        Self::default()
    }

    pub fn has_delta(&self) -> bool {
        self.result.contains(ResultFlags::HAS_DELTA)
    }
}

/// Runs classpath change detection for one project and applies the result.
///
/// The delta root passed to [`ProjectChangeCoordinator::process`] is expected
/// to be the Java model element; project deltas are then merged into it
/// rather than overwriting it.
pub struct ProjectChangeCoordinator<'a> {
    resolver: &'a dyn ClasspathResolver,
    roots: &'a dyn RootProvider,
    model: &'a dyn ModelCollaborator,
    index: &'a dyn IndexManager,
    classpath_config: ClasspathConfig,
    delta_config: DeltaConfig,
}

impl<'a> ProjectChangeCoordinator<'a> {
    pub fn new(
        resolver: &'a dyn ClasspathResolver,
        roots: &'a dyn RootProvider,
        model: &'a dyn ModelCollaborator,
        index: &'a dyn IndexManager,
    ) -> Self {
        Self {
            resolver,
            roots,
            model,
            index,
            classpath_config: ClasspathConfig::default(),
            delta_config: DeltaConfig::default(),
        }
    }

    pub fn with_classpath_config(mut self, config: ClasspathConfig) -> Self {
        self.classpath_config = config;
        self
    }

    pub fn with_delta_config(mut self, config: DeltaConfig) -> Self {
        self.delta_config = config;
        self
    }

    /// Completes `change` against a fresh resolution, records the resulting
    /// deltas in `root` and issues model and index updates.
    pub fn process(
        &self,
        change: PendingClasspathChange,
        cache: &RootCache,
        root: &mut DeltaNode,
    ) -> ProjectChangeReport {
        let project = change.project().clone();
        let span = tracing::debug_span!(
            target: "nova.model",
            "project_classpath_change",
            project = %project
        );
        let _guard = span.enter();

        let snapshot = match self.resolve(&project) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return ProjectChangeReport::no_delta(),
            Err(ResolveError::ProjectNotFound { .. }) => {
                tracing::debug!(
                    target: "nova.model",
                    "project vanished during classpath resolution"
                );
                return ProjectChangeReport::no_delta();
            }
            Err(err) => {
                tracing::warn!(
                    target: "nova.model",
                    error = %err,
                    "classpath resolution failed; skipping project"
                );
                return ProjectChangeReport::no_delta();
            }
        };

        let request = change.complete(snapshot);
        let options = DiffOptions {
            null_analysis: self.classpath_config.null_analysis,
        };
        let diff = ClasspathDiff::new(self.roots, cache, options);
        let outcome = diff.diff(&request);

        let index_commands = if outcome.flags.is_empty() {
            Vec::new()
        } else {
            IndexCommandEmitter::new(self.roots, diff.matcher()).emit(&request)
        };

        apply_events(root, &outcome.events, self.model);
        apply_index_commands(&index_commands, self.index);

        if self.delta_config.log_trees && !outcome.events.is_empty() {
            tracing::debug!(
                target: "nova.model",
                tree = %root.debug_string(0),
                "delta tree after classpath change"
            );
        }

        ProjectChangeReport {
            result: outcome.flags,
            events: outcome.events,
            index_commands,
        }
    }

    /// `Ok(None)` when the cached resolution raced and no retry is allowed.
    fn resolve(
        &self,
        project: &ElementHandle,
    ) -> Result<Option<ClasspathSnapshot>, ResolveError> {
        if let Some(snapshot) = self.resolver.resolve_cached(project)? {
            return Ok(Some(snapshot));
        }

        if !self.classpath_config.retry_uncached_resolution {
            tracing::debug!(
                target: "nova.model",
                "resolved classpath was reset concurrently; retry disabled"
            );
            return Ok(None);
        }

        tracing::debug!(
            target: "nova.model",
            "resolved classpath was reset concurrently; retrying without the cache"
        );
        self.resolver.resolve_uncached(project).map(Some)
    }
}
