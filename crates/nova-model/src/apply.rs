use nova_classpath::{ClasspathEvent, IndexCommand};
use nova_delta::DeltaNode;

use crate::collaborators::{IndexManager, ModelCollaborator};
use crate::error::CollaboratorResult;

/// Replays diff events: deltas go into `root`, everything else is forwarded
/// to `model`.
///
/// Collaborator failures are logged and skipped; later events still run.
pub fn apply_events(
    root: &mut DeltaNode,
    events: &[ClasspathEvent],
    model: &dyn ModelCollaborator,
) {
    for event in events {
        match event {
            ClasspathEvent::Delta(delta) => root.insert(delta.clone()),
            ClasspathEvent::CloseRoot { root: closed } => {
                if let Err(err) = model.close_root(closed) {
                    tracing::debug!(
                        target: "nova.model",
                        root = %closed,
                        error = %err,
                        "failed to close package fragment root"
                    );
                }
            }
            ClasspathEvent::ForgetContainer { project, path } => report(
                "forget container",
                model.forget_container(project, path),
            ),
            ClasspathEvent::RefreshExternalArchives { project } => report(
                "refresh external archives",
                model.refresh_external_archives(project),
            ),
            ClasspathEvent::ResetDependentCaches { project } => report(
                "reset dependent caches",
                model.reset_dependent_caches(project),
            ),
        }
    }
}

/// Forwards index commands to `index` in order.
pub fn apply_index_commands(commands: &[IndexCommand], index: &dyn IndexManager) {
    for command in commands {
        let result = match command {
            IndexCommand::IndexSourceFolder {
                project,
                path,
                inclusion_patterns,
                exclusion_patterns,
            } => index.index_source_folder(project, path, inclusion_patterns, exclusion_patterns),
            IndexCommand::RemoveSourceFolderFromIndex {
                project,
                path,
                inclusion_patterns,
                exclusion_patterns,
            } => index.remove_source_folder_from_index(
                project,
                path,
                inclusion_patterns,
                exclusion_patterns,
            ),
            IndexCommand::IndexLibrary {
                project,
                path,
                index_url,
            } => index.index_library(path, project, index_url.as_deref()),
            IndexCommand::RemoveIndex { path } => index.remove_index(path),
            IndexCommand::DiscardJobs { path } => index.discard_jobs(path),
        };
        report(command_name(command), result);
    }
}

fn command_name(command: &IndexCommand) -> &'static str {
    match command {
        IndexCommand::IndexSourceFolder { .. } => "index source folder",
        IndexCommand::RemoveSourceFolderFromIndex { .. } => "remove source folder from index",
        IndexCommand::IndexLibrary { .. } => "index library",
        IndexCommand::RemoveIndex { .. } => "remove index",
        IndexCommand::DiscardJobs { .. } => "discard index jobs",
    }
}

fn report(operation: &'static str, result: CollaboratorResult) {
    if let Err(err) = result {
        tracing::warn!(
            target: "nova.model",
            operation,
            error = %err,
            "collaborator call failed; continuing"
        );
    }
}
