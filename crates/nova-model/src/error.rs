use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The project was deleted or closed while its classpath was resolved.
    #[error("project `{project}` no longer exists")]
    ProjectNotFound { project: String },
    #[error("failed to resolve classpath: {message}")]
    Failed { message: String },
}

/// Failure of a side-effecting model or index call.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{operation} failed: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CollaboratorResult = Result<(), CollaboratorError>;
