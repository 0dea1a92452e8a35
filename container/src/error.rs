use berth_model::ValidationError;
use berth_shim::ShimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed container list row: '{0}'")]
    MalformedRow(String),

    #[error("malformed inspect output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed link '{link}' on container {container}")]
    MalformedLink { container: String, link: String },

    #[error("unknown restart policy '{policy}' on container {container}")]
    UnknownRestartPolicy { container: String, policy: String },
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("container {name}: {source}")]
    Validation {
        name: String,
        #[source]
        source: ValidationError,
    },

    #[error("failed to parse engine state: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to query engine state: {0}")]
    Prefetch(#[from] ShimError),

    #[error("container {name}: {source}")]
    Engine {
        name: String,
        #[source]
        source: ShimError,
    },
}

impl ReconcileError {
    /// The resource the failure is confined to, if it is not pass-wide.
    pub fn name(&self) -> Option<&str> {
        match self {
            ReconcileError::Validation { name, .. } | ReconcileError::Engine { name, .. } => {
                Some(name)
            }
            ReconcileError::Parse(_) | ReconcileError::Prefetch(_) => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ReconcileError::Validation { source, .. } => source.field(),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("container {0} is declared more than once")]
    DuplicateName(String),

    #[error("dependency cycle between containers: {}", .0.join(", "))]
    Cycle(Vec<String>),
}
