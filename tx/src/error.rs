//! Error types for the coordinator and its collaborators

use std::time::Duration;
use thiserror::Error;

/// Errors returned by collaborators (axis processors, engine, optimizer, catalyst)
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Failed(String),
}

impl CollaboratorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors surfaced by `ThreeAxisCoordinator` operations
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Maximum concurrent coordinations reached: {max}")]
    CapacityExceeded { max: usize },

    #[error("{component} is not available: {reason}")]
    Unavailable { component: &'static str, reason: &'static str },

    #[error("{operation} failed for {target}: {source}")]
    Execution {
        operation: &'static str,
        target: String,
        #[source]
        source: CollaboratorError,
    },

    #[error("{operation} failed for {target}: {source}")]
    Upstream {
        operation: &'static str,
        target: String,
        #[source]
        source: CollaboratorError,
    },

    #[error("Coordination {session_id} timed out after {timeout:?}")]
    Timeout { session_id: String, timeout: Duration },

    #[error("Three axis coordinator is already running")]
    AlreadyRunning,

    #[error("Three axis coordinator is not running")]
    NotRunning,
}

/// Broad classification callers use to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    CapacityExceeded,
    Unavailable,
    Execution,
    Timeout,
    State,
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;

impl CoordinatorError {
    pub fn execution(operation: &'static str, target: impl Into<String>, source: CollaboratorError) -> Self {
        Self::Execution {
            operation,
            target: target.into(),
            source,
        }
    }

    pub fn upstream(operation: &'static str, target: impl Into<String>, source: CollaboratorError) -> Self {
        Self::Upstream {
            operation,
            target: target.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Execution { .. } | Self::Upstream { .. } => ErrorKind::Execution,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::AlreadyRunning | Self::NotRunning => ErrorKind::State,
        }
    }

    /// Check if this error is worth retrying later
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::CapacityExceeded | ErrorKind::Timeout)
    }

    /// Check if the caller should stop without retrying
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::State | ErrorKind::Unavailable
        )
    }
}
