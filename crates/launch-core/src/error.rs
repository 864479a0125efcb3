//! Launch error types.

use std::time::Duration;

use thiserror::Error;

/// Failure raised by the host platform while it is being queried or asked to launch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("app-control facility is unavailable")]
    Unavailable,

    #[error("{0}")]
    Fault(String),
}

/// Error that ends a launch run in the failed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("app control rejected: {0}")]
    Rejected(String),

    #[error("host dropped the launch callback without answering")]
    CallbackDropped,

    #[error("target app did not respond within {0:?}")]
    TimedOut(Duration),

    /// A host or view call panicked mid-sequence; carries the panic message.
    #[error("{0}")]
    Panicked(String),
}

/// Launch result type.
pub type Result<T> = std::result::Result<T, LaunchError>;
