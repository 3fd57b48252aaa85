//! Error types for the service layer.

use thiserror::Error;

use crate::transport::TransportError;

/// Reasons the service stopped other than a shutdown signal.
///
/// Lookup and probe failures never appear here: they degrade the state's
/// status instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The publishing transport failed.
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    /// An activity that should run forever returned.
    #[error("{0} stopped unexpectedly")]
    ActivityStopped(&'static str),

    /// An activity panicked or was aborted from outside.
    #[error("Service task failed: {0}")]
    TaskFailed(String),
}
