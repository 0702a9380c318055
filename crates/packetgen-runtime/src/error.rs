//! Call error types.

use std::time::Duration;

use packetgen_wire::{Status, WireError};
use thiserror::Error;

/// Errors returned by [`DeviceHandle::call`](crate::DeviceHandle::call).
#[derive(Debug, Error)]
pub enum CallError {
    /// The handle is not attached to a connection; no I/O was performed.
    #[error("device is not attached to a connection")]
    NotAttached,

    /// No matching response arrived within the timeout.
    #[error("timeout after {timeout:?} waiting for response to '{function}'")]
    Timeout {
        /// Function that timed out.
        function: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The transport rejected the frame; its status is passed through.
    #[error("transport error: {0}")]
    Transport(Status),

    /// No function packet with this name.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Inputs did not match the request layout, or the response was malformed.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),
}

impl CallError {
    /// Status code a generated call would return, if this error has one.
    ///
    /// Argument and lookup errors have no status: in generated code they are
    /// compile-time errors.
    pub fn status(&self) -> Option<Status> {
        match self {
            CallError::NotAttached => Some(Status::NotAttached),
            CallError::Timeout { .. } => Some(Status::Timeout),
            CallError::Transport(status) => Some(*status),
            CallError::UnknownFunction(_) | CallError::Wire(_) => None,
        }
    }
}

/// Result type for runtime calls.
pub type CallResult<T> = Result<T, CallError>;
