//! Error status shared by the client contract and the reactive facades.

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Coarse classification of a [`GridError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Rejected before any underlying call was issued.
    InvalidArgument,
    /// The underlying invocation was cancelled.
    Cancelled,
    /// Member, partition or connection unavailable.
    Unavailable,
    /// The underlying client gave up waiting.
    Timeout,
    /// The remote side raised an exception while executing the operation.
    RemoteFailure,
    /// The handle was used in a way its current state does not allow.
    IllegalState,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::Cancelled => "cancelled",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Timeout => "timeout",
            ErrorCode::RemoteFailure => "remote_failure",
            ErrorCode::IllegalState => "illegal_state",
            ErrorCode::Internal => "internal",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure signalled through an observable's error channel.
///
/// Errors raised by the underlying client are forwarded unchanged; the adapter
/// only creates [`ErrorCode::InvalidArgument`] errors itself.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct GridError {
    code: ErrorCode,
    message: String,
}

impl GridError {
    pub fn fail_with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::fail_with_code(ErrorCode::InvalidArgument, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::fail_with_code(ErrorCode::Cancelled, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }
}
