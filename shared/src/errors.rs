/// Unified error types for the Reelpro system.
///
/// The domain has exactly two user-facing failures: bad credentials and an
/// unrecognizable reel URL. Everything else is ambient I/O plumbing.
use thiserror::Error;

/// Errors from the credential check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Empty email or password. The message is what the user sees inline.
    #[error("Invalid email or password.")]
    EmptyCredentials,
}

/// Errors from the simulated task runners.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The input did not contain a recognizable reel or post link.
    #[error("Invalid Instagram Reel URL.")]
    InvalidUrl { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskError {
    /// Whether the error should be reported to the user as bad input
    /// rather than a server fault.
    pub fn is_user_error(&self) -> bool {
        matches!(self, TaskError::InvalidUrl { .. })
    }
}
