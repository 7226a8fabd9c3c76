//! Commit misuse errors.

use std::thread::ThreadId;

use thiserror::Error;

/// Errors raised by commit handles.
///
/// Both variants are programmer errors, never expected control flow:
/// a commit is a short-lived single-thread handle, and both conditions
/// are detected before any mutation occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// The commit's transaction has already resolved.
    #[error("commit already resolved")]
    Resolved,

    /// The commit was invoked from a thread other than its creator.
    #[error("commit owned by thread {owner:?}, invoked from {caller:?}")]
    Readonly {
        /// Thread that opened the commit.
        owner: ThreadId,
        /// Thread that attempted the call.
        caller: ThreadId,
    },
}
