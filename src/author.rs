//! Author ids — per-transaction tokens authorizing in-place mutation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter issuing fresh author ids. Monotone, never reset.
static NEXT_AUTHOR: AtomicU64 = AtomicU64::new(1);

/// Identifies the transaction that allocated a node's array buffer.
///
/// A probe carrying the same id as a buffer's writer tag may mutate that
/// buffer in place; any other id forces copy-on-write. The reserved
/// [`NONE`](Self::NONE) tag authorizes nobody, so a node inherited from
/// an earlier version is immutable to every transaction. Ids are never
/// reused: once a commit resolves, no future probe can present its id,
/// which is what publishes the commit's nodes as immutable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AuthorId(u64);

impl AuthorId {
    /// The "no author" tag: immutable to everyone.
    pub const NONE: Self = Self(0);

    /// Allocates a fresh id from the process-wide monotone counter.
    #[must_use]
    pub(crate) fn next() -> Self {
        Self(NEXT_AUTHOR.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns `true` if this is the reserved [`NONE`](Self::NONE) tag.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if a probe carrying `self` may mutate a buffer
    /// tagged `writer` in place.
    #[must_use]
    pub(crate) const fn authorizes(self, writer: Self) -> bool {
        !self.is_none() && self.0 == writer.0
    }
}
