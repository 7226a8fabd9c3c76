//! Probe protocol — what containers hand the trie.
//!
//! The node knows nothing about keys or hashes. A probe carries the
//! 64-bit path, the match predicate, and (for writes) the author under
//! whose authority buffers may be reused in place. One node type
//! therefore powers maps, sets, and bidirectional maps.

use crate::author::AuthorId;

/// A stored value that can reproduce its own 64-bit path.
///
/// Needed when an occupied slot is promoted into a sub-trie: the
/// existing value is re-slotted one level deeper by its own path.
pub(crate) trait Pathed {
    /// The full 64-bit path of this value.
    fn path(&self) -> u64;
}

/// Lookup probe.
pub(crate) trait FetchProbe<T> {
    /// Path to descend by.
    fn path(&self) -> u64;

    /// Does this stored value satisfy the lookup?
    fn matches(&self, stored: &T) -> bool;
}

/// Insert-or-replace probe.
pub(crate) trait AddProbe<T> {
    /// Path to descend by.
    fn path(&self) -> u64;

    /// Transaction on whose behalf buffers may be mutated in place.
    fn author(&self) -> AuthorId;

    /// Does this stored value correspond to the probe's value?
    fn matches(&self, stored: &T) -> bool;

    /// Should a matching stored value be overwritten?
    ///
    /// Returning `false` is the structural-sharing fast path: the trie
    /// is handed back untouched.
    fn replaces(&self, stored: &T) -> bool;

    /// Consumes the probe, yielding the value to store.
    fn into_value(self) -> T;
}

/// Removal probe.
pub(crate) trait DeleteProbe<T> {
    /// Path to descend by.
    fn path(&self) -> u64;

    /// Transaction on whose behalf buffers may be mutated in place.
    fn author(&self) -> AuthorId;

    /// Is this stored value the one to remove?
    fn matches(&self, stored: &T) -> bool;
}
