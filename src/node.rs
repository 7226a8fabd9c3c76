//! Trie node types and path helpers.

use std::sync::Arc;

use crate::author::AuthorId;
use crate::probe::Pathed;
use crate::sparse::SparseArray;

/// Bits per trie level (5 → 32-way branching).
pub(crate) const BITS_PER_LEVEL: u32 = 5;

/// Maximum bit-shift value (depth 12, last level uses 4 bits).
pub(crate) const MAX_SHIFT: u32 = 60;

/// Levels before a 64-bit path is exhausted: ⌈64 / 5⌉.
pub(crate) const MAX_DEPTH: usize = 13;

/// Extracts the 5-bit path fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub(crate) const fn fragment(path: u64, shift: u32) -> u32 {
    ((path >> shift) & 0x1F) as u32
}

/// Hash-trie node.
///
/// Two variants:
/// - [`Inner`](Self::Inner) — bitmap-compressed node at depth `d < 13`
/// - [`Collision`](Self::Collision) — linear bucket for values sharing a
///   full 64-bit path, created only once the path is exhausted
///
/// For every index `0..31` of an inner node, at most one of `items` and
/// `children` is occupied. The writer tags name the transaction allowed
/// to mutate the corresponding buffer in place; [`AuthorId::NONE`] means
/// the buffer is immutable to everyone.
#[derive(Clone)]
pub(crate) enum Node<T> {
    /// Bitmap-compressed inner node.
    Inner {
        /// Values that terminate at this depth.
        items: SparseArray<T>,
        /// Sub-tries for values whose paths pass through this depth.
        children: SparseArray<Arc<Node<T>>>,
        /// Transaction allowed to mutate `items` in place.
        writer_items: AuthorId,
        /// Transaction allowed to mutate `children` in place.
        writer_children: AuthorId,
    },
    /// Collision bucket at exhausted depth. Holds ≥ 2 entries.
    Collision {
        /// The shared 64-bit path.
        path: u64,
        /// The colliding values.
        entries: Vec<T>,
        /// Transaction allowed to mutate `entries` in place.
        writer: AuthorId,
    },
}

impl<T> Node<T> {
    /// Field access for inner nodes.
    ///
    /// Collision buckets never occupy an inner slot the probe operations
    /// reach through these accessors.
    pub(crate) fn inner(
        &self,
    ) -> (
        &SparseArray<T>,
        &SparseArray<Arc<Node<T>>>,
        AuthorId,
        AuthorId,
    ) {
        match self {
            Self::Inner {
                items,
                children,
                writer_items,
                writer_children,
            } => (items, children, *writer_items, *writer_children),
            Self::Collision { .. } => unreachable!("collision bucket in an inner position"),
        }
    }

    /// Mutable field access for inner nodes.
    pub(crate) fn inner_mut(&mut self) -> (&mut SparseArray<T>, &mut SparseArray<Arc<Node<T>>>) {
        match self {
            Self::Inner {
                items, children, ..
            } => (items, children),
            Self::Collision { .. } => unreachable!("collision bucket in an inner position"),
        }
    }

    /// Field access for collision buckets.
    pub(crate) fn collision(&self) -> (u64, &[T], AuthorId) {
        match self {
            Self::Collision {
                path,
                entries,
                writer,
            } => (*path, entries, *writer),
            Self::Inner { .. } => unreachable!("inner node in a collision position"),
        }
    }

    /// Mutable entry access for collision buckets.
    pub(crate) fn collision_mut(&mut self) -> &mut Vec<T> {
        match self {
            Self::Collision { entries, .. } => entries,
            Self::Inner { .. } => unreachable!("inner node in a collision position"),
        }
    }
}

impl<T: Pathed> Node<T> {
    /// Builds a root node holding a single value, slotted by the top
    /// window of its own path.
    pub(crate) fn single(item: T, author: AuthorId) -> Self {
        Self::Inner {
            items: SparseArray::unit(fragment(item.path(), 0), item),
            children: SparseArray::new(),
            writer_items: author,
            writer_children: author,
        }
    }
}
