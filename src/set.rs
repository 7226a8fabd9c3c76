//! Persistent hash set.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::commit::SetCommit;
use crate::map::{self, HamtMap};

/// Persistent hash set over the same trie as [`HamtMap`].
///
/// Represented as a map from elements to unit, so every map guarantee
/// carries over: edits return new sets, versions share structure, and
/// adding a present element hands back a set whose root is
/// pointer-identical to the receiver's.
pub struct HamtSet<T> {
    map: HamtMap<T, ()>,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<T> HamtSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: HamtMap::new(),
        }
    }

    pub(crate) fn from_map(map: HamtMap<T, ()>) -> Self {
        Self { map }
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Constant-time identity check: do both sets share the same root?
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.map.ptr_eq(&other.map)
    }

    /// Returns an iterator over elements. Order is unspecified.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.keys(),
        }
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<T: Hash + Eq> HamtSet<T> {
    /// Returns `true` if the set contains `element`.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.map.contains_key(element)
    }
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

impl<T: Hash + Eq + Clone> HamtSet<T> {
    /// Adds `element`, returning the new set.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            map: self.map.assoc(element, ()),
        }
    }

    /// Removes `element`, returning the new set.
    #[must_use]
    pub fn remove(&self, element: &T) -> Self {
        Self {
            map: self.map.dissoc(element),
        }
    }

    /// Elements present in either set.
    ///
    /// Bulk-inserts the smaller side into the larger under one commit.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (large, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Self {
            map: large.map.bulk(|commit| {
                for element in small.iter() {
                    commit.map.edit_assoc(element.clone(), (), commit.author);
                }
            }),
        }
    }

    /// Elements present in both sets.
    ///
    /// Probes the smaller side against the larger, deleting misses.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.filter(|element| large.contains(element))
    }

    /// Keeps only elements satisfying `pred`.
    #[must_use]
    pub fn filter<F: FnMut(&T) -> bool>(&self, mut pred: F) -> Self {
        Self {
            map: self.map.bulk(|commit| {
                for element in self.iter() {
                    if !pred(element) {
                        commit.map.edit_dissoc(element, commit.author);
                    }
                }
            }),
        }
    }

    /// Drops elements satisfying `pred`.
    #[must_use]
    pub fn reject<F: FnMut(&T) -> bool>(&self, mut pred: F) -> Self {
        self.filter(|element| !pred(element))
    }

    /// Opens a batch-edit commit on this set.
    #[must_use]
    pub fn begin_edit(&self) -> SetCommit<T> {
        SetCommit::begin(self.map.clone())
    }

    /// Runs `f` inside a batch-edit commit, returning the edited set.
    ///
    /// When `f` returns `Err` the partial trie is discarded with the
    /// commit and `self` is untouched either way.
    pub fn transaction<E, F>(&self, f: F) -> Result<Self, E>
    where
        F: FnOnce(&mut SetCommit<T>) -> Result<(), E>,
    {
        let mut commit = self.begin_edit();
        f(&mut commit)?;
        Ok(commit.finish())
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<T> Clone for HamtSet<T> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T> Default for HamtSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HamtSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtSet")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T: Hash + Eq + Clone> Extend<T> for HamtSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let map = self.map.bulk(|commit| {
            for element in iter {
                commit.map.edit_assoc(element, (), commit.author);
            }
        });
        *self = Self { map };
    }
}

impl<T: Hash + Eq + Clone> FromIterator<T> for HamtSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq> PartialEq for HamtSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Hash + Eq> Eq for HamtSet<T> {}

impl<T: Hash> Hash for HamtSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<'a, T> IntoIterator for &'a HamtSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Iterator
// ---------------------------------------------------------------------------

/// Iterator over the elements of a [`HamtSet`].
pub struct Iter<'a, T> {
    inner: map::Keys<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
