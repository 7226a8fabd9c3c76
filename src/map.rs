//! Persistent hash map.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;
use std::sync::Arc;

use crate::author::AuthorId;
use crate::commit::MapCommit;
use crate::hash;
use crate::iter::NodeIter;
use crate::node::Node;
use crate::ops::add::{add, AddOutcome};
use crate::ops::delete::{delete, DeleteOutcome};
use crate::ops::fetch::fetch;
use crate::probe::{AddProbe, DeleteProbe, FetchProbe, Pathed};
use crate::value_eq::ValueEq;

/// A key-value pair with its precomputed 64-bit path.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Pathed for Entry<K, V> {
    fn path(&self) -> u64 {
        self.hash
    }
}

// ---------------------------------------------------------------------------
// Probes
// ---------------------------------------------------------------------------

/// Lookup by key.
struct ByKey<'a, K> {
    hash: u64,
    key: &'a K,
}

impl<K: Eq, V> FetchProbe<Entry<K, V>> for ByKey<'_, K> {
    fn path(&self) -> u64 {
        self.hash
    }

    fn matches(&self, stored: &Entry<K, V>) -> bool {
        stored.hash == self.hash && stored.key == *self.key
    }
}

/// Insert or replace a pair.
struct Assoc<K, V> {
    entry: Entry<K, V>,
    author: AuthorId,
}

impl<K: Eq, V: ValueEq> AddProbe<Entry<K, V>> for Assoc<K, V> {
    fn path(&self) -> u64 {
        self.entry.hash
    }

    fn author(&self) -> AuthorId {
        self.author
    }

    fn matches(&self, stored: &Entry<K, V>) -> bool {
        stored.hash == self.entry.hash && stored.key == self.entry.key
    }

    fn replaces(&self, stored: &Entry<K, V>) -> bool {
        !stored.value.value_eq(&self.entry.value)
    }

    fn into_value(self) -> Entry<K, V> {
        self.entry
    }
}

/// Remove by key.
struct Dissoc<'a, K> {
    hash: u64,
    key: &'a K,
    author: AuthorId,
}

impl<K: Eq, V> DeleteProbe<Entry<K, V>> for Dissoc<'_, K> {
    fn path(&self) -> u64 {
        self.hash
    }

    fn author(&self) -> AuthorId {
        self.author
    }

    fn matches(&self, stored: &Entry<K, V>) -> bool {
        stored.hash == self.hash && stored.key == *self.key
    }
}

// ---------------------------------------------------------------------------
// HamtMap
// ---------------------------------------------------------------------------

/// Persistent hash map over a bitmap-indexed trie.
///
/// Every edit returns a new map and leaves the receiver untouched;
/// versions differing by one edit share all nodes off the edit path.
/// Batch edits go through a [`MapCommit`] (see
/// [`transaction`](Self::transaction)), which reuses its own freshly
/// written nodes in place instead of path-copying per operation.
pub struct HamtMap<K, V> {
    root: Option<Arc<Node<Entry<K, V>>>>,
    size: usize,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no pairs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Constant-time identity check: do both maps share the same root?
    ///
    /// This doubles as a change detector — an edit with no effect hands
    /// back a map for which `ptr_eq` against the receiver holds.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Returns an iterator over `(&K, &V)` pairs. Order is unspecified.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries(),
            remaining: self.size,
        }
    }

    /// Returns an iterator over keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.entries(),
            remaining: self.size,
        }
    }

    /// Returns an iterator over values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.entries(),
            remaining: self.size,
        }
    }

    fn entries(&self) -> NodeIter<'_, Entry<K, V>> {
        NodeIter::new(self.root.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> HamtMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_deref()?;
        let probe = ByKey {
            hash: hash::hash_of(key),
            key,
        };
        fetch(root, &probe, 0).map(|entry| &entry.value)
    }

    /// Returns the value for `key`, or `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Clone + ValueEq
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + ValueEq,
{
    /// Inserts or replaces a pair, returning the new map.
    ///
    /// Storing a value the stored one is value-equal to (see
    /// [`ValueEq`]) is a no-op: the result shares its root with `self`
    /// and [`ptr_eq`](Self::ptr_eq) holds between the two.
    #[must_use]
    pub fn assoc(&self, key: K, value: V) -> Self {
        let mut next = self.clone();
        next.edit_assoc(key, value, AuthorId::NONE);
        next
    }

    /// Removes `key`, returning the new map.
    ///
    /// Removing an absent key hands back a map sharing its root with
    /// `self`.
    #[must_use]
    pub fn dissoc(&self, key: &K) -> Self {
        let mut next = self.clone();
        next.edit_dissoc(key, AuthorId::NONE);
        next
    }

    /// Replaces the value at `key` with `f(current)`, or `f(&default)`
    /// when the key is absent.
    #[must_use]
    pub fn update<F: FnOnce(&V) -> V>(&self, key: K, default: V, f: F) -> Self {
        let next = f(self.get(&key).unwrap_or(&default));
        self.assoc(key, next)
    }

    /// Right-biased union: pairs from `other` overwrite pairs of `self`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        self.bulk(|commit| {
            for (k, v) in other.iter() {
                commit.map.edit_assoc(k.clone(), v.clone(), commit.author);
            }
        })
    }

    /// Union combining values for keys present on both sides.
    #[must_use]
    pub fn merge_with<F: FnMut(&V, &V) -> V>(&self, other: &Self, mut f: F) -> Self {
        self.bulk(|commit| {
            for (k, v) in other.iter() {
                let merged = match commit.map.get(k) {
                    Some(mine) => f(mine, v),
                    None => v.clone(),
                };
                commit.map.edit_assoc(k.clone(), merged, commit.author);
            }
        })
    }

    /// Keeps only pairs satisfying `pred`.
    #[must_use]
    pub fn select<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> Self {
        self.bulk(|commit| {
            for (k, v) in self.iter() {
                if !pred(k, v) {
                    commit.map.edit_dissoc(k, commit.author);
                }
            }
        })
    }

    /// Drops pairs satisfying `pred`.
    #[must_use]
    pub fn reject<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> Self {
        self.select(|k, v| !pred(k, v))
    }

    /// Keeps only the listed keys.
    #[must_use]
    pub fn select_keys<'a, I>(&self, keys: I) -> Self
    where
        K: 'a,
        I: IntoIterator<Item = &'a K>,
    {
        Self::new().bulk(|commit| {
            for key in keys {
                if let Some(value) = self.get(key) {
                    commit
                        .map
                        .edit_assoc(key.clone(), value.clone(), commit.author);
                }
            }
        })
    }

    /// Drops the listed keys.
    #[must_use]
    pub fn reject_keys<'a, I>(&self, keys: I) -> Self
    where
        K: 'a,
        I: IntoIterator<Item = &'a K>,
    {
        self.bulk(|commit| {
            for key in keys {
                commit.map.edit_dissoc(key, commit.author);
            }
        })
    }

    /// Maps every pair through `f` into a fresh map.
    #[must_use]
    pub fn fmap<K2, V2, F>(&self, mut f: F) -> HamtMap<K2, V2>
    where
        K2: Hash + Eq + Clone,
        V2: Clone + ValueEq,
        F: FnMut(&K, &V) -> (K2, V2),
    {
        HamtMap::new().bulk(|commit| {
            for (k, v) in self.iter() {
                let (k2, v2) = f(k, v);
                commit.map.edit_assoc(k2, v2, commit.author);
            }
        })
    }

    /// Rewrites every key through `f`, keeping values.
    #[must_use]
    pub fn map_key<F: FnMut(&K) -> K>(&self, mut f: F) -> Self {
        self.fmap(|k, v| (f(k), v.clone()))
    }

    /// Rewrites every value through `f`, keeping keys.
    ///
    /// Pairs whose value `f` leaves value-equal keep their nodes shared
    /// with `self`.
    #[must_use]
    pub fn map_value<F: FnMut(&V) -> V>(&self, mut f: F) -> Self {
        self.bulk(|commit| {
            for (k, v) in self.iter() {
                commit.map.edit_assoc(k.clone(), f(v), commit.author);
            }
        })
    }

    /// Opens a batch-edit commit on this map.
    #[must_use]
    pub fn begin_edit(&self) -> MapCommit<K, V> {
        MapCommit::begin(self.clone())
    }

    /// Runs `f` inside a batch-edit commit, returning the edited map.
    ///
    /// All edits share one author id, so freshly written nodes are
    /// reused in place instead of path-copied per operation. When `f`
    /// returns `Err` the partial trie is discarded with the commit and
    /// `self` is untouched either way.
    pub fn transaction<E, F>(&self, f: F) -> Result<Self, E>
    where
        F: FnOnce(&mut MapCommit<K, V>) -> Result<(), E>,
    {
        let mut commit = self.begin_edit();
        f(&mut commit)?;
        Ok(commit.finish())
    }

    /// Runs an internal bulk edit under one commit.
    pub(crate) fn bulk(&self, f: impl FnOnce(&mut MapCommit<K, V>)) -> Self {
        let mut commit = self.begin_edit();
        f(&mut commit);
        commit.finish()
    }

    /// Inserts a pair under `author`, updating size bookkeeping.
    pub(crate) fn edit_assoc(&mut self, key: K, value: V, author: AuthorId) -> AddOutcome {
        let hash = hash::hash_of(&key);
        let entry = Entry { hash, key, value };
        let outcome = match self.root.as_mut() {
            Some(slot) => add(slot, Assoc { entry, author }, 0),
            None => {
                self.root = Some(Arc::new(Node::single(entry, author)));
                AddOutcome::Inserted
            }
        };
        if matches!(outcome, AddOutcome::Inserted) {
            self.size += 1;
        }
        outcome
    }

    /// Removes a key under `author`. Returns whether a pair was removed.
    pub(crate) fn edit_dissoc(&mut self, key: &K, author: AuthorId) -> bool {
        let Some(slot) = self.root.as_mut() else {
            return false;
        };
        let probe = Dissoc {
            hash: hash::hash_of(key),
            key,
            author,
        };
        match delete(slot, &probe, 0) {
            DeleteOutcome::NotFound => false,
            DeleteOutcome::Deleted => {
                self.size -= 1;
                true
            }
            DeleteOutcome::Emptied => {
                self.root = None;
                self.size -= 1;
                true
            }
            DeleteOutcome::Collapsed(entry) => {
                self.root = Some(Arc::new(Node::single(entry, author)));
                self.size -= 1;
                true
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Nullable values
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, Option<V>>
where
    K: Hash + Eq + Clone,
    V: Clone + ValueEq,
{
    /// Drops `None` values, unwrapping the rest into a fresh map.
    #[must_use]
    pub fn compact(&self) -> HamtMap<K, V> {
        HamtMap::new().bulk(|commit| {
            for (k, v) in self.iter() {
                if let Some(v) = v {
                    commit.map.edit_assoc(k.clone(), v.clone(), commit.author);
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Clone for HamtMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
        }
    }
}

impl<K, V> Default for HamtMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for HamtMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtMap")
            .field("len", &self.size)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for HamtMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + ValueEq,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        *self = self.bulk(|commit| {
            for (k, v) in iter {
                commit.map.edit_assoc(k, v, commit.author);
            }
        });
    }
}

impl<K, V> FromIterator<(K, V)> for HamtMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + ValueEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for HamtMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        if self.ptr_eq(other) {
            return true;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for HamtMap<K, V> {}

impl<K: Hash, V: Hash> Hash for HamtMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mix = self.entries().fold(0_u64, |acc, entry| {
            acc.wrapping_add(hash::pair_mix(entry.hash, hash::hash_of(&entry.value)))
        });
        state.write_usize(self.size);
        state.write_u64(mix);
    }
}

impl<K: Hash + Eq + fmt::Debug, V> ops::Index<&K> for HamtMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found: {key:?}"),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HamtMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Iterator over `(&K, &V)` pairs of a [`HamtMap`].
pub struct Iter<'a, K, V> {
    inner: NodeIter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a [`HamtMap`].
pub struct Keys<'a, K, V> {
    inner: NodeIter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let entry = self.inner.next()?;
        self.remaining -= 1;
        Some(&entry.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`HamtMap`].
pub struct Values<'a, K, V> {
    inner: NodeIter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let entry = self.inner.next()?;
        self.remaining -= 1;
        Some(&entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
