//! Persistent bidirectional map.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::map::{self, HamtMap};
use crate::value_eq::ValueEq;

/// Persistent one-to-one pairing of keys and values.
///
/// Backed by two [`HamtMap`]s kept in lockstep: `(k, v)` is paired
/// exactly when the forward side maps `k → v` and the reverse side maps
/// `v → k`. Pairing a key or value that is already taken evicts the
/// stale couple from both sides.
pub struct HamtBidiMap<K, V> {
    value_of: HamtMap<K, V>,
    key_of: HamtMap<V, K>,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> HamtBidiMap<K, V> {
    /// Creates an empty bidirectional map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value_of: HamtMap::new(),
            key_of: HamtMap::new(),
        }
    }

    /// Returns the number of pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.value_of.len()
    }

    /// Returns `true` if no pair is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value_of.is_empty()
    }

    /// Constant-time identity check: do both bidi maps share both roots?
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.value_of.ptr_eq(&other.value_of) && self.key_of.ptr_eq(&other.key_of)
    }

    /// Returns an iterator over `(&K, &V)` pairs. Order is unspecified.
    #[must_use]
    pub fn iter(&self) -> map::Iter<'_, K, V> {
        self.value_of.iter()
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V: Hash + Eq> HamtBidiMap<K, V> {
    /// Returns the value paired with `key`.
    #[must_use]
    pub fn value_for(&self, key: &K) -> Option<&V> {
        self.value_of.get(key)
    }

    /// Returns the key paired with `value`.
    #[must_use]
    pub fn key_for(&self, value: &V) -> Option<&K> {
        self.key_of.get(value)
    }

    /// Returns `true` if `key` is paired with some value.
    #[must_use]
    pub fn has_value_for(&self, key: &K) -> bool {
        self.value_of.contains_key(key)
    }

    /// Returns `true` if `value` is paired with some key.
    #[must_use]
    pub fn has_key_for(&self, value: &V) -> bool {
        self.key_of.contains_key(value)
    }
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

impl<K, V> HamtBidiMap<K, V>
where
    K: Hash + Eq + Clone + ValueEq,
    V: Hash + Eq + Clone + ValueEq,
{
    /// Pairs `key` with `value`, evicting any pairing either one had.
    ///
    /// Re-pairing an existing couple (under [`ValueEq`]) is a no-op
    /// that hands back a bidi map sharing both roots with `self`.
    #[must_use]
    pub fn assoc(&self, key: K, value: V) -> Self {
        if let Some(current) = self.value_of.get(&key) {
            if current.value_eq(&value) && self.key_of.get(&value) == Some(&key) {
                return self.clone();
            }
        }

        let value_of = self.value_of.bulk(|commit| {
            if let Some(old_key) = self.key_of.get(&value) {
                commit.map.edit_dissoc(old_key, commit.author);
            }
            commit
                .map
                .edit_assoc(key.clone(), value.clone(), commit.author);
        });
        let key_of = self.key_of.bulk(|commit| {
            if let Some(old_value) = self.value_of.get(&key) {
                commit.map.edit_dissoc(old_value, commit.author);
            }
            commit.map.edit_assoc(value, key, commit.author);
        });
        Self { value_of, key_of }
    }

    /// Removes the pair holding `key`, if any.
    #[must_use]
    pub fn dissoc_by_key(&self, key: &K) -> Self {
        let Some(value) = self.value_of.get(key) else {
            return self.clone();
        };
        Self {
            value_of: self.value_of.dissoc(key),
            key_of: self.key_of.dissoc(value),
        }
    }

    /// Removes the pair holding `value`, if any.
    #[must_use]
    pub fn dissoc_by_value(&self, value: &V) -> Self {
        let Some(key) = self.key_of.get(value) else {
            return self.clone();
        };
        Self {
            value_of: self.value_of.dissoc(key),
            key_of: self.key_of.dissoc(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Clone for HamtBidiMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            value_of: self.value_of.clone(),
            key_of: self.key_of.clone(),
        }
    }
}

impl<K, V> Default for HamtBidiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for HamtBidiMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtBidiMap")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> FromIterator<(K, V)> for HamtBidiMap<K, V>
where
    K: Hash + Eq + Clone + ValueEq,
    V: Hash + Eq + Clone + ValueEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |bidi, (k, v)| bidi.assoc(k, v))
    }
}

impl<K: Hash + Eq, V: Hash + Eq> PartialEq for HamtBidiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // The reverse side is determined by the forward side.
        self.value_of == other.value_of
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Eq for HamtBidiMap<K, V> {}

impl<K: Hash, V: Hash> Hash for HamtBidiMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value_of.hash(state);
    }
}

impl<'a, K, V> IntoIterator for &'a HamtBidiMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = map::Iter<'a, K, V>;

    fn into_iter(self) -> map::Iter<'a, K, V> {
        self.iter()
    }
}
