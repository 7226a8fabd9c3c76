//! Batch-edit commits.

use std::hash::Hash;
use std::mem;
use std::thread::{self, ThreadId};

use crate::author::AuthorId;
use crate::error::CommitError;
use crate::map::HamtMap;
use crate::set::HamtSet;
use crate::value_eq::ValueEq;

/// A short-lived handle for batch-editing a [`HamtMap`].
///
/// A commit owns a unique [`AuthorId`]. Edits through the commit tag
/// freshly written nodes with that id, so later edits in the same commit
/// mutate them in place instead of copying the path again. Resolution
/// hands the edited map back as an ordinary immutable value; the id is
/// never used afterwards, which is what publishes the commit's nodes as
/// immutable.
///
/// A commit is bound to its creating thread. Every method — reads
/// included — fails with [`CommitError::Readonly`] from any other
/// thread, and with [`CommitError::Resolved`] once the commit resolved.
pub struct MapCommit<K, V> {
    pub(crate) map: HamtMap<K, V>,
    pub(crate) author: AuthorId,
    owner: ThreadId,
    resolved: bool,
}

impl<K, V> MapCommit<K, V> {
    pub(crate) fn begin(map: HamtMap<K, V>) -> Self {
        Self {
            map,
            author: AuthorId::next(),
            owner: thread::current().id(),
            resolved: false,
        }
    }

    /// Checks resolution and thread affinity before any other work.
    fn guard(&self) -> Result<(), CommitError> {
        if self.resolved {
            return Err(CommitError::Resolved);
        }
        let caller = thread::current().id();
        if caller != self.owner {
            return Err(CommitError::Readonly {
                owner: self.owner,
                caller,
            });
        }
        Ok(())
    }

    /// Consumes the commit, yielding the edited map. Internal callers
    /// hold the commit on its owning thread by construction.
    pub(crate) fn finish(self) -> HamtMap<K, V> {
        self.map
    }

    /// Number of pairs in the current edit state.
    pub fn len(&self) -> Result<usize, CommitError> {
        self.guard()?;
        Ok(self.map.len())
    }

    /// Returns `true` if the current edit state holds no pairs.
    pub fn is_empty(&self) -> Result<bool, CommitError> {
        self.guard()?;
        Ok(self.map.is_empty())
    }

    /// Resolves the commit, handing the edited map back.
    ///
    /// Every later call on this handle, including a second `resolve`,
    /// fails with [`CommitError::Resolved`].
    pub fn resolve(&mut self) -> Result<HamtMap<K, V>, CommitError> {
        self.guard()?;
        self.resolved = true;
        Ok(mem::take(&mut self.map))
    }
}

impl<K: Hash + Eq, V> MapCommit<K, V> {
    /// Looks up `key` in the current edit state.
    pub fn get(&self, key: &K) -> Result<Option<&V>, CommitError> {
        self.guard()?;
        Ok(self.map.get(key))
    }

    /// Returns whether the current edit state contains `key`.
    pub fn contains_key(&self, key: &K) -> Result<bool, CommitError> {
        self.guard()?;
        Ok(self.map.contains_key(key))
    }
}

impl<K, V> MapCommit<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + ValueEq,
{
    /// Inserts or replaces a pair, in place where this commit authored
    /// the touched nodes.
    pub fn assoc(&mut self, key: K, value: V) -> Result<(), CommitError> {
        self.guard()?;
        self.map.edit_assoc(key, value, self.author);
        Ok(())
    }

    /// Removes `key`. Returns whether a pair was removed.
    pub fn dissoc(&mut self, key: &K) -> Result<bool, CommitError> {
        self.guard()?;
        Ok(self.map.edit_dissoc(key, self.author))
    }
}

/// A short-lived handle for batch-editing a [`HamtSet`].
///
/// Same protocol as [`MapCommit`]: one author id, owning-thread
/// affinity, and hard failure after resolution.
pub struct SetCommit<T> {
    inner: MapCommit<T, ()>,
}

impl<T> SetCommit<T> {
    pub(crate) fn begin(map: HamtMap<T, ()>) -> Self {
        Self {
            inner: MapCommit::begin(map),
        }
    }

    pub(crate) fn finish(self) -> HamtSet<T> {
        HamtSet::from_map(self.inner.finish())
    }

    /// Number of elements in the current edit state.
    pub fn len(&self) -> Result<usize, CommitError> {
        self.inner.len()
    }

    /// Returns `true` if the current edit state holds no elements.
    pub fn is_empty(&self) -> Result<bool, CommitError> {
        self.inner.is_empty()
    }

    /// Resolves the commit, handing the edited set back.
    pub fn resolve(&mut self) -> Result<HamtSet<T>, CommitError> {
        Ok(HamtSet::from_map(self.inner.resolve()?))
    }
}

impl<T: Hash + Eq> SetCommit<T> {
    /// Returns whether the current edit state contains `element`.
    pub fn contains(&self, element: &T) -> Result<bool, CommitError> {
        self.inner.contains_key(element)
    }
}

impl<T: Hash + Eq + Clone> SetCommit<T> {
    /// Adds `element` to the current edit state.
    pub fn insert(&mut self, element: T) -> Result<(), CommitError> {
        self.inner.assoc(element, ())
    }

    /// Removes `element`. Returns whether it was present.
    pub fn remove(&mut self, element: &T) -> Result<bool, CommitError> {
        self.inner.dissoc(element)
    }
}
