//! Insertion operation — in-place under the probe's author, path-copy
//! otherwise.

use std::sync::Arc;

use crate::author::AuthorId;
use crate::node::{self, Node};
use crate::probe::{AddProbe, Pathed};
use crate::sparse::SparseArray;

/// Outcome of a recursive add.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum AddOutcome {
    /// The probe matched an equal stored value; the trie is untouched.
    Unchanged,
    /// An existing value was overwritten; element count unchanged.
    Replaced,
    /// A new value was stored.
    Inserted,
}

/// What `add` decided to do at the current node.
enum Plan {
    Unchanged,
    Store { occupied: bool },
    Promote,
    Recurse,
}

/// Inserts the probe's value into the subtree behind `slot`.
///
/// A node whose writer tag matches the probe's author is mutated in
/// place and keeps its identity. Any other node is replaced by a shallow
/// copy with one sparse array changed; the changed array's writer
/// becomes the probe's author, whether that author is a live commit or
/// [`AuthorId::NONE`].
pub(crate) fn add<T, P>(slot: &mut Arc<Node<T>>, probe: P, shift: u32) -> AddOutcome
where
    T: Pathed + Clone,
    P: AddProbe<T>,
{
    if matches!(&**slot, Node::Collision { .. }) {
        return add_to_collision(slot, probe);
    }

    let idx = node::fragment(probe.path(), shift);
    let plan = {
        let (items, children, _, _) = slot.inner();
        debug_assert_eq!(
            items.bitmap() & children.bitmap(),
            0,
            "item and child slots are disjoint"
        );
        match items.get(idx) {
            Some(stored) if probe.matches(stored) => {
                if probe.replaces(stored) {
                    Plan::Store { occupied: true }
                } else {
                    Plan::Unchanged
                }
            }
            Some(_) => Plan::Promote,
            None if children.contains(idx) => Plan::Recurse,
            None => Plan::Store { occupied: false },
        }
    };

    match plan {
        Plan::Unchanged => AddOutcome::Unchanged,
        Plan::Store { occupied } => {
            let author = probe.author();
            store_item(slot, idx, probe.into_value(), author);
            if occupied {
                AddOutcome::Replaced
            } else {
                AddOutcome::Inserted
            }
        }
        Plan::Promote => {
            promote(slot, probe, idx, shift);
            AddOutcome::Inserted
        }
        Plan::Recurse => recurse(slot, probe, idx, shift),
    }
}

/// Writes `value` at `items[idx]`, in place when `author` owns the array.
fn store_item<T: Clone>(slot: &mut Arc<Node<T>>, idx: u32, value: T, author: AuthorId) {
    let (_, _, writer_items, _) = slot.inner();
    if author.authorizes(writer_items) {
        let (items, _) = Arc::make_mut(slot).inner_mut();
        items.set_mut(idx, value);
    } else {
        let next = {
            let (items, children, _, writer_children) = slot.inner();
            Node::Inner {
                items: items.with(idx, value),
                children: children.clone(),
                writer_items: author,
                writer_children,
            }
        };
        *slot = Arc::new(next);
    }
}

/// Moves a non-matching stored value together with the probe's value
/// into a fresh sub-trie one level deeper, clearing the item slot.
fn promote<T, P>(slot: &mut Arc<Node<T>>, probe: P, idx: u32, shift: u32)
where
    T: Pathed + Clone,
    P: AddProbe<T>,
{
    let author = probe.author();
    let existing = {
        let (items, _, _, _) = slot.inner();
        items.get(idx).cloned().expect("promoted slot is occupied")
    };
    let child = Arc::new(join(
        existing,
        probe.into_value(),
        shift + node::BITS_PER_LEVEL,
        author,
    ));

    let (_, _, writer_items, writer_children) = slot.inner();
    if author.authorizes(writer_items) && author.authorizes(writer_children) {
        let (items, children) = Arc::make_mut(slot).inner_mut();
        items.remove_mut(idx);
        children.set_mut(idx, child);
    } else {
        let next = {
            let (items, children, _, _) = slot.inner();
            Node::Inner {
                items: items.without(idx),
                children: children.with(idx, child),
                writer_items: author,
                writer_children: author,
            }
        };
        *slot = Arc::new(next);
    }
}

/// Descends into the child at `idx`, splicing a changed child back in
/// when the child itself could not be edited in place.
fn recurse<T, P>(slot: &mut Arc<Node<T>>, probe: P, idx: u32, shift: u32) -> AddOutcome
where
    T: Pathed + Clone,
    P: AddProbe<T>,
{
    let author = probe.author();
    let (_, _, _, writer_children) = slot.inner();

    if author.authorizes(writer_children) {
        let (_, children) = Arc::make_mut(slot).inner_mut();
        let child = children
            .get_mut(idx)
            .expect("recursed slot holds a child");
        return add(child, probe, shift + node::BITS_PER_LEVEL);
    }

    // Shared subtree: edit a local handle and rebuild this level.
    let mut child = {
        let (_, children, _, _) = slot.inner();
        children
            .get(idx)
            .cloned()
            .expect("recursed slot holds a child")
    };
    let outcome = add(&mut child, probe, shift + node::BITS_PER_LEVEL);
    if !matches!(outcome, AddOutcome::Unchanged) {
        let next = {
            let (items, children, writer_items, _) = slot.inner();
            Node::Inner {
                items: items.clone(),
                children: children.with(idx, child),
                writer_items,
                writer_children: author,
            }
        };
        *slot = Arc::new(next);
    }
    outcome
}

/// Builds the sub-trie holding two values that collide at the current
/// depth.
///
/// Fragments may keep colliding for several levels, producing a chain of
/// single-child nodes; a collision bucket terminates the chain once the
/// path is exhausted.
fn join<T: Pathed>(existing: T, incoming: T, shift: u32, author: AuthorId) -> Node<T> {
    if shift > node::MAX_SHIFT {
        return Node::Collision {
            path: existing.path(),
            entries: vec![existing, incoming],
            writer: author,
        };
    }

    let f1 = node::fragment(existing.path(), shift);
    let f2 = node::fragment(incoming.path(), shift);

    if f1 == f2 {
        let child = join(existing, incoming, shift + node::BITS_PER_LEVEL, author);
        Node::Inner {
            items: SparseArray::new(),
            children: SparseArray::unit(f1, Arc::new(child)),
            writer_items: author,
            writer_children: author,
        }
    } else {
        let mut items = SparseArray::new();
        items.set_mut(f1, existing);
        items.set_mut(f2, incoming);
        Node::Inner {
            items,
            children: SparseArray::new(),
            writer_items: author,
            writer_children: author,
        }
    }
}

/// Insert into a collision bucket.
///
/// Every value reaching the bucket shares its full 64-bit path, so the
/// probe only needs a linear match scan.
fn add_to_collision<T, P>(slot: &mut Arc<Node<T>>, probe: P) -> AddOutcome
where
    T: Clone,
    P: AddProbe<T>,
{
    let author = probe.author();
    enum Hit {
        Unchanged,
        ReplaceAt(usize),
        Append,
    }
    let hit = {
        let (path, entries, _) = slot.collision();
        debug_assert_eq!(path, probe.path());
        match entries.iter().position(|stored| probe.matches(stored)) {
            Some(i) if probe.replaces(&entries[i]) => Hit::ReplaceAt(i),
            Some(_) => Hit::Unchanged,
            None => Hit::Append,
        }
    };

    let (_, _, writer) = slot.collision();
    match hit {
        Hit::Unchanged => AddOutcome::Unchanged,
        Hit::ReplaceAt(i) => {
            if author.authorizes(writer) {
                slot_entries_mut(slot)[i] = probe.into_value();
            } else {
                let next = rebuilt_collision(slot, author, |entries| {
                    entries[i] = probe.into_value();
                });
                *slot = Arc::new(next);
            }
            AddOutcome::Replaced
        }
        Hit::Append => {
            if author.authorizes(writer) {
                slot_entries_mut(slot).push(probe.into_value());
            } else {
                let next = rebuilt_collision(slot, author, |entries| {
                    entries.push(probe.into_value());
                });
                *slot = Arc::new(next);
            }
            AddOutcome::Inserted
        }
    }
}

fn slot_entries_mut<T: Clone>(slot: &mut Arc<Node<T>>) -> &mut Vec<T> {
    Arc::make_mut(slot).collision_mut()
}

/// Clones the bucket, applies `edit`, and tags the copy with `author`.
fn rebuilt_collision<T: Clone>(
    slot: &Arc<Node<T>>,
    author: AuthorId,
    edit: impl FnOnce(&mut Vec<T>),
) -> Node<T> {
    let (path, entries, _) = slot.collision();
    let mut entries = entries.to_vec();
    edit(&mut entries);
    Node::Collision {
        path,
        entries,
        writer: author,
    }
}
