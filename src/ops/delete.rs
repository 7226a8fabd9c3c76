//! Removal operation — in-place under the probe's author, path-copy
//! otherwise, collapsing single-item subtrees back into their parents.

use std::sync::Arc;

use crate::author::AuthorId;
use crate::node::{self, Node};
use crate::probe::{DeleteProbe, Pathed};

/// Outcome of a recursive delete.
pub(crate) enum DeleteOutcome<T> {
    /// No stored value matched; the trie is untouched.
    NotFound,
    /// The value was removed; the node behind the slot is still live.
    Deleted,
    /// The value was removed and the subtree is now empty; the caller
    /// clears its child slot.
    Emptied,
    /// The value was removed, leaving exactly one item; the caller
    /// stores it inline in place of the subtree.
    Collapsed(T),
}

/// How a node settles after losing one occupant.
enum Shape<T> {
    Empty,
    Collapse(T),
    Shrink { owned: bool },
}

/// Removes the value matching `probe` from the subtree behind `slot`.
pub(crate) fn delete<T, P>(slot: &mut Arc<Node<T>>, probe: &P, shift: u32) -> DeleteOutcome<T>
where
    T: Pathed + Clone,
    P: DeleteProbe<T>,
{
    if matches!(&**slot, Node::Collision { .. }) {
        return delete_from_collision(slot, probe);
    }

    let idx = node::fragment(probe.path(), shift);
    enum Plan {
        Miss,
        Clear,
        Recurse,
    }
    let plan = {
        let (items, children, _, _) = slot.inner();
        debug_assert_eq!(
            items.bitmap() & children.bitmap(),
            0,
            "item and child slots are disjoint"
        );
        if let Some(stored) = items.get(idx) {
            if probe.matches(stored) {
                Plan::Clear
            } else {
                Plan::Miss
            }
        } else if children.contains(idx) {
            Plan::Recurse
        } else {
            Plan::Miss
        }
    };

    match plan {
        Plan::Miss => DeleteOutcome::NotFound,
        Plan::Clear => clear_item(slot, idx, probe.author()),
        Plan::Recurse => recurse(slot, probe, idx, shift),
    }
}

/// Clears `items[idx]`, collapsing or emptying the node if that leaves
/// it trivial.
fn clear_item<T: Clone>(slot: &mut Arc<Node<T>>, idx: u32, author: AuthorId) -> DeleteOutcome<T> {
    let shape = {
        let (items, children, writer_items, _) = slot.inner();
        let items_left = items.len() - 1;
        if items_left == 0 && children.is_empty() {
            Shape::Empty
        } else if items_left == 1 && children.is_empty() {
            // Two dense slots; the survivor is the other one.
            let off = items.offset(idx);
            let survivor = items
                .iter()
                .nth(1 - off)
                .cloned()
                .expect("two items before collapse");
            Shape::Collapse(survivor)
        } else {
            Shape::Shrink {
                owned: author.authorizes(writer_items),
            }
        }
    };

    match shape {
        Shape::Empty => DeleteOutcome::Emptied,
        Shape::Collapse(item) => DeleteOutcome::Collapsed(item),
        Shape::Shrink { owned: true } => {
            let (items, _) = Arc::make_mut(slot).inner_mut();
            items.remove_mut(idx);
            DeleteOutcome::Deleted
        }
        Shape::Shrink { owned: false } => {
            let next = {
                let (items, children, _, writer_children) = slot.inner();
                Node::Inner {
                    items: items.without(idx),
                    children: children.clone(),
                    writer_items: author,
                    writer_children,
                }
            };
            *slot = Arc::new(next);
            DeleteOutcome::Deleted
        }
    }
}

/// Descends into the child at `idx` and settles whatever the recursion
/// left behind.
fn recurse<T, P>(slot: &mut Arc<Node<T>>, probe: &P, idx: u32, shift: u32) -> DeleteOutcome<T>
where
    T: Pathed + Clone,
    P: DeleteProbe<T>,
{
    let author = probe.author();
    let owned = {
        let (_, _, _, writer_children) = slot.inner();
        author.authorizes(writer_children)
    };

    let child_outcome = if owned {
        let (_, children) = Arc::make_mut(slot).inner_mut();
        let child = children
            .get_mut(idx)
            .expect("recursed slot holds a child");
        delete(child, probe, shift + node::BITS_PER_LEVEL)
    } else {
        let mut child = {
            let (_, children, _, _) = slot.inner();
            children
                .get(idx)
                .cloned()
                .expect("recursed slot holds a child")
        };
        let outcome = delete(&mut child, probe, shift + node::BITS_PER_LEVEL);
        if matches!(outcome, DeleteOutcome::Deleted) {
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
        // Emptied and Collapsed rebuild below from the original node.
        outcome
    };

    match child_outcome {
        DeleteOutcome::NotFound => DeleteOutcome::NotFound,
        DeleteOutcome::Deleted => DeleteOutcome::Deleted,
        DeleteOutcome::Emptied => drop_child(slot, idx, author),
        DeleteOutcome::Collapsed(item) => inline_item(slot, idx, item, author),
    }
}

/// Removes the child at `idx`, collapsing or emptying the node if that
/// leaves it trivial.
fn drop_child<T: Clone>(slot: &mut Arc<Node<T>>, idx: u32, author: AuthorId) -> DeleteOutcome<T> {
    let shape = {
        let (items, children, _, writer_children) = slot.inner();
        let children_left = children.len() - 1;
        if items.is_empty() && children_left == 0 {
            Shape::Empty
        } else if items.len() == 1 && children_left == 0 {
            let survivor = items
                .iter()
                .next()
                .cloned()
                .expect("single item before collapse");
            Shape::Collapse(survivor)
        } else {
            Shape::Shrink {
                owned: author.authorizes(writer_children),
            }
        }
    };

    match shape {
        Shape::Empty => DeleteOutcome::Emptied,
        Shape::Collapse(item) => DeleteOutcome::Collapsed(item),
        Shape::Shrink { owned: true } => {
            let (_, children) = Arc::make_mut(slot).inner_mut();
            children.remove_mut(idx);
            DeleteOutcome::Deleted
        }
        Shape::Shrink { owned: false } => {
            let next = {
                let (items, children, writer_items, _) = slot.inner();
                Node::Inner {
                    items: items.clone(),
                    children: children.without(idx),
                    writer_items,
                    writer_children: author,
                }
            };
            *slot = Arc::new(next);
            DeleteOutcome::Deleted
        }
    }
}

/// Replaces the child at `idx` with `item` stored inline.
fn inline_item<T: Clone>(
    slot: &mut Arc<Node<T>>,
    idx: u32,
    item: T,
    author: AuthorId,
) -> DeleteOutcome<T> {
    let cascade = {
        let (items, children, _, _) = slot.inner();
        items.is_empty() && children.len() == 1
    };
    if cascade {
        // Inlining here would leave a single-item node; let the parent
        // absorb the item instead.
        return DeleteOutcome::Collapsed(item);
    }

    let (_, _, writer_items, writer_children) = slot.inner();
    if author.authorizes(writer_items) && author.authorizes(writer_children) {
        let (items, children) = Arc::make_mut(slot).inner_mut();
        children.remove_mut(idx);
        items.set_mut(idx, item);
    } else {
        let next = {
            let (items, children, _, _) = slot.inner();
            Node::Inner {
                items: items.with(idx, item),
                children: children.without(idx),
                writer_items: author,
                writer_children: author,
            }
        };
        *slot = Arc::new(next);
    }
    DeleteOutcome::Deleted
}

/// Remove from a collision bucket; a bucket shrunk to one entry hands
/// the survivor up for inlining.
fn delete_from_collision<T, P>(slot: &mut Arc<Node<T>>, probe: &P) -> DeleteOutcome<T>
where
    T: Clone,
    P: DeleteProbe<T>,
{
    let author = probe.author();
    enum Hit<T> {
        Miss,
        Collapse(T),
        RemoveAt(usize),
    }
    let hit = {
        let (path, entries, _) = slot.collision();
        if path != probe.path() {
            Hit::Miss
        } else {
            match entries.iter().position(|stored| probe.matches(stored)) {
                None => Hit::Miss,
                Some(i) if entries.len() == 2 => Hit::Collapse(entries[1 - i].clone()),
                Some(i) => Hit::RemoveAt(i),
            }
        }
    };

    match hit {
        Hit::Miss => DeleteOutcome::NotFound,
        Hit::Collapse(survivor) => DeleteOutcome::Collapsed(survivor),
        Hit::RemoveAt(i) => {
            let (_, _, writer) = slot.collision();
            if author.authorizes(writer) {
                Arc::make_mut(slot).collision_mut().remove(i);
            } else {
                let next = {
                    let (path, entries, _) = slot.collision();
                    let mut entries = entries.to_vec();
                    entries.remove(i);
                    Node::Collision {
                        path,
                        entries,
                        writer: author,
                    }
                };
                *slot = Arc::new(next);
            }
            DeleteOutcome::Deleted
        }
    }
}
