//! Lookup operation — descends the trie by path fragments.

use crate::node::{self, Node};
use crate::probe::FetchProbe;

/// Searches the subtree rooted at `node` for a value satisfying `probe`.
pub(crate) fn fetch<'a, T, P>(node: &'a Node<T>, probe: &P, shift: u32) -> Option<&'a T>
where
    P: FetchProbe<T>,
{
    match node {
        Node::Inner {
            items, children, ..
        } => {
            let idx = node::fragment(probe.path(), shift);
            if let Some(stored) = items.get(idx) {
                // Single occupancy: a non-matching item means the path
                // terminates here.
                if probe.matches(stored) {
                    Some(stored)
                } else {
                    None
                }
            } else if let Some(child) = children.get(idx) {
                fetch(child, probe, shift + node::BITS_PER_LEVEL)
            } else {
                None
            }
        }
        Node::Collision { path, entries, .. } => {
            if *path != probe.path() {
                return None;
            }
            entries.iter().find(|stored| probe.matches(stored))
        }
    }
}
