//! Recursive set trie node.
//!
//! A node reached from the root by following `e1 < e2 < ... < ek` represents
//! the set `{e1, ..., ek}`. Children are kept in a `BTreeMap`, so sibling
//! order equals element order; subset and superset searches rely on that to
//! stop scanning siblings early.
//!
//! Every operation takes its set as a sorted, duplicate-free slice. This is
//! checked with `debug_assert!` only.
//!
//! Recursion depth is bounded by the size of the largest stored set.

mod algebra;
mod query;
mod traverse;

pub use traverse::{BreadthFirst, DepthFirst};
pub(crate) use traverse::{reconstruct, Link};

use crate::set::is_normalized;
use crate::storage::Storage;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// One trie level: children by element, the payload of the set ending here,
/// and the number of stored sets at or below this node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T, S> {
    children: BTreeMap<T, Node<T, S>>,
    storage: S,
    count: usize,
}

impl<T, S: Default> Default for Node<T, S> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            storage: S::default(),
            count: 0,
        }
    }
}

impl<T: Ord + Clone, S: Storage> Node<T, S> {
    /// An empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sets at or below this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when no set is stored at or below this node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Payload of the set ending at this node.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Child nodes in element order.
    #[inline]
    pub fn children(&self) -> &BTreeMap<T, Node<T, S>> {
        &self.children
    }

    /// Node for `set`, whether or not a set ends there.
    pub fn node(&self, set: &[T]) -> Option<&Self> {
        debug_assert!(is_normalized(set));
        let mut node = self;
        for element in set {
            node = node.children.get(element)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, set: &[T]) -> Option<&mut Self> {
        let mut node = self;
        for element in set {
            node = node.children.get_mut(element)?;
        }
        Some(node)
    }

    /// Whether `set` is stored.
    pub fn contains(&self, set: &[T]) -> bool {
        self.node(set).is_some_and(|n| n.storage.is_present())
    }

    /// Payload of `set`, if stored.
    pub fn get(&self, set: &[T]) -> Option<&S> {
        self.node(set)
            .map(|n| &n.storage)
            .filter(|s| s.is_present())
    }

    /// Mutable payload of an already stored `set`.
    ///
    /// Callers must leave the payload present.
    pub(crate) fn get_mut(&mut self, set: &[T]) -> Option<&mut S> {
        self.node_mut(set)
            .map(|n| &mut n.storage)
            .filter(|s| s.is_present())
    }

    /// Apply `f` to the payload of `set`, creating the path on demand and
    /// pruning it again if the payload ends up absent. Counts along the path
    /// are kept exact.
    pub(crate) fn update<R>(&mut self, set: &[T], f: impl FnOnce(&mut S) -> R) -> R {
        debug_assert!(is_normalized(set));
        match set.split_first() {
            None => {
                let was_present = self.storage.is_present();
                let result = f(&mut self.storage);
                match (was_present, self.storage.is_present()) {
                    (false, true) => self.count += 1,
                    (true, false) => self.count -= 1,
                    _ => {}
                }
                result
            }
            Some((head, rest)) => {
                let child = self.children.entry(head.clone()).or_default();
                let before = child.count;
                let result = child.update(rest, f);
                let after = child.count;
                if after == 0 {
                    self.children.remove(head);
                }
                self.count = self.count + after - before;
                result
            }
        }
    }

    /// Add `value` under `set`. Returns whether the trie changed.
    pub fn add(&mut self, set: &[T], value: S::Value) -> bool {
        self.update(set, |s| s.add(value))
    }

    /// Merge a whole payload under `set`.
    pub fn add_from(&mut self, set: &[T], storage: &S) -> bool {
        self.update(set, |s| s.add_from(storage))
    }

    /// Remove one `value` from `set`; the set disappears with its last value.
    pub fn remove(&mut self, set: &[T], value: &S::Value) -> bool {
        if self.node(set).is_none() {
            return false;
        }
        self.update(set, |s| s.remove(value))
    }

    /// Remove `set` with every value stored under it.
    pub fn remove_set(&mut self, set: &[T]) -> bool {
        if self.node(set).is_none() {
            return false;
        }
        self.update(set, |s| s.clear())
    }

    /// Drop every stored set.
    pub fn clear(&mut self) {
        self.children.clear();
        self.storage = S::default();
        self.count = 0;
    }

    /// Recompute `count` from the payload and direct children.
    fn recount(&mut self) {
        self.count = usize::from(self.storage.is_present())
            + self.children.values().map(|c| c.count).sum::<usize>();
    }

    /// First stored set in depth-first order at or below this node,
    /// with `path` as this node's own set.
    fn first_from(&self, mut path: Vec<T>) -> Option<(Vec<T>, &S)> {
        let mut node = self;
        loop {
            if node.storage.is_present() {
                return Some((path, &node.storage));
            }
            let (element, child) = node.children.iter().next()?;
            path.push(element.clone());
            node = child;
        }
    }

    /// First stored set, depth-first (lexicographic) order.
    pub fn first(&self) -> Option<(Vec<T>, &S)> {
        self.first_from(Vec::new())
    }

    /// Depth-first successor of `after` (or the first set when `None`).
    ///
    /// `after` need not be stored; the result is the first stored set that
    /// sorts strictly after it in pre-order.
    pub fn successor(&self, after: Option<&[T]>) -> Option<(Vec<T>, &S)> {
        let Some(after) = after else {
            return self.first();
        };

        // Nodes along the longest stored prefix of `after`.
        let mut chain: Vec<&Self> = vec![self];
        for element in after {
            match chain.last().and_then(|n| n.children.get(element)) {
                Some(child) => chain.push(child),
                None => break,
            }
        }

        let mut path: Vec<T> = after[..chain.len() - 1].to_vec();
        if chain.len() == after.len() + 1 {
            // Descendants of `after` come right after it.
            if let Some((element, child)) = chain[after.len()].children.iter().next() {
                path.push(element.clone());
                return child.first_from(path);
            }
        }

        for depth in (0..chain.len()).rev() {
            path.truncate(depth);
            let Some(pivot) = after.get(depth) else {
                continue;
            };
            if let Some((element, child)) = chain[depth]
                .children
                .range((Excluded(pivot), Unbounded))
                .next()
            {
                path.push(element.clone());
                return child.first_from(path);
            }
        }
        None
    }
}
