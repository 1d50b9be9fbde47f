//! Detached, revision-checked enumeration.
//!
//! A cursor borrows nothing: it keeps the container revision it was created
//! against plus its own position, and is advanced by handing it the
//! container. Any mutation of the container in between bumps the revision,
//! and the next `advance` fails with [`SetTrieError::InvalidState`] instead
//! of yielding from a changed tree.

use crate::error::SetTrieError;
use crate::node::{reconstruct, Link, Node};
use crate::storage::Storage;
use crate::Result;
use std::collections::VecDeque;

/// A container backed by a single set trie with a revision counter.
pub trait TrieContainer {
    type Element: Ord + Clone;
    type Storage: Storage;

    /// Root node of the backing trie.
    fn trie(&self) -> &Node<Self::Element, Self::Storage>;

    /// Monotonic counter bumped on every mutation.
    fn revision(&self) -> u64;
}

fn check_revision<C: TrieContainer>(captured: u64, container: &C) -> Result<()> {
    if captured == container.revision() {
        Ok(())
    } else {
        Err(SetTrieError::stale_cursor(captured, container.revision()))
    }
}

/// Depth-first (lexicographic) cursor.
#[derive(Debug, Clone)]
pub struct DepthFirstCursor<T> {
    revision: u64,
    last: Option<Vec<T>>,
    finished: bool,
}

impl<T: Ord + Clone> DepthFirstCursor<T> {
    pub fn new<C: TrieContainer<Element = T>>(container: &C) -> Self {
        Self {
            revision: container.revision(),
            last: None,
            finished: false,
        }
    }

    /// Revision captured at creation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Next stored set and its payload, or `None` once exhausted.
    pub fn advance<'a, C: TrieContainer<Element = T>>(
        &mut self,
        container: &'a C,
    ) -> Result<Option<(Vec<T>, &'a C::Storage)>>
    where
        T: 'a,
    {
        check_revision(self.revision, container)?;
        if self.finished {
            return Ok(None);
        }
        match container.trie().successor(self.last.as_deref()) {
            Some((set, storage)) => {
                self.last = Some(set.clone());
                Ok(Some((set, storage)))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}

/// Breadth-first (size, then lexicographic) cursor.
///
/// Queued positions are parent-chain records; each is rebuilt into a set and
/// resolved from the root when reached.
#[derive(Debug, Clone)]
pub struct BreadthFirstCursor<T> {
    revision: u64,
    chain: Vec<Link<T>>,
    queue: VecDeque<Option<usize>>,
}

impl<T: Ord + Clone> BreadthFirstCursor<T> {
    pub fn new<C: TrieContainer<Element = T>>(container: &C) -> Self {
        Self {
            revision: container.revision(),
            chain: Vec::new(),
            queue: VecDeque::from([None]),
        }
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn advance<'a, C: TrieContainer<Element = T>>(
        &mut self,
        container: &'a C,
    ) -> Result<Option<(Vec<T>, &'a C::Storage)>>
    where
        T: 'a,
    {
        check_revision(self.revision, container)?;
        while let Some(link) = self.queue.pop_front() {
            let set = reconstruct(&self.chain, link);
            let node = container.trie().node(&set).ok_or_else(|| {
                SetTrieError::InvalidState("cursor position no longer exists".into())
            })?;
            for element in node.children().keys() {
                self.chain.push(Link {
                    parent: link,
                    element: element.clone(),
                });
                self.queue.push_back(Some(self.chain.len() - 1));
            }
            if node.storage().is_present() {
                return Ok(Some((set, node.storage())));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetMap;

    fn drain_depth_first<C: TrieContainer>(
        container: &C,
    ) -> Vec<(Vec<C::Element>, &C::Storage)> {
        let mut cursor = DepthFirstCursor::new(container);
        let mut out = Vec::new();
        while let Some(entry) = cursor.advance(container).expect("unchanged") {
            out.push(entry);
        }
        out
    }

    fn drain_breadth_first<C: TrieContainer>(
        container: &C,
    ) -> Vec<(Vec<C::Element>, &C::Storage)> {
        let mut cursor = BreadthFirstCursor::new(container);
        let mut out = Vec::new();
        while let Some(entry) = cursor.advance(container).expect("unchanged") {
            out.push(entry);
        }
        out
    }

    #[test]
    fn payloads_outlive_the_cursor() {
        let map: SetMap<String, u32> = vec![
            (vec!["b".to_string()], 2),
            (vec!["a".to_string(), "c".to_string()], 13),
            (vec!["a".to_string()], 1),
        ]
        .into_iter()
        .collect();

        let depth: Vec<_> = drain_depth_first(&map)
            .into_iter()
            .map(|(key, storage)| (key.join(""), storage.get().copied()))
            .collect();
        assert_eq!(
            depth,
            vec![
                ("a".to_string(), Some(1)),
                ("ac".to_string(), Some(13)),
                ("b".to_string(), Some(2)),
            ]
        );

        let breadth: Vec<_> = drain_breadth_first(&map)
            .into_iter()
            .map(|(key, storage)| (key.join(""), storage.get().copied()))
            .collect();
        assert_eq!(
            breadth,
            vec![
                ("a".to_string(), Some(1)),
                ("b".to_string(), Some(2)),
                ("ac".to_string(), Some(13)),
            ]
        );
    }
}
