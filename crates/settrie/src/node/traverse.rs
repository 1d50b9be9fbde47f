//! Lazy depth-first and breadth-first enumeration with optional
//! subset/superset filtering.

use super::Node;
use crate::storage::Storage;
use std::collections::btree_map::Range;
use std::collections::VecDeque;

/// Which stored sets a traversal reports.
pub(crate) enum Filter<'a, T> {
    All,
    /// Sets contained in the target.
    Subsets(&'a [T]),
    /// Sets containing the target.
    Supersets(&'a [T]),
}

impl<T> Clone for Filter<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Filter<'_, T> {}

/// Outcome of offering one child to a filter.
enum Step {
    Descend(usize),
    Skip,
    /// No later sibling can match either.
    Stop,
}

impl<'a, T: Ord> Filter<'a, T> {
    /// Children of `node` worth visiting, given `matched` progress.
    ///
    /// For subsets `matched` is the index of the first target element still
    /// usable; for supersets it is the number of target elements already on
    /// the path.
    fn children<'n, S>(&self, node: &'n Node<T, S>, matched: usize) -> Range<'n, T, Node<T, S>> {
        match *self {
            Filter::Subsets(target) => match target.get(matched) {
                Some(first) => node.children.range(first..),
                None => node.children.range::<T, _>(..),
            },
            // Siblings beyond the next required element skip it for good.
            Filter::Supersets(target) => match target.get(matched) {
                Some(bound) => node.children.range(..=bound),
                None => node.children.range::<T, _>(..),
            },
            Filter::All => node.children.range::<T, _>(..),
        }
    }

    fn step(&self, matched: usize, element: &T) -> Step {
        match *self {
            Filter::All => Step::Descend(0),
            Filter::Subsets(target) => match target[matched..].binary_search(element) {
                Ok(offset) => Step::Descend(matched + offset + 1),
                Err(offset) if matched + offset == target.len() => Step::Stop,
                Err(_) => Step::Skip,
            },
            Filter::Supersets(target) => {
                if target.get(matched) == Some(element) {
                    Step::Descend(matched + 1)
                } else {
                    Step::Descend(matched)
                }
            }
        }
    }

    /// Whether a present payload at `depth` with `matched` progress is reported.
    fn accepts(&self, matched: usize, depth: usize, proper: bool) -> bool {
        match *self {
            Filter::All => true,
            Filter::Subsets(target) => !(proper && depth == target.len()),
            Filter::Supersets(target) => {
                matched == target.len() && !(proper && depth == target.len())
            }
        }
    }
}

struct Frame<'a, T, S> {
    children: Range<'a, T, Node<T, S>>,
    matched: usize,
}

/// Depth-first (lexicographic) enumeration: a node's own set is reported
/// before any of its extensions, children in element order.
pub struct DepthFirst<'a, T, S> {
    filter: Filter<'a, T>,
    proper: bool,
    root: Option<&'a Node<T, S>>,
    stack: Vec<Frame<'a, T, S>>,
    path: Vec<T>,
}

impl<'a, T: Ord + Clone, S: Storage> DepthFirst<'a, T, S> {
    pub(crate) fn new(root: &'a Node<T, S>, filter: Filter<'a, T>, proper: bool) -> Self {
        Self {
            filter,
            proper,
            root: Some(root),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    fn enter(&mut self, node: &'a Node<T, S>, matched: usize) -> bool {
        self.stack.push(Frame {
            children: self.filter.children(node, matched),
            matched,
        });
        node.storage.is_present() && self.filter.accepts(matched, self.path.len(), self.proper)
    }

    fn leave(&mut self) {
        self.stack.pop();
        self.path.truncate(self.stack.len().saturating_sub(1));
    }
}

impl<'a, T: Ord + Clone, S: Storage> Iterator for DepthFirst<'a, T, S> {
    type Item = (Vec<T>, &'a S);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            if self.enter(root, 0) {
                return Some((Vec::new(), &root.storage));
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let matched = frame.matched;
            let Some((element, child)) = frame.children.next() else {
                self.leave();
                continue;
            };
            let child_matched = match self.filter.step(matched, element) {
                Step::Descend(m) => m,
                Step::Skip => continue,
                Step::Stop => {
                    self.leave();
                    continue;
                }
            };
            self.path.push(element.clone());
            if self.enter(child, child_matched) {
                return Some((self.path.clone(), &child.storage));
            }
        }
    }
}

/// One record of the parent-backtracking chain built by breadth-first
/// traversal; the set of a queued node is rebuilt by following `parent`.
#[derive(Debug, Clone)]
pub(crate) struct Link<T> {
    pub(crate) parent: Option<usize>,
    pub(crate) element: T,
}

/// Rebuild the set ending at `link`.
pub(crate) fn reconstruct<T: Clone>(chain: &[Link<T>], mut link: Option<usize>) -> Vec<T> {
    let mut set = Vec::new();
    while let Some(index) = link {
        set.push(chain[index].element.clone());
        link = chain[index].parent;
    }
    set.reverse();
    set
}

struct Pending<'a, T, S> {
    node: &'a Node<T, S>,
    link: Option<usize>,
    matched: usize,
    depth: usize,
}

/// Breadth-first enumeration: every set of size `k` before any of size
/// `k + 1`, lexicographic within a size class.
pub struct BreadthFirst<'a, T, S> {
    filter: Filter<'a, T>,
    proper: bool,
    queue: VecDeque<Pending<'a, T, S>>,
    chain: Vec<Link<T>>,
}

impl<'a, T: Ord + Clone, S: Storage> BreadthFirst<'a, T, S> {
    pub(crate) fn new(root: &'a Node<T, S>, filter: Filter<'a, T>, proper: bool) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(Pending {
            node: root,
            link: None,
            matched: 0,
            depth: 0,
        });
        Self {
            filter,
            proper,
            queue,
            chain: Vec::new(),
        }
    }

    fn expand(&mut self, pending: &Pending<'a, T, S>) {
        for (element, child) in self.filter.children(pending.node, pending.matched) {
            let matched = match self.filter.step(pending.matched, element) {
                Step::Descend(m) => m,
                Step::Skip => continue,
                Step::Stop => break,
            };
            self.chain.push(Link {
                parent: pending.link,
                element: element.clone(),
            });
            self.queue.push_back(Pending {
                node: child,
                link: Some(self.chain.len() - 1),
                matched,
                depth: pending.depth + 1,
            });
        }
    }
}

impl<'a, T: Ord + Clone, S: Storage> Iterator for BreadthFirst<'a, T, S> {
    type Item = (Vec<T>, &'a S);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pending) = self.queue.pop_front() {
            self.expand(&pending);
            if pending.node.storage.is_present()
                && self
                    .filter
                    .accepts(pending.matched, pending.depth, self.proper)
            {
                return Some((
                    reconstruct(&self.chain, pending.link),
                    &pending.node.storage,
                ));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Presence;

    fn trie(sets: &[&[u32]]) -> Node<u32, Presence> {
        let mut node = Node::new();
        for set in sets {
            node.add(set, ());
        }
        node
    }

    fn sets<'a, I: Iterator<Item = (Vec<u32>, &'a Presence)>>(it: I) -> Vec<Vec<u32>> {
        it.map(|(s, _)| s).collect()
    }

    #[test]
    fn depth_first_is_lexicographic() {
        let t = trie(&[&[2], &[1, 3], &[1], &[1, 2, 3], &[]]);
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::All, false)),
            vec![vec![], vec![1], vec![1, 2, 3], vec![1, 3], vec![2]]
        );
    }

    #[test]
    fn breadth_first_is_size_then_lexicographic() {
        let t = trie(&[&[2], &[1, 3], &[1], &[1, 2, 3], &[], &[0, 9]]);
        assert_eq!(
            sets(BreadthFirst::new(&t, Filter::All, false)),
            vec![vec![], vec![1], vec![2], vec![0, 9], vec![1, 3], vec![1, 2, 3]]
        );
    }

    #[test]
    fn subset_filter() {
        let t = trie(&[&[1], &[1, 2], &[2, 4], &[3], &[1, 2, 3]]);
        let target = [1, 2, 3];
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::Subsets(&target), false)),
            vec![vec![1], vec![1, 2], vec![1, 2, 3], vec![3]]
        );
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::Subsets(&target), true)),
            vec![vec![1], vec![1, 2], vec![3]]
        );
        assert_eq!(
            sets(BreadthFirst::new(&t, Filter::Subsets(&target), false)),
            vec![vec![1], vec![3], vec![1, 2], vec![1, 2, 3]]
        );
    }

    #[test]
    fn superset_filter() {
        let t = trie(&[&[1], &[1, 2], &[0, 2], &[2, 4], &[3], &[1, 2, 3]]);
        let target = [2];
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::Supersets(&target), false)),
            vec![vec![0, 2], vec![1, 2], vec![1, 2, 3], vec![2, 4]]
        );
        assert_eq!(
            sets(BreadthFirst::new(&t, Filter::Supersets(&target), false)),
            vec![vec![0, 2], vec![1, 2], vec![2, 4], vec![1, 2, 3]]
        );
        let exact = [1, 2];
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::Supersets(&exact), true)),
            vec![vec![1, 2, 3]]
        );
    }

    #[test]
    fn empty_target_matches() {
        let t = trie(&[&[], &[5]]);
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::Subsets(&[]), false)),
            vec![Vec::<u32>::new()]
        );
        assert_eq!(
            sets(DepthFirst::new(&t, Filter::Supersets(&[]), true)),
            vec![vec![5]]
        );
    }
}
