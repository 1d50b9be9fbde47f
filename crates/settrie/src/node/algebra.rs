//! Node-by-node set algebra between two tries over the same element type.
//!
//! Payloads of sets present in both operands follow the storage's
//! `add_from`; `intersect_with` and `except_with` keep this trie's payload.

use super::Node;
use crate::storage::Storage;

impl<T: Ord + Clone, S: Storage> Node<T, S> {
    /// Add every set of `other`. Returns whether this trie changed.
    pub fn union_with(&mut self, other: &Self) -> bool {
        let mut changed = self.storage.add_from(&other.storage);
        for (element, other_child) in &other.children {
            changed |= self
                .children
                .entry(element.clone())
                .or_default()
                .union_with(other_child);
        }
        self.recount();
        changed
    }

    /// Keep only sets also stored in `other`.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        if !other.storage.is_present() {
            changed |= self.storage.clear();
        }
        self.children
            .retain(|element, child| match other.children.get(element) {
                Some(other_child) => {
                    changed |= child.intersect_with(other_child);
                    child.count > 0
                }
                None => {
                    changed = true;
                    false
                }
            });
        self.recount();
        changed
    }

    /// Drop every set stored in `other`.
    pub fn except_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        if other.storage.is_present() {
            changed |= self.storage.clear();
        }
        self.children
            .retain(|element, child| match other.children.get(element) {
                Some(other_child) => {
                    changed |= child.except_with(other_child);
                    child.count > 0
                }
                None => true,
            });
        self.recount();
        changed
    }

    /// Keep sets stored in exactly one of the two tries.
    pub fn symmetric_except_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        if other.storage.is_present() {
            if self.storage.is_present() {
                self.storage.clear();
            } else {
                self.storage.add_from(&other.storage);
            }
            changed = true;
        }
        for (element, other_child) in &other.children {
            changed |= self
                .children
                .entry(element.clone())
                .or_default()
                .symmetric_except_with(other_child);
        }
        self.children.retain(|_, child| child.count > 0);
        self.recount();
        changed
    }

    /// Some set is stored in both tries.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.storage.is_present() && other.storage.is_present() {
            return true;
        }
        self.children.iter().any(|(element, child)| {
            other
                .children
                .get(element)
                .is_some_and(|other_child| child.overlaps(other_child))
        })
    }

    /// Every set of this trie is stored in `other`.
    pub fn is_contained_in(&self, other: &Self) -> bool {
        if self.count > other.count {
            return false;
        }
        if self.storage.is_present() && !other.storage.is_present() {
            return false;
        }
        self.children.iter().all(|(element, child)| {
            other
                .children
                .get(element)
                .is_some_and(|other_child| child.is_contained_in(other_child))
        })
    }

    /// Both tries store exactly the same sets (payloads ignored).
    pub fn same_sets(&self, other: &Self) -> bool {
        self.count == other.count && self.is_contained_in(other)
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

    fn sets(t: &Node<u32, Presence>) -> Vec<Vec<u32>> {
        t.iter().map(|(s, _)| s).collect()
    }

    #[test]
    fn union() {
        let mut a = trie(&[&[1], &[1, 2]]);
        let b = trie(&[&[1, 2], &[3], &[]]);
        assert!(a.union_with(&b));
        assert_eq!(sets(&a), vec![vec![], vec![1], vec![1, 2], vec![3]]);
        assert_eq!(a.len(), 4);
        assert!(!a.union_with(&b));
    }

    #[test]
    fn intersect() {
        let mut a = trie(&[&[1], &[1, 2], &[2, 3], &[]]);
        let b = trie(&[&[1, 2], &[2], &[2, 3, 4]]);
        assert!(a.intersect_with(&b));
        assert_eq!(sets(&a), vec![vec![1, 2]]);
        assert_eq!(a.len(), 1);
        assert!(a.node(&[2]).is_none());
    }

    #[test]
    fn except() {
        let mut a = trie(&[&[1], &[1, 2], &[2, 3]]);
        let b = trie(&[&[1, 2], &[2, 3], &[4]]);
        assert!(a.except_with(&b));
        assert_eq!(sets(&a), vec![vec![1]]);
        assert!(!a.except_with(&b));
    }

    #[test]
    fn symmetric_except() {
        let mut a = trie(&[&[1], &[1, 2]]);
        let b = trie(&[&[1, 2], &[3]]);
        assert!(a.symmetric_except_with(&b));
        assert_eq!(sets(&a), vec![vec![1], vec![3]]);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn relations() {
        let a = trie(&[&[1], &[1, 2]]);
        let b = trie(&[&[1, 2], &[3], &[1]]);
        let c = trie(&[&[2]]);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.is_contained_in(&b));
        assert!(!b.is_contained_in(&a));
        assert!(!a.same_sets(&b));
        assert!(a.same_sets(&trie(&[&[1, 2], &[1]])));
    }
}
