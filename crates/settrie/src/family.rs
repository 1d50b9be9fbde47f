//! A set of sets built on the trie with membership-only payloads.

use crate::cursor::{BreadthFirstCursor, DepthFirstCursor, TrieContainer};
use crate::node::Node;
use crate::set;
use crate::storage::Presence;
use itertools::Itertools;
use std::fmt;

/// Family of sets over a totally ordered element type.
///
/// Sets are passed as sorted, duplicate-free slices (see [`crate::set::normalize`]).
#[derive(Debug, Clone)]
pub struct SetFamily<T> {
    root: Node<T, Presence>,
    revision: u64,
}

impl<T> Default for SetFamily<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            revision: 0,
        }
    }
}

impl<T: Ord + Clone> TrieContainer for SetFamily<T> {
    type Element = T;
    type Storage = Presence;

    fn trie(&self) -> &Node<T, Presence> {
        &self.root
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

// Core membership
impl<T: Ord + Clone> SetFamily<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Family holding exactly `set`.
    #[must_use]
    pub fn singleton(set: &[T]) -> Self {
        let mut family = Self::new();
        family.insert(set);
        family
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Mutation counter; see [`TrieContainer::revision`].
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self, changed: bool) -> bool {
        if changed {
            self.revision += 1;
        }
        changed
    }

    pub fn contains(&self, set: &[T]) -> bool {
        self.root.contains(set)
    }

    /// Insert `set`; `false` if it was already present.
    pub fn insert(&mut self, set: &[T]) -> bool {
        let changed = self.root.add(set, ());
        self.touch(changed)
    }

    pub fn remove(&mut self, set: &[T]) -> bool {
        let changed = self.root.remove_set(set);
        self.touch(changed)
    }

    pub fn clear(&mut self) {
        let changed = !self.root.is_empty();
        self.root.clear();
        self.touch(changed);
    }

    /// Sets in depth-first (lexicographic) order.
    pub fn iter(&self) -> impl Iterator<Item = Vec<T>> + '_ {
        self.root.iter().map(|(set, _)| set)
    }

    /// Sets by size, then lexicographically.
    pub fn iter_breadth_first(&self) -> impl Iterator<Item = Vec<T>> + '_ {
        self.root.iter_breadth_first().map(|(set, _)| set)
    }

    /// Lexicographically first set.
    pub fn first(&self) -> Option<Vec<T>> {
        self.root.first().map(|(set, _)| set)
    }

    /// Smallest set, lexicographic among equals.
    pub fn smallest(&self) -> Option<Vec<T>> {
        self.iter_breadth_first().next()
    }

    pub fn pop_first(&mut self) -> Option<Vec<T>> {
        let set = self.first()?;
        self.remove(&set);
        Some(set)
    }

    pub fn pop_smallest(&mut self) -> Option<Vec<T>> {
        let set = self.smallest()?;
        self.remove(&set);
        Some(set)
    }

    /// Detached depth-first cursor bound to the current revision.
    pub fn cursor(&self) -> DepthFirstCursor<T> {
        DepthFirstCursor::new(self)
    }

    /// Detached breadth-first cursor bound to the current revision.
    pub fn cursor_breadth_first(&self) -> BreadthFirstCursor<T> {
        BreadthFirstCursor::new(self)
    }
}

// Subset / superset queries
impl<T: Ord + Clone> SetFamily<T> {
    pub fn subsets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Vec<T>> + 'a {
        self.root.subsets_of(set).map(|(s, _)| s)
    }

    pub fn proper_subsets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Vec<T>> + 'a {
        self.root.proper_subsets_of(set).map(|(s, _)| s)
    }

    pub fn supersets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Vec<T>> + 'a {
        self.root.supersets_of(set).map(|(s, _)| s)
    }

    pub fn proper_supersets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Vec<T>> + 'a {
        self.root.proper_supersets_of(set).map(|(s, _)| s)
    }

    pub fn subsets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Vec<T>> + 'a {
        self.root.subsets_of_breadth_first(set).map(|(s, _)| s)
    }

    pub fn supersets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Vec<T>> + 'a {
        self.root.supersets_of_breadth_first(set).map(|(s, _)| s)
    }

    pub fn contains_subset_of(&self, set: &[T]) -> bool {
        self.root.contains_subset_of(set)
    }

    pub fn contains_proper_subset_of(&self, set: &[T]) -> bool {
        self.root.contains_proper_subset_of(set)
    }

    pub fn contains_superset_of(&self, set: &[T]) -> bool {
        self.root.contains_superset_of(set)
    }

    pub fn contains_proper_superset_of(&self, set: &[T]) -> bool {
        self.root.contains_proper_superset_of(set)
    }

    pub fn count_subsets_of(&self, set: &[T]) -> usize {
        self.root.count_subsets_of(set)
    }

    pub fn count_supersets_of(&self, set: &[T]) -> usize {
        self.root.count_supersets_of(set)
    }

    pub fn remove_subsets_of(&mut self, set: &[T]) -> usize {
        let removed = self.root.remove_subsets_of(set);
        self.touch(removed > 0);
        removed
    }

    pub fn remove_proper_subsets_of(&mut self, set: &[T]) -> usize {
        let removed = self.root.remove_proper_subsets_of(set);
        self.touch(removed > 0);
        removed
    }

    pub fn remove_supersets_of(&mut self, set: &[T]) -> usize {
        let removed = self.root.remove_supersets_of(set);
        self.touch(removed > 0);
        removed
    }

    pub fn remove_proper_supersets_of(&mut self, set: &[T]) -> usize {
        let removed = self.root.remove_proper_supersets_of(set);
        self.touch(removed > 0);
        removed
    }
}

// Antichain maintenance and combination
impl<T: Ord + Clone> SetFamily<T> {
    /// Insert `set` unless a stored set is already a subset of it; stored
    /// supersets of `set` are evicted first. The family stays an antichain
    /// of minimal sets. Returns whether anything changed.
    pub fn add_with_minimal_invariant(&mut self, set: &[T]) -> bool {
        if self.root.contains_subset_of(set) {
            return false;
        }
        self.root.remove_supersets_of(set);
        let changed = self.root.add(set, ());
        self.touch(changed)
    }

    /// Dual of [`Self::add_with_minimal_invariant`]: keeps maximal sets.
    pub fn add_with_maximal_invariant(&mut self, set: &[T]) -> bool {
        if self.root.contains_superset_of(set) {
            return false;
        }
        self.root.remove_subsets_of(set);
        let changed = self.root.add(set, ());
        self.touch(changed)
    }

    /// Some sub-collection of stored sets has union exactly `target`.
    ///
    /// Only subsets of `target` can take part, so their running union equals
    /// `target` as soon as it has the same size.
    pub fn contains_sets_with_union(&self, target: &[T]) -> bool {
        let mut accumulated: Vec<T> = Vec::new();
        for subset in self.subsets_of_breadth_first(target) {
            accumulated = set::union(&accumulated, &subset);
            if accumulated.len() == target.len() {
                return true;
            }
        }
        false
    }

    /// Some sub-collection of stored sets has intersection exactly `target`.
    pub fn contains_sets_with_intersection(&self, target: &[T]) -> bool {
        let mut accumulated: Option<Vec<T>> = None;
        for superset in self.supersets_of_breadth_first(target) {
            let next = match accumulated {
                None => superset,
                Some(acc) => set::intersection(&acc, &superset),
            };
            if next.len() == target.len() {
                return true;
            }
            accumulated = Some(next);
        }
        false
    }

    /// `{ a ∪ b | a ∈ self, b ∈ other }` reduced to its minimal sets.
    pub fn union_pairs_and_keep_minimal(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for a in self.iter() {
            for b in other.iter() {
                result.add_with_minimal_invariant(&set::union(&a, &b));
            }
        }
        result
    }

    /// `{ a ∪ b | a ∈ self, b ∈ other }` reduced to its maximal sets.
    pub fn union_pairs_and_keep_maximal(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for a in self.iter() {
            for b in other.iter() {
                result.add_with_maximal_invariant(&set::union(&a, &b));
            }
        }
        result
    }
}

// Whole-family algebra
impl<T: Ord + Clone> SetFamily<T> {
    pub fn union_with(&mut self, other: &Self) -> bool {
        let changed = self.root.union_with(&other.root);
        self.touch(changed)
    }

    pub fn intersect_with(&mut self, other: &Self) -> bool {
        let changed = self.root.intersect_with(&other.root);
        self.touch(changed)
    }

    pub fn except_with(&mut self, other: &Self) -> bool {
        let changed = self.root.except_with(&other.root);
        self.touch(changed)
    }

    pub fn symmetric_except_with(&mut self, other: &Self) -> bool {
        let changed = self.root.symmetric_except_with(&other.root);
        self.touch(changed)
    }

    /// Some set is stored in both families.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.root.overlaps(&other.root)
    }

    /// Every set of this family is in `other`.
    pub fn is_subfamily_of(&self, other: &Self) -> bool {
        self.root.is_contained_in(&other.root)
    }

    pub fn is_superfamily_of(&self, other: &Self) -> bool {
        other.root.is_contained_in(&self.root)
    }

    pub fn set_equals(&self, other: &Self) -> bool {
        self.root.same_sets(&other.root)
    }
}

impl<T: Ord + Clone> PartialEq for SetFamily<T> {
    /// Families compare by content; revisions are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.set_equals(other)
    }
}

impl<T: Ord + Clone> Eq for SetFamily<T> {}

impl<T: Ord + Clone> FromIterator<Vec<T>> for SetFamily<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(iter: I) -> Self {
        let mut family = Self::new();
        family.extend(iter);
        family
    }
}

impl<T: Ord + Clone> Extend<Vec<T>> for SetFamily<T> {
    fn extend<I: IntoIterator<Item = Vec<T>>>(&mut self, iter: I) {
        for set in iter {
            self.insert(&set::normalize(set));
        }
    }
}

impl<T: Ord + Clone + fmt::Display> fmt::Display for SetFamily<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter_breadth_first()
                .map(|s| set::display(&s))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetTrieError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn family(sets: &[&[u32]]) -> SetFamily<u32> {
        sets.iter().map(|s| s.to_vec()).collect()
    }

    fn random_set(rng: &mut StdRng, universe: u32) -> Vec<u32> {
        set::normalize((0..universe).filter(|_| rng.gen_bool(0.35)))
    }

    #[test]
    fn minimal_invariant_evicts_supersets() {
        let mut f = family(&[&[1, 2, 3], &[2, 4], &[5]]);
        assert!(f.add_with_minimal_invariant(&[2]));
        assert_eq!(f.iter().collect::<Vec<_>>(), vec![vec![2], vec![5]]);
        assert!(!f.add_with_minimal_invariant(&[2, 5]));
        assert!(!f.add_with_minimal_invariant(&[2]));
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn maximal_invariant_evicts_subsets() {
        let mut f = SetFamily::new();
        assert!(f.add_with_maximal_invariant(&[1, 2]));
        assert!(f.add_with_maximal_invariant(&[3]));
        assert!(!f.add_with_maximal_invariant(&[1]));
        assert!(f.add_with_maximal_invariant(&[1, 2, 3]));
        assert_eq!(f.iter().collect::<Vec<_>>(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn antichain_invariant_holds_for_random_inserts() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut minimal = SetFamily::new();
        let mut maximal = SetFamily::new();
        for _ in 0..300 {
            let s = random_set(&mut rng, 8);
            minimal.add_with_minimal_invariant(&s);
            maximal.add_with_maximal_invariant(&s);
        }
        for a in minimal.iter() {
            assert_eq!(minimal.count_subsets_of(&a), 1, "{:?} has a stored subset", a);
        }
        for a in maximal.iter() {
            assert_eq!(maximal.count_supersets_of(&a), 1, "{:?} has a stored superset", a);
        }
    }

    #[test]
    fn union_reachability() {
        let f = family(&[&[1], &[2, 3], &[4, 5]]);
        assert!(f.contains_sets_with_union(&[1, 2, 3]));
        assert!(f.contains_sets_with_union(&[2, 3]));
        assert!(!f.contains_sets_with_union(&[1, 2]));
        assert!(!f.contains_sets_with_union(&[1, 2, 3, 4]));
        assert!(!f.contains_sets_with_union(&[]));
        assert!(family(&[&[]]).contains_sets_with_union(&[]));
    }

    #[test]
    fn intersection_reachability() {
        let f = family(&[&[1, 2, 3], &[1, 2, 4], &[1, 5]]);
        assert!(f.contains_sets_with_intersection(&[1, 2]));
        assert!(f.contains_sets_with_intersection(&[1]));
        assert!(f.contains_sets_with_intersection(&[1, 5]));
        assert!(!f.contains_sets_with_intersection(&[2]));
        assert!(!f.contains_sets_with_intersection(&[6]));
    }

    #[test]
    fn union_pairs_keep_minimal() {
        let a = family(&[&[1], &[2]]);
        let b = family(&[&[1], &[3]]);
        let keys = a.union_pairs_and_keep_minimal(&b);
        assert_eq!(
            keys.iter_breadth_first().collect::<Vec<_>>(),
            vec![vec![1], vec![2, 3]]
        );
        let wide = a.union_pairs_and_keep_maximal(&b);
        assert_eq!(
            wide.iter_breadth_first().collect::<Vec<_>>(),
            vec![vec![1, 2], vec![1, 3], vec![2, 3]]
        );
    }

    #[test]
    fn pops_in_both_orders() {
        let mut f = family(&[&[0, 9], &[1], &[0, 1, 2]]);
        assert_eq!(f.pop_smallest(), Some(vec![1]));
        assert_eq!(f.pop_first(), Some(vec![0, 1, 2]));
        assert_eq!(f.pop_first(), Some(vec![0, 9]));
        assert_eq!(f.pop_first(), None);
    }

    #[test]
    fn cursor_walks_then_detects_mutation() {
        let mut f = family(&[&[1], &[1, 2], &[3]]);
        let mut cursor = f.cursor();
        let mut seen = Vec::new();
        while let Some((set, _)) = cursor.advance(&f).expect("unchanged family") {
            seen.push(set);
        }
        assert_eq!(seen, vec![vec![1], vec![1, 2], vec![3]]);

        let mut cursor = f.cursor_breadth_first();
        let (first, _) = cursor.advance(&f).expect("fresh").expect("non-empty");
        assert_eq!(first, vec![1]);
        f.insert(&[0]);
        assert!(matches!(cursor.advance(&f), Err(SetTrieError::InvalidState(_))));
    }

    #[test]
    fn no_op_mutation_keeps_cursor_valid() {
        let mut f = family(&[&[1], &[2]]);
        let mut cursor = f.cursor_breadth_first();
        assert!(!f.insert(&[1]));
        assert!(!f.remove(&[7]));
        assert_eq!(
            cursor.advance(&f).map(|o| o.map(|(s, _)| s)),
            Ok(Some(vec![1]))
        );
    }

    #[test]
    fn family_relations_and_algebra() {
        let mut a = family(&[&[1], &[1, 2]]);
        let b = family(&[&[1, 2], &[3]]);
        assert!(a.overlaps(&b));
        assert!(!a.is_subfamily_of(&b));
        a.union_with(&b);
        assert!(a.is_superfamily_of(&b));
        a.except_with(&family(&[&[1]]));
        assert_eq!(a, b);
        a.symmetric_except_with(&family(&[&[3], &[4]]));
        assert_eq!(a, family(&[&[1, 2], &[4]]));
        a.intersect_with(&family(&[&[4]]));
        assert_eq!(a.to_string(), "{{4}}");
    }

    #[test]
    fn display_is_breadth_first() {
        let f = family(&[&[2, 1], &[3]]);
        assert_eq!(f.to_string(), "{{3}, {1, 2}}");
    }
}
