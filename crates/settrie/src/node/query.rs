//! Subset and superset queries: existence, counting, enumeration in both
//! orders, and exhaustive removal. "Proper" variants exclude an exact match.

use super::traverse::{BreadthFirst, DepthFirst, Filter};
use super::Node;
use crate::set::is_normalized;
use crate::storage::Storage;

impl<T: Ord + Clone, S: Storage> Node<T, S> {
    /// All stored sets, depth-first.
    pub fn iter(&self) -> DepthFirst<'_, T, S> {
        DepthFirst::new(self, Filter::All, false)
    }

    /// All stored sets, breadth-first.
    pub fn iter_breadth_first(&self) -> BreadthFirst<'_, T, S> {
        BreadthFirst::new(self, Filter::All, false)
    }

    pub fn subsets_of<'a>(&'a self, set: &'a [T]) -> DepthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        DepthFirst::new(self, Filter::Subsets(set), false)
    }

    pub fn proper_subsets_of<'a>(&'a self, set: &'a [T]) -> DepthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        DepthFirst::new(self, Filter::Subsets(set), true)
    }

    pub fn supersets_of<'a>(&'a self, set: &'a [T]) -> DepthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        DepthFirst::new(self, Filter::Supersets(set), false)
    }

    pub fn proper_supersets_of<'a>(&'a self, set: &'a [T]) -> DepthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        DepthFirst::new(self, Filter::Supersets(set), true)
    }

    pub fn subsets_of_breadth_first<'a>(&'a self, set: &'a [T]) -> BreadthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        BreadthFirst::new(self, Filter::Subsets(set), false)
    }

    pub fn proper_subsets_of_breadth_first<'a>(&'a self, set: &'a [T]) -> BreadthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        BreadthFirst::new(self, Filter::Subsets(set), true)
    }

    pub fn supersets_of_breadth_first<'a>(&'a self, set: &'a [T]) -> BreadthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        BreadthFirst::new(self, Filter::Supersets(set), false)
    }

    pub fn proper_supersets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> BreadthFirst<'a, T, S> {
        debug_assert!(is_normalized(set));
        BreadthFirst::new(self, Filter::Supersets(set), true)
    }

    /// Some stored set is a subset of `set` (including `set` itself).
    pub fn contains_subset_of(&self, set: &[T]) -> bool {
        self.subsets_of(set).next().is_some()
    }

    pub fn contains_proper_subset_of(&self, set: &[T]) -> bool {
        self.proper_subsets_of(set).next().is_some()
    }

    /// Some stored set is a superset of `set` (including `set` itself).
    pub fn contains_superset_of(&self, set: &[T]) -> bool {
        self.supersets_of(set).next().is_some()
    }

    pub fn contains_proper_superset_of(&self, set: &[T]) -> bool {
        self.proper_supersets_of(set).next().is_some()
    }

    pub fn count_subsets_of(&self, set: &[T]) -> usize {
        self.subsets_of(set).count()
    }

    pub fn count_proper_subsets_of(&self, set: &[T]) -> usize {
        self.proper_subsets_of(set).count()
    }

    pub fn count_supersets_of(&self, set: &[T]) -> usize {
        self.supersets_of(set).count()
    }

    pub fn count_proper_supersets_of(&self, set: &[T]) -> usize {
        self.proper_supersets_of(set).count()
    }

    /// Remove every stored subset of `set`; returns how many were removed.
    pub fn remove_subsets_of(&mut self, set: &[T]) -> usize {
        debug_assert!(is_normalized(set));
        self.remove_subsets_from(set, 0, 0, false)
    }

    pub fn remove_proper_subsets_of(&mut self, set: &[T]) -> usize {
        debug_assert!(is_normalized(set));
        self.remove_subsets_from(set, 0, 0, true)
    }

    /// Remove every stored superset of `set`; returns how many were removed.
    pub fn remove_supersets_of(&mut self, set: &[T]) -> usize {
        debug_assert!(is_normalized(set));
        self.remove_supersets_from(set, 0, 0, false)
    }

    pub fn remove_proper_supersets_of(&mut self, set: &[T]) -> usize {
        debug_assert!(is_normalized(set));
        self.remove_supersets_from(set, 0, 0, true)
    }

    fn remove_subsets_from(
        &mut self,
        target: &[T],
        from: usize,
        depth: usize,
        proper: bool,
    ) -> usize {
        let mut removed = 0;
        if !(proper && depth == target.len()) && self.storage.clear() {
            removed += 1;
        }
        for index in from..target.len() {
            let element = &target[index];
            if let Some(child) = self.children.get_mut(element) {
                removed += child.remove_subsets_from(target, index + 1, depth + 1, proper);
                if child.count == 0 {
                    self.children.remove(element);
                }
            }
        }
        self.count -= removed;
        removed
    }

    fn remove_supersets_from(
        &mut self,
        target: &[T],
        matched: usize,
        depth: usize,
        proper: bool,
    ) -> usize {
        let mut removed = 0;
        if matched == target.len()
            && !(proper && depth == target.len())
            && self.storage.clear()
        {
            removed += 1;
        }

        let bound = target.get(matched);
        let children = match bound {
            Some(bound) => self.children.range_mut(..=bound),
            None => self.children.range_mut::<T, _>(..),
        };
        let mut emptied = Vec::new();
        for (element, child) in children {
            let next = if bound == Some(element) {
                matched + 1
            } else {
                matched
            };
            removed += child.remove_supersets_from(target, next, depth + 1, proper);
            if child.count == 0 {
                emptied.push(element.clone());
            }
        }
        for element in emptied {
            self.children.remove(&element);
        }

        self.count -= removed;
        removed
    }
}
