//! Multimap keyed by sets: every key holds an ordered set of values.

use crate::cursor::{BreadthFirstCursor, DepthFirstCursor, TrieContainer};
use crate::error::SetTrieError;
use crate::node::Node;
use crate::set;
use crate::storage::{Storage, ValueSet};
use crate::Result;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

type Group<'a, T, V> = (Vec<T>, &'a BTreeSet<V>);

fn group<T, V>((key, storage): (Vec<T>, &ValueSet<V>)) -> Group<'_, T, V> {
    (key, storage.as_set())
}

#[derive(Debug, Clone)]
pub struct SetMultiMap<T, V> {
    root: Node<T, ValueSet<V>>,
    revision: u64,
}

impl<T, V> Default for SetMultiMap<T, V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            revision: 0,
        }
    }
}

impl<T: Ord + Clone, V: Ord + Clone> TrieContainer for SetMultiMap<T, V> {
    type Element = T;
    type Storage = ValueSet<V>;

    fn trie(&self) -> &Node<T, ValueSet<V>> {
        &self.root
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

impl<T: Ord + Clone, V: Ord + Clone> SetMultiMap<T, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Number of (key, value) pairs.
    pub fn value_count(&self) -> usize {
        self.root.iter().map(|(_, values)| values.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

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

    pub fn contains_key(&self, key: &[T]) -> bool {
        self.root.contains(key)
    }

    pub fn contains(&self, key: &[T], value: &V) -> bool {
        self.root.get(key).is_some_and(|s| s.contains(value))
    }

    /// Add `value` to the values of `key`.
    pub fn insert(&mut self, key: &[T], value: V) -> bool {
        let changed = self.root.add(key, value);
        self.touch(changed)
    }

    pub fn insert_all<I: IntoIterator<Item = V>>(&mut self, key: &[T], values: I) -> bool {
        let mut changed = false;
        for value in values {
            changed |= self.insert(key, value);
        }
        changed
    }

    /// Remove one value; the key disappears with its last value.
    pub fn remove_value(&mut self, key: &[T], value: &V) -> bool {
        let changed = self.root.remove(key, value);
        self.touch(changed)
    }

    pub fn remove_key(&mut self, key: &[T]) -> bool {
        let changed = self.root.remove_set(key);
        self.touch(changed)
    }

    pub fn clear(&mut self) {
        let changed = !self.root.is_empty();
        self.root.clear();
        self.touch(changed);
    }

    /// Values of `key`; absent keys are a caller bug.
    pub fn values(&self, key: &[T]) -> Result<&BTreeSet<V>>
    where
        T: fmt::Debug,
    {
        self.try_values(key).ok_or_else(|| {
            SetTrieError::InvalidState(format!("no values stored for key {:?}", key))
        })
    }

    pub fn try_values(&self, key: &[T]) -> Option<&BTreeSet<V>> {
        self.root.get(key).map(ValueSet::as_set)
    }

    /// (key, values) groups, depth-first.
    pub fn iter(&self) -> impl Iterator<Item = Group<'_, T, V>> {
        self.root.iter().map(group)
    }

    /// (key, values) groups by key size, then lexicographically.
    pub fn iter_breadth_first(&self) -> impl Iterator<Item = Group<'_, T, V>> {
        self.root.iter_breadth_first().map(group)
    }

    /// Every (key, value) pair in breadth-first key order.
    pub fn flat_iter(&self) -> impl Iterator<Item = (Vec<T>, &V)> {
        self.iter_breadth_first()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.clone(), v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = Vec<T>> + '_ {
        self.root.iter().map(|(key, _)| key)
    }

    pub fn cursor(&self) -> DepthFirstCursor<T> {
        DepthFirstCursor::new(self)
    }

    pub fn cursor_breadth_first(&self) -> BreadthFirstCursor<T> {
        BreadthFirstCursor::new(self)
    }

    pub fn subsets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Group<'a, T, V>> {
        self.root.subsets_of(set).map(group)
    }

    pub fn supersets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Group<'a, T, V>> {
        self.root.supersets_of(set).map(group)
    }

    pub fn subsets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Group<'a, T, V>> {
        self.root.subsets_of_breadth_first(set).map(group)
    }

    pub fn proper_subsets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Group<'a, T, V>> {
        self.root.proper_subsets_of_breadth_first(set).map(group)
    }

    pub fn supersets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Group<'a, T, V>> {
        self.root.supersets_of_breadth_first(set).map(group)
    }

    pub fn contains_subset_of(&self, set: &[T]) -> bool {
        self.root.contains_subset_of(set)
    }

    pub fn contains_superset_of(&self, set: &[T]) -> bool {
        self.root.contains_superset_of(set)
    }

    pub fn remove_subsets_of(&mut self, set: &[T]) -> usize {
        let removed = self.root.remove_subsets_of(set);
        self.touch(removed > 0);
        removed
    }

    pub fn remove_supersets_of(&mut self, set: &[T]) -> usize {
        let removed = self.root.remove_supersets_of(set);
        self.touch(removed > 0);
        removed
    }

    /// Merge every key and value of `other`.
    pub fn union_with(&mut self, other: &Self) -> bool {
        let changed = self.root.union_with(&other.root);
        self.touch(changed)
    }
}

impl<T: Ord + Clone, V: Ord + Clone> FromIterator<(Vec<T>, V)> for SetMultiMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (Vec<T>, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(&set::normalize(key), value);
        }
        map
    }
}

impl<T, V> fmt::Display for SetMultiMap<T, V>
where
    T: Ord + Clone + fmt::Display,
    V: Ord + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter_breadth_first()
                .map(|(key, values)| {
                    format!("{}: {{{}}}", set::display(&key), values.iter().join(", "))
                })
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multimap() -> SetMultiMap<u8, char> {
        vec![
            (vec![1], 'b'),
            (vec![1], 'c'),
            (vec![0, 2], 'a'),
            (vec![2], 'd'),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn grouping_and_counts() {
        let m = multimap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.value_count(), 4);
        assert!(m.contains(&[1], &'c'));
        assert_eq!(
            m.iter_breadth_first()
                .map(|(k, v)| (k, v.iter().copied().collect::<String>()))
                .collect::<Vec<_>>(),
            vec![
                (vec![1], "bc".to_string()),
                (vec![2], "d".to_string()),
                (vec![0, 2], "a".to_string()),
            ]
        );
    }

    #[test]
    fn flat_pairs_follow_breadth_first_keys() {
        let m = multimap();
        let pairs: Vec<_> = m.flat_iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(
            pairs,
            vec![
                (vec![1], 'b'),
                (vec![1], 'c'),
                (vec![2], 'd'),
                (vec![0, 2], 'a'),
            ]
        );
    }

    #[test]
    fn last_value_removal_drops_key() {
        let mut m = multimap();
        assert!(m.remove_value(&[2], &'d'));
        assert!(!m.contains_key(&[2]));
        assert!(matches!(m.values(&[2]), Err(SetTrieError::InvalidState(_))));
        assert!(m.remove_value(&[1], &'b'));
        assert_eq!(m.values(&[1]).map(|v| v.len()), Ok(1));
        assert!(!m.remove_value(&[1], &'z'));
    }

    #[test]
    fn superset_lookup_and_display() {
        let m = multimap();
        let keys: Vec<_> = m.supersets_of(&[2]).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![vec![0, 2], vec![2]]);
        assert_eq!(m.to_string(), "{{1}: {b, c}, {2}: {d}, {0, 2}: {a}}");
    }
}
