//! Map keyed by sets, one value per key.

use crate::cursor::{BreadthFirstCursor, DepthFirstCursor, TrieContainer};
use crate::error::SetTrieError;
use crate::node::Node;
use crate::set;
use crate::storage::{SingleValue, Storage};
use crate::Result;
use itertools::Itertools;
use std::fmt;
use std::ops::Index;

type Entry<'a, T, V> = (Vec<T>, &'a V);

fn entry<T, V>((key, storage): (Vec<T>, &SingleValue<V>)) -> Option<Entry<'_, T, V>> {
    storage.get().map(|value| (key, value))
}

#[derive(Debug, Clone)]
pub struct SetMap<T, V> {
    root: Node<T, SingleValue<V>>,
    revision: u64,
}

impl<T, V> Default for SetMap<T, V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            revision: 0,
        }
    }
}

impl<T: Ord + Clone, V: Clone + PartialEq> TrieContainer for SetMap<T, V> {
    type Element = T;
    type Storage = SingleValue<V>;

    fn trie(&self) -> &Node<T, SingleValue<V>> {
        &self.root
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

impl<T: Ord + Clone, V: Clone + PartialEq> SetMap<T, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.len()
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

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: &[T], value: V) -> Option<V> {
        let previous = self.root.update(key, |s| s.replace(value));
        self.touch(true);
        previous
    }

    /// Store `value` only if `key` is absent; the first write wins.
    pub fn try_insert(&mut self, key: &[T], value: V) -> bool {
        let inserted = self
            .root
            .update(key, |s| !s.is_present() && s.add(value));
        self.touch(inserted)
    }

    /// Value under `key`, failing with `NotFound` when absent.
    pub fn get(&self, key: &[T]) -> Result<&V>
    where
        T: fmt::Debug,
    {
        self.try_get(key)
            .ok_or_else(|| SetTrieError::NotFound(format!("{:?}", key)))
    }

    pub fn try_get(&self, key: &[T]) -> Option<&V> {
        self.root.get(key).and_then(SingleValue::get)
    }

    /// Mutable value under `key`. Counts as a mutation.
    pub fn get_mut(&mut self, key: &[T]) -> Option<&mut V> {
        if self.root.contains(key) {
            self.revision += 1;
        }
        self.root.get_mut(key).and_then(SingleValue::get_mut)
    }

    /// Payload stored under `key`; absent keys are a caller bug.
    pub fn storage(&self, key: &[T]) -> Result<&SingleValue<V>>
    where
        T: fmt::Debug,
    {
        self.root.get(key).ok_or_else(|| {
            SetTrieError::InvalidState(format!("no storage for absent key {:?}", key))
        })
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &[T]) -> Option<V> {
        if !self.root.contains(key) {
            return None;
        }
        let removed = self.root.update(key, |s| s.take());
        self.touch(true);
        removed
    }

    pub fn clear(&mut self) {
        let changed = !self.root.is_empty();
        self.root.clear();
        self.touch(changed);
    }

    pub fn iter(&self) -> impl Iterator<Item = Entry<'_, T, V>> {
        self.root.iter().filter_map(entry)
    }

    pub fn iter_breadth_first(&self) -> impl Iterator<Item = Entry<'_, T, V>> {
        self.root.iter_breadth_first().filter_map(entry)
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

    /// Entries whose key is a subset of `set`.
    pub fn subsets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Entry<'a, T, V>> {
        self.root.subsets_of(set).filter_map(entry)
    }

    /// Entries whose key is a superset of `set`.
    pub fn supersets_of<'a>(&'a self, set: &'a [T]) -> impl Iterator<Item = Entry<'a, T, V>> {
        self.root.supersets_of(set).filter_map(entry)
    }

    pub fn subsets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Entry<'a, T, V>> {
        self.root.subsets_of_breadth_first(set).filter_map(entry)
    }

    pub fn supersets_of_breadth_first<'a>(
        &'a self,
        set: &'a [T],
    ) -> impl Iterator<Item = Entry<'a, T, V>> {
        self.root.supersets_of_breadth_first(set).filter_map(entry)
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

    /// Insert under `key` unless a stored key is a subset of it; stored
    /// supersets of `key` are evicted. Keys stay an antichain of minimal sets.
    pub fn insert_with_minimal_invariant(&mut self, key: &[T], value: V) -> bool {
        if self.root.contains_subset_of(key) {
            return false;
        }
        self.root.remove_supersets_of(key);
        self.root.add(key, value);
        self.touch(true)
    }
}

impl<T: Ord + Clone + fmt::Debug, V: Clone + PartialEq> Index<&[T]> for SetMap<T, V> {
    type Output = V;

    /// Panics when `key` is absent.
    fn index(&self, key: &[T]) -> &V {
        match self.try_get(key) {
            Some(value) => value,
            None => panic!("set {:?} not present in map", key),
        }
    }
}

impl<T: Ord + Clone, V: Clone + PartialEq> FromIterator<(Vec<T>, V)> for SetMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (Vec<T>, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(&set::normalize(key), value);
        }
        map
    }
}

impl<T, V> fmt::Display for SetMap<T, V>
where
    T: Ord + Clone + fmt::Display,
    V: Clone + PartialEq + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter_breadth_first()
                .map(|(key, value)| format!("{}: {}", set::display(&key), value))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> SetMap<u8, &'static str> {
        vec![
            (vec![2, 1], "ab"),
            (vec![3], "c"),
            (vec![1, 2, 3], "abc"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn lookups() {
        let m = map();
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(&[1, 2]), Ok(&"ab"));
        assert_eq!(m[&[3][..]], "c");
        assert_eq!(m.try_get(&[1]), None);
        assert!(matches!(m.get(&[1]), Err(SetTrieError::NotFound(_))));
        assert!(matches!(m.storage(&[9]), Err(SetTrieError::InvalidState(_))));
    }

    #[test]
    fn insert_overwrites_try_insert_does_not() {
        let mut m = map();
        assert_eq!(m.insert(&[3], "C"), Some("c"));
        assert!(!m.try_insert(&[3], "x"));
        assert_eq!(m.try_get(&[3]), Some(&"C"));
        assert!(m.try_insert(&[4], "d"));
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn remove_and_revision() {
        let mut m = map();
        let before = m.revision();
        assert_eq!(m.remove(&[1, 2]), Some("ab"));
        assert!(m.revision() > before);
        let after = m.revision();
        assert_eq!(m.remove(&[1, 2]), None);
        assert_eq!(m.revision(), after);
        assert!(m.contains_key(&[1, 2, 3]));
    }

    #[test]
    fn subset_queries_yield_values() {
        let m = map();
        let hits: Vec<_> = m
            .subsets_of_breadth_first(&[1, 2, 3])
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(hits, vec!["c", "ab", "abc"]);
        let sup: Vec<_> = m.supersets_of(&[3]).map(|(k, _)| k).collect();
        assert_eq!(sup, vec![vec![1, 2, 3], vec![3]]);
    }

    #[test]
    fn minimal_invariant_keys() {
        let mut m = map();
        assert!(m.insert_with_minimal_invariant(&[1], "a"));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec![vec![1], vec![3]]);
        assert!(!m.insert_with_minimal_invariant(&[1, 4], "ad"));
    }

    #[test]
    fn get_mut_invalidates_cursor() {
        let mut m = map();
        let mut cursor = m.cursor();
        if let Some(v) = m.get_mut(&[3]) {
            *v = "z";
        }
        assert!(cursor.advance(&m).is_err());
        assert_eq!(m.to_string(), "{{3}: z, {1, 2}: ab, {1, 2, 3}: abc}");
    }
}
