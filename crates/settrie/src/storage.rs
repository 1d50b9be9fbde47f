//! Payload strategies for set trie nodes.
//!
//! A node never interprets its payload directly; it only asks the storage
//! whether a set ends here (`is_present`) and forwards value operations.
//! Three strategies cover the containers built on the trie:
//!
//! - [`Presence`]: membership flag only (set families).
//! - [`SingleValue`]: exactly one value per set (set-keyed maps).
//! - [`ValueSet`]: an ordered set of values per set (set-keyed multimaps).

use std::collections::{btree_set, BTreeSet};
use std::option;

/// Operations a node payload must support.
///
/// Every mutating method returns `true` iff the payload changed.
pub trait Storage: Default {
    /// Value type accepted by `add`/`remove`.
    type Value;

    /// Iterator over stored values.
    type Values<'a>: Iterator<Item = &'a Self::Value>
    where
        Self: 'a;

    /// Whether a set terminates at this node.
    fn is_present(&self) -> bool;

    /// Add a value to the payload.
    fn add(&mut self, value: Self::Value) -> bool;

    /// Merge another payload into this one.
    fn add_from(&mut self, other: &Self) -> bool;

    /// Remove a single value; the payload may become absent.
    fn remove(&mut self, value: &Self::Value) -> bool;

    /// Drop every value, leaving the payload absent.
    fn clear(&mut self) -> bool;

    /// Whether `value` is stored.
    fn contains(&self, value: &Self::Value) -> bool;

    /// Stored values in storage order.
    fn values(&self) -> Self::Values<'_>;

    /// Number of stored values.
    fn len(&self) -> usize {
        self.values().count()
    }
}

/// Membership-only payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Presence(Option<()>);

impl Storage for Presence {
    type Value = ();
    type Values<'a> = option::Iter<'a, ()>;

    #[inline]
    fn is_present(&self) -> bool {
        self.0.is_some()
    }

    fn add(&mut self, _value: ()) -> bool {
        self.0.replace(()).is_none()
    }

    fn add_from(&mut self, other: &Self) -> bool {
        other.is_present() && self.add(())
    }

    fn remove(&mut self, _value: &()) -> bool {
        self.clear()
    }

    fn clear(&mut self) -> bool {
        self.0.take().is_some()
    }

    fn contains(&self, _value: &()) -> bool {
        self.is_present()
    }

    fn values(&self) -> Self::Values<'_> {
        self.0.iter()
    }
}

/// Exactly one value per stored set.
///
/// `add` overwrites; `add_from` keeps the value written first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingleValue<V>(Option<V>);

impl<V> Default for SingleValue<V> {
    fn default() -> Self {
        Self(None)
    }
}

impl<V> SingleValue<V> {
    /// The stored value, if any.
    #[inline]
    pub fn get(&self) -> Option<&V> {
        self.0.as_ref()
    }

    /// Mutable access to the stored value.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut V> {
        self.0.as_mut()
    }

    /// Replace the stored value, returning the previous one.
    pub fn replace(&mut self, value: V) -> Option<V> {
        self.0.replace(value)
    }

    /// Remove and return the stored value.
    pub fn take(&mut self) -> Option<V> {
        self.0.take()
    }
}

impl<V: Clone + PartialEq> Storage for SingleValue<V> {
    type Value = V;
    type Values<'a>
        = option::Iter<'a, V>
    where
        Self: 'a;

    #[inline]
    fn is_present(&self) -> bool {
        self.0.is_some()
    }

    fn add(&mut self, value: V) -> bool {
        match &self.0 {
            Some(current) if *current == value => false,
            _ => {
                self.0 = Some(value);
                true
            }
        }
    }

    fn add_from(&mut self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, Some(value)) => {
                self.0 = Some(value.clone());
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, value: &V) -> bool {
        if self.0.as_ref() == Some(value) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    fn clear(&mut self) -> bool {
        self.0.take().is_some()
    }

    fn contains(&self, value: &V) -> bool {
        self.0.as_ref() == Some(value)
    }

    fn values(&self) -> Self::Values<'_> {
        self.0.iter()
    }
}

/// Ordered value set per stored set; absent once the last value is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueSet<V>(BTreeSet<V>);

impl<V> Default for ValueSet<V> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<V> ValueSet<V> {
    /// Borrow the underlying ordered set.
    #[inline]
    pub fn as_set(&self) -> &BTreeSet<V> {
        &self.0
    }
}

impl<V: Ord + Clone> Storage for ValueSet<V> {
    type Value = V;
    type Values<'a>
        = btree_set::Iter<'a, V>
    where
        Self: 'a;

    #[inline]
    fn is_present(&self) -> bool {
        !self.0.is_empty()
    }

    fn add(&mut self, value: V) -> bool {
        self.0.insert(value)
    }

    fn add_from(&mut self, other: &Self) -> bool {
        let before = self.0.len();
        self.0.extend(other.0.iter().cloned());
        self.0.len() != before
    }

    fn remove(&mut self, value: &V) -> bool {
        self.0.remove(value)
    }

    fn clear(&mut self) -> bool {
        let was_present = !self.0.is_empty();
        self.0.clear();
        was_present
    }

    fn contains(&self, value: &V) -> bool {
        self.0.contains(value)
    }

    fn values(&self) -> Self::Values<'_> {
        self.0.iter()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_toggles() {
        let mut p = Presence::default();
        assert!(!p.is_present());
        assert!(p.add(()));
        assert!(!p.add(()));
        assert_eq!(p.len(), 1);
        assert!(p.remove(&()));
        assert!(!p.is_present());
    }

    #[test]
    fn single_value_overwrites_but_merge_keeps_first() {
        let mut s = SingleValue::default();
        assert!(s.add(1));
        assert!(!s.add(1));
        assert!(s.add(2));
        assert_eq!(s.get(), Some(&2));

        let mut other = SingleValue::default();
        other.add(7);
        assert!(!s.add_from(&other));
        assert_eq!(s.get(), Some(&2));

        let mut empty = SingleValue::default();
        assert!(empty.add_from(&other));
        assert_eq!(empty.get(), Some(&7));
    }

    #[test]
    fn single_value_removes_only_matching() {
        let mut s = SingleValue::default();
        s.add("a");
        assert!(!s.remove(&"b"));
        assert!(s.remove(&"a"));
        assert!(!s.is_present());
    }

    #[test]
    fn value_set_degrades_to_absent() {
        let mut v = ValueSet::default();
        v.add(3);
        v.add(1);
        assert_eq!(v.values().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert!(v.remove(&1));
        assert!(v.is_present());
        assert!(v.remove(&3));
        assert!(!v.is_present());
        assert!(!v.remove(&3));
    }
}
