//! Helpers over sorted, duplicate-free element slices.
//!
//! Every trie operation expects its input in this form; these helpers build
//! and combine such slices without re-sorting.

use itertools::Itertools;
use std::cmp::Ordering;

/// Sort and deduplicate arbitrary elements into set form.
pub fn normalize<T: Ord, I: IntoIterator<Item = T>>(elements: I) -> Vec<T> {
    elements.into_iter().sorted().dedup().collect()
}

/// Whether `set` is strictly increasing.
#[inline]
pub fn is_normalized<T: Ord>(set: &[T]) -> bool {
    set.windows(2).all(|w| w[0] < w[1])
}

/// Sorted union of two sets.
pub fn union<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().merge(b.iter()).dedup().cloned().collect()
}

/// Sorted intersection of two sets.
pub fn intersection<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Elements of `a` that are not in `b`.
pub fn difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len());
    let mut j = 0;
    for x in a {
        while j < b.len() && b[j] < *x {
            j += 1;
        }
        if j >= b.len() || b[j] != *x {
            out.push(x.clone());
        }
    }
    out
}

/// `a ⊆ b`.
pub fn is_subset<T: Ord>(a: &[T], b: &[T]) -> bool {
    if a.len() > b.len() {
        return false;
    }
    let mut j = 0;
    for x in a {
        while j < b.len() && b[j] < *x {
            j += 1;
        }
        if j >= b.len() || b[j] != *x {
            return false;
        }
        j += 1;
    }
    true
}

/// `a ∩ b ≠ ∅`.
pub fn intersects<T: Ord>(a: &[T], b: &[T]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => return true,
        }
    }
    false
}

/// Render a set as `{a, b, c}`.
pub fn display<T: std::fmt::Display>(set: &[T]) -> String {
    format!("{{{}}}", set.iter().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sorts_and_dedups() {
        assert_eq!(normalize(vec![3, 1, 3, 2]), vec![1, 2, 3]);
        assert!(is_normalized(&[1, 2, 5]));
        assert!(!is_normalized(&[1, 1]));
        assert!(!is_normalized(&[2, 1]));
    }

    #[test]
    fn algebra_on_sorted_slices() {
        let a = [1, 3, 5, 7];
        let b = [3, 4, 5];
        assert_eq!(union(&a, &b), vec![1, 3, 4, 5, 7]);
        assert_eq!(intersection(&a, &b), vec![3, 5]);
        assert_eq!(difference(&a, &b), vec![1, 7]);
        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &[2, 4]));
    }

    #[test]
    fn subset_checks() {
        assert!(is_subset::<u8>(&[], &[]));
        assert!(is_subset(&[1, 5], &[1, 2, 5]));
        assert!(!is_subset(&[1, 6], &[1, 2, 5]));
        assert!(!is_subset(&[1, 2, 3], &[1, 2]));
    }

    #[test]
    fn display_braces() {
        assert_eq!(display(&[1, 2]), "{1, 2}");
        assert_eq!(display::<u8>(&[]), "{}");
    }
}
