//! Saturation of minimal determinant sets.

use crate::error::NormalizeError;
use crate::{Normalizer, Result};
use settrie::{set, SetFamily};
use tracing::debug;

impl Normalizer {
    /// Compute the minimal determinant sets of every attribute.
    ///
    /// Attributes are saturated in index order. Substitution uses the minimal
    /// sets of attributes already saturated and the declared sets of the rest.
    pub fn saturate(&mut self) {
        self.invalidate();
        for target in 0..self.len() {
            let minimal = self.saturate_attribute(target);
            debug!(
                "Saturated {}: {} minimal determinant sets",
                self.attributes()[target].name(),
                minimal.len()
            );
            self.attribute_mut(target).set_minimal(minimal);
        }
    }

    /// Every attribute has been saturated since the last declaration.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.attributes().iter().all(|a| a.is_saturated())
    }

    /// Minimal determinant sets of `attribute`, including the trivial `{attribute}`.
    pub fn minimal_determinant_sets(&self, attribute: usize) -> Result<&SetFamily<usize>> {
        let attribute = self.attribute(attribute)?;
        if !attribute.is_saturated() {
            return Err(NormalizeError::InvalidState(format!(
                "minimal determinant sets of '{}' requested before saturation",
                attribute.name()
            )));
        }
        Ok(attribute.minimal_determinant_sets())
    }

    fn saturate_attribute(&self, target: usize) -> SetFamily<usize> {
        let mut pending = SetFamily::new();
        for determinant in self.attributes()[target].determinant_sets().iter() {
            pending.add_with_minimal_invariant(&determinant);
        }

        let mut minimal = SetFamily::new();
        while let Some(current) = pending.pop_smallest() {
            if !minimal.add_with_minimal_invariant(&current) {
                continue;
            }
            for &member in &current {
                let rest = set::difference(&current, &[member]);
                let source = &self.attributes()[member];
                let replacements = if source.is_saturated() {
                    source.minimal_determinant_sets()
                } else {
                    source.determinant_sets()
                };
                for replacement in replacements.iter() {
                    if replacement.binary_search(&target).is_ok() {
                        continue;
                    }
                    let derived = set::union(&rest, &replacement);
                    if !minimal.contains_subset_of(&derived) {
                        pending.add_with_minimal_invariant(&derived);
                    }
                }
            }
        }

        minimal.add_with_minimal_invariant(&[target]);
        minimal
    }
}

#[cfg(test)]
mod tests {
    use crate::Normalizer;

    fn sets(n: &Normalizer, attribute: usize) -> Vec<Vec<usize>> {
        n.minimal_determinant_sets(attribute)
            .unwrap()
            .iter_breadth_first()
            .collect()
    }

    #[test]
    fn transitive_determinants_found() {
        let mut n = Normalizer::from_names(["A", "B", "C"]).unwrap();
        n.add_functional_dependency(&[0], &[1]).unwrap();
        n.add_functional_dependency(&[1], &[2]).unwrap();
        n.saturate();
        assert_eq!(sets(&n, 2), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(sets(&n, 1), vec![vec![0], vec![1]]);
        assert_eq!(sets(&n, 0), vec![vec![0]]);
    }

    #[test]
    fn composite_substitution_keeps_minimal_only() {
        // A -> B, A -> C, BC -> D, B -> C
        let mut n = Normalizer::from_names(["A", "B", "C", "D"]).unwrap();
        n.add_functional_dependency(&[0], &[1, 2]).unwrap();
        n.add_functional_dependency(&[1, 2], &[3]).unwrap();
        n.add_functional_dependency(&[1], &[2]).unwrap();
        n.saturate();
        assert_eq!(sets(&n, 3), vec![vec![0], vec![1], vec![3]]);
    }

    #[test]
    fn cycles_terminate_without_self_reference() {
        let mut n = Normalizer::from_names(["A", "B"]).unwrap();
        n.add_functional_dependency(&[0], &[1]).unwrap();
        n.add_functional_dependency(&[1], &[0]).unwrap();
        n.saturate();
        assert_eq!(sets(&n, 0), vec![vec![0], vec![1]]);
        assert_eq!(sets(&n, 1), vec![vec![0], vec![1]]);
    }

    #[test]
    fn declaring_resets_saturation() {
        let mut n = Normalizer::from_names(["A", "B"]).unwrap();
        n.saturate();
        assert!(n.is_saturated());
        n.add_functional_dependency(&[0], &[1]).unwrap();
        assert!(!n.is_saturated());
        assert!(n.minimal_determinant_sets(0).is_err());
    }

    #[test]
    fn saturating_twice_changes_nothing() {
        let mut n = Normalizer::from_names(["A", "B", "C", "D"]).unwrap();
        n.add_functional_dependency(&[0, 1], &[2]).unwrap();
        n.add_functional_dependency(&[2], &[3]).unwrap();
        n.add_functional_dependency(&[3], &[1]).unwrap();
        n.saturate();
        let first = n.attributes().to_vec();
        n.saturate();
        for (before, after) in first.iter().zip(n.attributes()) {
            assert_eq!(
                before.minimal_determinant_sets(),
                after.minimal_determinant_sets()
            );
        }
    }
}
