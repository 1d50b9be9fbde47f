//! Candidate keys.

use crate::error::NormalizeError;
use crate::{Normalizer, Result};
use settrie::{set, SetFamily};

impl Normalizer {
    /// Candidate keys of `attributes`: the minimal sets determining all of them.
    ///
    /// Folds pairwise unions of the attributes' minimal determinant sets. The
    /// result may contain attributes outside `attributes`; see
    /// [`Normalizer::keys_within`] for keys restricted to a table.
    pub fn candidate_keys(&self, attributes: &[usize]) -> Result<SetFamily<usize>> {
        let attributes = self.check(attributes)?;
        let (first, rest) = attributes.split_first().ok_or_else(|| {
            NormalizeError::InvalidState("candidate keys of an empty attribute set".into())
        })?;

        let mut keys = self.minimal_determinant_sets(*first)?.clone();
        for &attribute in rest {
            keys = keys.union_pairs_and_keep_minimal(self.minimal_determinant_sets(attribute)?);
        }
        Ok(keys)
    }

    /// Candidate keys of `table` made of the table's own attributes.
    pub fn keys_within(&self, table: &[usize]) -> Result<SetFamily<usize>> {
        let table = self.check(table)?;
        let keys = self.candidate_keys(&table)?;
        let inside = keys.subsets_of(&table).collect();
        Ok(inside)
    }

    /// Candidate keys of the whole relation.
    pub fn relation_keys(&self) -> Result<SetFamily<usize>> {
        self.candidate_keys(&self.all_attributes())
    }

    /// Attributes belonging to at least one of `keys`.
    #[must_use]
    pub fn prime_attributes(keys: &SetFamily<usize>) -> Vec<usize> {
        keys.iter().fold(Vec::new(), |acc, key| set::union(&acc, &key))
    }
}
