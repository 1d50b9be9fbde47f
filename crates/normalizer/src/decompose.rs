//! Table construction and the normalization pipeline.

use crate::relation::NormalizedRelation;
use crate::{Normalizer, Result};
use common::NormalForm;
use itertools::Itertools;
use settrie::{set, SetFamily};
use tracing::{debug, info};

impl Normalizer {
    /// Attribute sets of the tables for `target`, as a maximal antichain.
    ///
    /// One table per determinant set of the cover, holding the determinant
    /// and its dependents. A table holding a candidate key of the whole
    /// relation is added when none exists. For 4NF every table is split
    /// along the multivalued dependencies.
    pub fn tables(&self, target: NormalForm, canonical: bool) -> Result<SetFamily<usize>> {
        if target == NormalForm::First {
            return Ok(SetFamily::singleton(&self.all_attributes()));
        }

        let split = target.considers_multivalued() && !self.multivalued_dependencies().is_empty();
        let insert = |tables: &mut SetFamily<usize>, table: &[usize]| {
            if split {
                self.insert_split(tables, table, 0);
            } else {
                tables.add_with_maximal_invariant(table);
            }
        };

        let cover = self.cover_for(canonical && target.needs_canonical_cover())?;
        let mut tables = SetFamily::new();
        for (determinant, dependents) in cover.iter_breadth_first() {
            let dependents = dependents.iter().copied().collect::<Vec<_>>();
            insert(&mut tables, &set::union(&determinant, &dependents));
        }

        let keys = self.relation_keys()?;
        if !keys.iter().any(|key| tables.contains_superset_of(&key)) {
            if let Some(key) = keys.smallest() {
                debug!("Adding key table {}", self.describe(&key));
                insert(&mut tables, &key);
            }
        }
        Ok(tables)
    }

    /// Decompose towards `target`.
    ///
    /// Saturates, applies the fourth normal form pre-pass for 4NF targets,
    /// builds the tables and classifies each. The result is ordered by
    /// descending arity, ties by attribute indices.
    pub fn normalize(
        &mut self,
        target: NormalForm,
        canonical: bool,
    ) -> Result<Vec<NormalizedRelation>> {
        self.saturate();
        if target.considers_multivalued() {
            self.prune_for_fourth_normal_form();
        }

        let tables = self.tables(target, canonical)?;
        let relations = tables
            .iter()
            .sorted_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)))
            .map(|table| {
                let (schema, normal_form) = self.create_relation_schema(&table, target)?;
                Ok(NormalizedRelation::new(schema, normal_form))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Normalized {} attributes into {} tables (target {})",
            self.len(),
            relations.len(),
            target
        );
        Ok(relations)
    }
}

#[cfg(test)]
mod tests {
    use crate::Normalizer;
    use common::NormalForm;

    #[test]
    fn first_normal_form_keeps_one_table() {
        let mut n = Normalizer::from_names(["A", "B", "C"]).unwrap();
        n.add_functional_dependency(&[0], &[1]).unwrap();
        n.saturate();
        let tables = n.tables(NormalForm::First, true).unwrap();
        assert_eq!(tables.iter().collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn key_table_added_when_missing() {
        // A -> B, C -> D: the key {A, C} is in no table
        let mut n = Normalizer::from_names(["A", "B", "C", "D"]).unwrap();
        n.add_functional_dependency(&[0], &[1]).unwrap();
        n.add_functional_dependency(&[2], &[3]).unwrap();
        n.saturate();
        let tables = n.tables(NormalForm::BoyceCodd, true).unwrap();
        assert_eq!(
            tables.iter_breadth_first().collect::<Vec<_>>(),
            vec![vec![0, 1], vec![0, 2], vec![2, 3]]
        );
    }

    #[test]
    fn no_dependencies_gives_whole_relation() {
        let mut n = Normalizer::from_names(["A", "B"]).unwrap();
        let relations = n.normalize(NormalForm::BoyceCodd, true).unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].schema().attributes(), &[0, 1]);
        assert_eq!(relations[0].schema().primary_key(), &[0, 1]);
    }

    #[test]
    fn second_normal_form_keeps_transitive_table() {
        let mut n = Normalizer::from_names(["A", "B", "C"]).unwrap();
        n.add_functional_dependency(&[0], &[1]).unwrap();
        n.add_functional_dependency(&[1], &[2]).unwrap();
        let second = n.normalize(NormalForm::Second, true).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].normal_form(), NormalForm::Second);
        let third = n.normalize(NormalForm::Third, true).unwrap();
        assert_eq!(third.len(), 2);
        assert!(third.iter().all(|r| r.normal_form() == NormalForm::BoyceCodd));
    }

    #[test]
    fn fourth_normal_form_splits_tables() {
        // course ->> instructor, course ->> book; no functional dependencies
        let mut n = Normalizer::from_names(["course", "instructor", "book"]).unwrap();
        n.add_multivalued_dependency(&[0], &[1]).unwrap();
        let bcnf = n.normalize(NormalForm::BoyceCodd, true).unwrap();
        assert_eq!(bcnf.len(), 1);
        let fourth = n.normalize(NormalForm::Fourth, true).unwrap();
        let tables = fourth
            .iter()
            .map(|r| r.schema().attributes().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(tables, vec![vec![0, 1], vec![0, 2]]);
        assert!(fourth.iter().all(|r| r.normal_form() == NormalForm::Fourth));
    }
}
