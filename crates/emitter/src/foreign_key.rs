//! Foreign keys between normalized tables.

use itertools::Itertools;
use normalizer::NormalizedRelation;
use settrie::{SetFamily, SetMultiMap};
use std::fmt;

/// `columns` of one table referencing a unique key of `referenced`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    columns: Vec<usize>,
    referenced: usize,
}

impl ForeignKey {
    #[must_use]
    pub fn new(columns: Vec<usize>, referenced: usize) -> Self {
        Self {
            columns,
            referenced,
        }
    }

    #[must_use]
    #[inline]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Index of the referenced table.
    #[must_use]
    #[inline]
    pub fn referenced(&self) -> usize {
        self.referenced
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) -> #{}",
            self.columns.iter().join(", "),
            self.referenced
        )
    }
}

/// Foreign keys of every table, parallel with `relations`.
///
/// Minimal unique keys (primary and alternate) are mapped to the tables
/// owning them; a table references every other table whose key lies within
/// its attributes. Of tables sharing one key only the first is referenced,
/// and never by itself.
#[must_use]
pub fn infer_foreign_keys(relations: &[NormalizedRelation]) -> Vec<Vec<ForeignKey>> {
    let mut minimal = SetFamily::new();
    for relation in relations {
        for key in relation.schema().keys() {
            minimal.add_with_minimal_invariant(key);
        }
    }

    let mut owners: SetMultiMap<usize, usize> = SetMultiMap::new();
    for (index, relation) in relations.iter().enumerate() {
        for key in relation.schema().keys() {
            if minimal.contains(key) {
                owners.insert(key, index);
            }
        }
    }

    relations
        .iter()
        .enumerate()
        .map(|(index, relation)| {
            owners
                .subsets_of_breadth_first(relation.schema().attributes())
                .filter_map(|(key, tables)| {
                    let first = tables.iter().next().copied()?;
                    (first != index).then(|| ForeignKey::new(key, first))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::NormalForm;
    use normalizer::{Normalizer, RelationSchema};

    #[test]
    fn chain_references_key_table() {
        let mut n = Normalizer::from_names(["A", "B", "C", "D"]).unwrap();
        n.add_functional_dependency_by_name(&["A"], &["B", "C"]).unwrap();
        n.add_functional_dependency_by_name(&["B"], &["D"]).unwrap();
        let relations = n.normalize(NormalForm::BoyceCodd, true).unwrap();
        let fks = infer_foreign_keys(&relations);
        assert_eq!(fks[0], vec![ForeignKey::new(vec![1], 1)]);
        assert!(fks[1].is_empty());
        assert_eq!(fks[0][0].to_string(), "(1) -> #1");
    }

    #[test]
    fn junction_table_references_both_sides() {
        // order -> customer, product -> price, (order, product) -> quantity
        let mut n =
            Normalizer::from_names(["order", "customer", "product", "price", "qty"]).unwrap();
        n.add_functional_dependency(&[0], &[1]).unwrap();
        n.add_functional_dependency(&[2], &[3]).unwrap();
        n.add_functional_dependency(&[0, 2], &[4]).unwrap();
        let relations = n.normalize(NormalForm::BoyceCodd, true).unwrap();
        let junction = relations
            .iter()
            .position(|r| r.schema().primary_key() == [0, 2])
            .unwrap();
        let referenced = infer_foreign_keys(&relations)[junction]
            .iter()
            .map(|fk| relations[fk.referenced()].schema().primary_key().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(referenced, vec![vec![0], vec![2]]);
    }

    #[test]
    fn shared_keys_reference_first_owner_only() {
        let table = |attributes: Vec<usize>| {
            let schema = RelationSchema::new(attributes, vec![0], vec![]).unwrap();
            NormalizedRelation::new(schema, NormalForm::Fourth)
        };
        let relations = vec![table(vec![0, 1]), table(vec![0, 2])];
        let fks = infer_foreign_keys(&relations);
        assert!(fks[0].is_empty());
        assert_eq!(fks[1], vec![ForeignKey::new(vec![0], 0)]);
    }

    #[test]
    fn alternate_key_is_referenced() {
        // (id, name, email) with email unique, and (email, login)
        let owner = RelationSchema::new(vec![0, 1, 2], vec![0], vec![vec![2]]).unwrap();
        let login = RelationSchema::new(vec![2, 3], vec![2, 3], vec![]).unwrap();
        let relations = vec![
            NormalizedRelation::new(owner, NormalForm::BoyceCodd),
            NormalizedRelation::new(login, NormalForm::BoyceCodd),
        ];
        let fks = infer_foreign_keys(&relations);
        assert!(fks[0].is_empty());
        assert_eq!(fks[1], vec![ForeignKey::new(vec![2], 0)]);
    }
}
