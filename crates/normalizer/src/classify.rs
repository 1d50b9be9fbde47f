//! Per-table key selection and normal form classification.

use crate::relation::RelationSchema;
use crate::{Normalizer, Result};
use common::NormalForm;

impl Normalizer {
    /// Keys and normal form of `table`.
    ///
    /// The smallest candidate key (ties broken lexicographically) becomes the
    /// primary key. A minimal determinant set inside the table that is not a
    /// key breaks BCNF; it also breaks 3NF unless its dependent is prime,
    /// and 2NF as well when it is part of a key. Fourth normal form is only
    /// reported for 4NF targets whose table no multivalued dependency splits.
    pub fn create_relation_schema(
        &self,
        table: &[usize],
        target: NormalForm,
    ) -> Result<(RelationSchema, NormalForm)> {
        let table = self.check(table)?;
        let keys = self.keys_within(&table)?;
        let prime = Self::prime_attributes(&keys);

        let mut second = true;
        let mut third = true;
        let mut boyce_codd = true;
        for &attribute in &table {
            let is_prime = prime.binary_search(&attribute).is_ok();
            for determinant in self.minimal_determinant_sets(attribute)?.subsets_of(&table) {
                if determinant.as_slice() == [attribute] {
                    continue;
                }
                if keys.contains_proper_superset_of(&determinant) {
                    boyce_codd = false;
                    if !is_prime {
                        second = false;
                        third = false;
                    }
                }
                if !keys.contains(&determinant) {
                    boyce_codd = false;
                    if !is_prime {
                        third = false;
                    }
                }
            }
        }

        let fourth = target.considers_multivalued()
            && self
                .multivalued_dependencies()
                .iter()
                .all(|dependency| !dependency.separates(&table));

        let normal_form = if !second {
            NormalForm::First
        } else if !third {
            NormalForm::Second
        } else if !boyce_codd {
            NormalForm::Third
        } else if fourth {
            NormalForm::Fourth
        } else {
            NormalForm::BoyceCodd
        };

        let mut ordered = keys.iter_breadth_first();
        let primary_key = ordered.next().unwrap_or_else(|| table.clone());
        let alternate_keys = ordered.collect::<Vec<_>>();
        let schema = RelationSchema::new(table, primary_key, alternate_keys)?;
        Ok((schema, normal_form))
    }
}
