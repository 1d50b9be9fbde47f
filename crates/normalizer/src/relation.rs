//! Normalized relation schemas.

use crate::error::NormalizeError;
use crate::{Normalizer, Result};
use common::NormalForm;
use itertools::Itertools;
use settrie::set;
use std::fmt;

/// One output table: its attributes, primary key and alternate unique keys.
///
/// Every key is a subset of `attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationSchema {
    attributes: Vec<usize>,
    primary_key: Vec<usize>,
    alternate_keys: Vec<Vec<usize>>,
}

impl RelationSchema {
    pub fn new(
        attributes: Vec<usize>,
        primary_key: Vec<usize>,
        alternate_keys: Vec<Vec<usize>>,
    ) -> Result<Self> {
        let attributes = set::normalize(attributes);
        let primary_key = set::normalize(primary_key);
        let alternate_keys = alternate_keys
            .into_iter()
            .map(set::normalize)
            .collect::<Vec<_>>();

        if let Some(key) = std::iter::once(&primary_key)
            .chain(alternate_keys.iter())
            .find(|key| !set::is_subset(key, &attributes))
        {
            return Err(NormalizeError::InvalidArgument(format!(
                "key {} is not within table {}",
                set::display(key),
                set::display(&attributes)
            )));
        }

        Ok(Self {
            attributes,
            primary_key,
            alternate_keys,
        })
    }

    #[must_use]
    #[inline]
    pub fn attributes(&self) -> &[usize] {
        &self.attributes
    }

    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    #[inline]
    pub fn primary_key(&self) -> &[usize] {
        &self.primary_key
    }

    #[must_use]
    #[inline]
    pub fn alternate_keys(&self) -> &[Vec<usize>] {
        &self.alternate_keys
    }

    /// Primary key first, then the alternate keys.
    pub fn keys(&self) -> impl Iterator<Item = &[usize]> {
        std::iter::once(self.primary_key.as_slice())
            .chain(self.alternate_keys.iter().map(Vec::as_slice))
    }

    #[must_use]
    pub fn contains(&self, attribute: usize) -> bool {
        self.attributes.binary_search(&attribute).is_ok()
    }

    /// Render with attribute names from `normalizer`.
    #[must_use]
    pub fn display<'a>(&'a self, normalizer: &'a Normalizer) -> SchemaDisplay<'a> {
        SchemaDisplay {
            schema: self,
            normalizer,
        }
    }
}

impl fmt::Display for RelationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} key {}",
            set::display(&self.attributes),
            set::display(&self.primary_key)
        )?;
        for key in &self.alternate_keys {
            write!(f, " unique {}", set::display(key))?;
        }
        Ok(())
    }
}

/// [`RelationSchema`] rendered by attribute name.
pub struct SchemaDisplay<'a> {
    schema: &'a RelationSchema,
    normalizer: &'a Normalizer,
}

impl fmt::Display for SchemaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |set: &[usize]| self.normalizer.names(set).iter().join(", ");
        write!(
            f,
            "({}) PRIMARY KEY ({})",
            names(self.schema.attributes()),
            names(self.schema.primary_key())
        )?;
        for key in self.schema.alternate_keys() {
            write!(f, " UNIQUE ({})", names(key))?;
        }
        Ok(())
    }
}

/// A produced table with the highest normal form it satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRelation {
    schema: RelationSchema,
    normal_form: NormalForm,
}

impl NormalizedRelation {
    #[must_use]
    pub fn new(schema: RelationSchema, normal_form: NormalForm) -> Self {
        Self {
            schema,
            normal_form,
        }
    }

    #[must_use]
    #[inline]
    pub fn schema(&self) -> &RelationSchema {
        &self.schema
    }

    #[must_use]
    #[inline]
    pub fn normal_form(&self) -> NormalForm {
        self.normal_form
    }
}

impl fmt::Display for NormalizedRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.schema, self.normal_form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_must_lie_within_table() {
        let schema = RelationSchema::new(vec![2, 0, 1], vec![0], vec![vec![2, 1]]).unwrap();
        assert_eq!(schema.attributes(), &[0, 1, 2]);
        assert_eq!(schema.alternate_keys(), &[vec![1, 2]]);
        assert_eq!(schema.keys().count(), 2);
        assert!(matches!(
            RelationSchema::new(vec![0, 1], vec![2], vec![]),
            Err(NormalizeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn display_by_index_and_name() {
        let n = Normalizer::from_names(["id", "name", "email"]).unwrap();
        let schema = RelationSchema::new(vec![0, 1, 2], vec![0], vec![vec![2]]).unwrap();
        assert_eq!(schema.to_string(), "{0, 1, 2} key {0} unique {2}");
        assert_eq!(
            schema.display(&n).to_string(),
            "(id, name, email) PRIMARY KEY (id) UNIQUE (email)"
        );
        let rel = NormalizedRelation::new(schema, NormalForm::BoyceCodd);
        assert_eq!(rel.to_string(), "{0, 1, 2} key {0} unique {2} [BCNF]");
    }
}
