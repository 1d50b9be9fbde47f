//! The attribute model: attributes, declared dependencies, keys and sample rows.

use crate::attribute::Attribute;
use crate::error::NormalizeError;
use crate::mvd::{self, MultivaluedDependency};
use crate::Result;
use itertools::Itertools;
use settrie::{set, SetFamily};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Relation under normalization.
///
/// Attributes are dense indices `0..n` in declaration order. Every set
/// argument is a slice of such indices; order and duplicates do not matter,
/// sets are normalized on entry. Declaring anything resets saturation, so
/// [`Normalizer::saturate`] (or [`Normalizer::normalize`]) must run again
/// before keys or covers are requested.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    attributes: Vec<Attribute>,
    by_name: HashMap<String, usize>,
    unique_keys: SetFamily<usize>,
    multivalued: Vec<MultivaluedDependency>,
    rows: Vec<Vec<String>>,
}

impl Normalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Model with untyped attributes named `names`, in order.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalizer = Self::new();
        for name in names {
            normalizer.add_attribute(name.as_ref(), None)?;
        }
        Ok(normalizer)
    }

    /// Append an attribute and return its index.
    ///
    /// Not allowed once multivalued dependencies exist: their partitions
    /// cover exactly the attributes known at declaration time.
    pub fn add_attribute(&mut self, name: &str, sql_type: Option<&str>) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NormalizeError::InvalidArgument(
                "attribute name must not be empty".into(),
            ));
        }
        if self.by_name.contains_key(name) {
            return Err(NormalizeError::DuplicateAttribute(name.to_string()));
        }
        if !self.multivalued.is_empty() {
            return Err(NormalizeError::InvalidState(format!(
                "cannot add attribute '{}' after multivalued dependencies were declared",
                name
            )));
        }
        if !self.rows.is_empty() {
            return Err(NormalizeError::InvalidState(format!(
                "cannot add attribute '{}' after sample rows were set",
                name
            )));
        }

        let index = self.attributes.len();
        self.attributes.push(Attribute::new(
            index,
            name.to_string(),
            sql_type.map(str::to_string),
        ));
        self.by_name.insert(name.to_string(), index);
        self.invalidate();
        Ok(index)
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Every attribute index, ascending.
    #[must_use]
    pub fn all_attributes(&self) -> Vec<usize> {
        (0..self.attributes.len()).collect()
    }

    pub fn attribute(&self, index: usize) -> Result<&Attribute> {
        self.attributes.get(index).ok_or_else(|| {
            NormalizeError::InvalidArgument(format!(
                "attribute index {} out of range (0..{})",
                index,
                self.attributes.len()
            ))
        })
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name.trim())
            .copied()
            .ok_or_else(|| NormalizeError::UnknownAttribute(name.to_string()))
    }

    /// Resolve attribute names into a normalized index set.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        let indices = names
            .iter()
            .map(|name| self.index_of(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(set::normalize(indices))
    }

    /// Validate that every index is in range and return the normalized set.
    pub fn check(&self, attributes: &[usize]) -> Result<Vec<usize>> {
        if let Some(&bad) = attributes.iter().find(|&&a| a >= self.attributes.len()) {
            return Err(NormalizeError::InvalidArgument(format!(
                "attribute index {} out of range (0..{})",
                bad,
                self.attributes.len()
            )));
        }
        Ok(set::normalize(attributes.iter().copied()))
    }

    /// Names of `attributes`, in index order.
    #[must_use]
    pub fn names(&self, attributes: &[usize]) -> Vec<&str> {
        attributes
            .iter()
            .filter_map(|&a| self.attributes.get(a))
            .map(Attribute::name)
            .collect()
    }

    /// `{a, b}` rendering of an index set by attribute name.
    #[must_use]
    pub fn describe(&self, attributes: &[usize]) -> String {
        format!("{{{}}}", self.names(attributes).iter().join(", "))
    }

    /// Declare `lhs -> rhs`. Dependents already in `lhs` are dropped as trivial.
    pub fn add_functional_dependency(&mut self, lhs: &[usize], rhs: &[usize]) -> Result<()> {
        let lhs = self.check(lhs)?;
        let rhs = self.check(rhs)?;
        if lhs.is_empty() {
            return Err(NormalizeError::InvalidArgument(
                "functional dependency needs a non-empty determinant".into(),
            ));
        }
        if rhs.is_empty() {
            return Err(NormalizeError::InvalidArgument(format!(
                "functional dependency {} -> {{}} has no dependents",
                self.describe(&lhs)
            )));
        }

        for &dependent in &rhs {
            if !self.attributes[dependent].add_determinant(&lhs) {
                debug!(
                    "Skipping trivial or repeated dependency {} -> {}",
                    self.describe(&lhs),
                    self.attributes[dependent].name()
                );
            }
        }
        self.invalidate();
        Ok(())
    }

    pub fn add_functional_dependency_by_name<S: AsRef<str>>(
        &mut self,
        lhs: &[S],
        rhs: &[S],
    ) -> Result<()> {
        let lhs = self.resolve(lhs)?;
        let rhs = self.resolve(rhs)?;
        self.add_functional_dependency(&lhs, &rhs)
    }

    /// Declare a unique key; it becomes a determinant of every other attribute.
    pub fn add_unique_key(&mut self, key: &[usize]) -> Result<()> {
        let key = self.check(key)?;
        if key.is_empty() {
            return Err(NormalizeError::InvalidArgument(
                "unique key must not be empty".into(),
            ));
        }
        let dependents = set::difference(&self.all_attributes(), &key);
        for &dependent in &dependents {
            self.attributes[dependent].add_determinant(&key);
        }
        self.unique_keys.insert(&key);
        self.invalidate();
        Ok(())
    }

    pub fn add_unique_key_by_name<S: AsRef<str>>(&mut self, key: &[S]) -> Result<()> {
        let key = self.resolve(key)?;
        self.add_unique_key(&key)
    }

    /// Declared unique keys.
    #[must_use]
    pub fn unique_keys(&self) -> &SetFamily<usize> {
        &self.unique_keys
    }

    /// Declare `lhs ->> rhs`.
    ///
    /// When sample rows are present the dependency is checked against them;
    /// a violation is logged and the dependency is recorded regardless.
    pub fn add_multivalued_dependency(&mut self, lhs: &[usize], rhs: &[usize]) -> Result<()> {
        let lhs = self.check(lhs)?;
        let rhs = self.check(rhs)?;
        if rhs.is_empty() {
            return Err(NormalizeError::InvalidArgument(format!(
                "multivalued dependency {} ->> {{}} has no dependents",
                self.describe(&lhs)
            )));
        }

        let dependency = MultivaluedDependency::new(lhs, rhs, &self.all_attributes());
        self.report_violation(&dependency);
        self.multivalued.push(dependency);
        self.invalidate();
        Ok(())
    }

    pub fn add_multivalued_dependency_by_name<S: AsRef<str>>(
        &mut self,
        lhs: &[S],
        rhs: &[S],
    ) -> Result<()> {
        let lhs = self.resolve(lhs)?;
        let rhs = self.resolve(rhs)?;
        self.add_multivalued_dependency(&lhs, &rhs)
    }

    #[must_use]
    pub fn multivalued_dependencies(&self) -> &[MultivaluedDependency] {
        &self.multivalued
    }

    /// Replace the sample rows and check every declared multivalued dependency against them.
    pub fn set_sample_rows(&mut self, rows: Vec<Vec<String>>) -> Result<()> {
        if let Some((line, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.attributes.len())
        {
            return Err(NormalizeError::InvalidArgument(format!(
                "sample row {} has {} values, expected {}",
                line,
                row.len(),
                self.attributes.len()
            )));
        }
        self.rows = rows;
        for dependency in &self.multivalued {
            self.report_violation(dependency);
        }
        Ok(())
    }

    #[must_use]
    pub fn sample_rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn report_violation(&self, dependency: &MultivaluedDependency) {
        if self.rows.is_empty() {
            return;
        }
        if let Err(violation) = mvd::validate(&self.rows, dependency.lhs(), dependency.rhs()) {
            warn!(
                "{} ->> {} does not hold on the sample rows: {}",
                self.describe(dependency.lhs()),
                self.describe(dependency.rhs()),
                violation
            );
        }
    }

    /// Attributes functionally determined by `attributes` under the declared
    /// dependencies and unique keys (always contains `attributes` itself).
    pub fn closure(&self, attributes: &[usize]) -> Result<Vec<usize>> {
        let mut closure = self.check(attributes)?;
        loop {
            let derived = self
                .attributes
                .iter()
                .filter(|a| closure.binary_search(&a.index()).is_err())
                .filter(|a| a.determinant_sets().contains_subset_of(&closure))
                .map(Attribute::index)
                .collect::<Vec<_>>();
            if derived.is_empty() {
                return Ok(closure);
            }
            closure = set::union(&closure, &derived);
        }
    }

    /// Drop saturation results after the declarations changed.
    pub(crate) fn invalidate(&mut self) {
        for attribute in &mut self.attributes {
            attribute.reset();
        }
    }

    pub(crate) fn attribute_mut(&mut self, index: usize) -> &mut Attribute {
        &mut self.attributes[index]
    }
}

impl fmt::Display for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Relation({})",
            self.attributes.iter().map(|a| a.to_string()).join(", ")
        )?;
        for attribute in &self.attributes {
            for determinant in attribute.determinant_sets().iter_breadth_first() {
                writeln!(f, "  {} -> {}", self.describe(&determinant), attribute.name())?;
            }
        }
        for dependency in &self.multivalued {
            writeln!(
                f,
                "  {} ->> {}",
                self.describe(dependency.lhs()),
                self.describe(dependency.rhs())
            )?;
        }
        Ok(())
    }
}
