//! Attributes of the relation being normalized.

use settrie::SetFamily;
use std::fmt;

/// Column type used when a document declares none.
pub const DEFAULT_SQL_TYPE: &str = "TEXT";

/// One attribute, addressed by its dense index in the [`crate::Normalizer`].
///
/// Determinant sets are attribute-index sets. `determinants` holds what was
/// declared; `minimal` is filled by saturation and always forms an antichain.
#[derive(Debug, Clone)]
pub struct Attribute {
    index: usize,
    name: String,
    sql_type: Option<String>,
    determinants: SetFamily<usize>,
    minimal: SetFamily<usize>,
    saturated: bool,
}

impl Attribute {
    #[must_use]
    pub fn new(index: usize, name: String, sql_type: Option<String>) -> Self {
        Self {
            index,
            name,
            sql_type,
            determinants: SetFamily::new(),
            minimal: SetFamily::new(),
            saturated: false,
        }
    }

    #[must_use]
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared column type, if any.
    #[must_use]
    #[inline]
    pub fn sql_type(&self) -> Option<&str> {
        self.sql_type.as_deref()
    }

    /// Declared column type, or [`DEFAULT_SQL_TYPE`].
    #[must_use]
    pub fn sql_type_or_default(&self) -> &str {
        self.sql_type().unwrap_or(DEFAULT_SQL_TYPE)
    }

    /// Determinant sets as declared (trivial ones never enter).
    #[must_use]
    #[inline]
    pub fn determinant_sets(&self) -> &SetFamily<usize> {
        &self.determinants
    }

    /// Minimal determinant sets; empty until saturated, then always holds `{self}`.
    #[must_use]
    #[inline]
    pub fn minimal_determinant_sets(&self) -> &SetFamily<usize> {
        &self.minimal
    }

    #[must_use]
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Record `determinant -> self`. Returns false when trivial or already declared.
    pub(crate) fn add_determinant(&mut self, determinant: &[usize]) -> bool {
        if determinant.binary_search(&self.index).is_ok() {
            return false;
        }
        self.determinants.insert(determinant)
    }

    pub(crate) fn set_minimal(&mut self, minimal: SetFamily<usize>) {
        self.minimal = minimal;
        self.saturated = true;
    }

    pub(crate) fn minimal_mut(&mut self) -> &mut SetFamily<usize> {
        &mut self.minimal
    }

    pub(crate) fn reset(&mut self) {
        self.minimal.clear();
        self.saturated = false;
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.sql_type_or_default())
    }
}
