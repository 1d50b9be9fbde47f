//! Schema Normalizer Library
//!
//! Decomposes a relation into tables satisfying a target normal form:
//!
//! - [`Normalizer`]: attributes, functional and multivalued dependencies,
//!   declared unique keys and optional sample rows.
//! - Saturation of minimal determinant sets per attribute, candidate keys,
//!   plain and canonical covers.
//! - Table construction (with the fourth normal form pre-pass and splitting
//!   along multivalued dependencies) and per-table classification into
//!   [`NormalizedRelation`]s.
//! - [`SchemaDocument`]: the JSON input format.
//!
//! # Example
//! ```rust
//! use common::NormalForm;
//! use normalizer::Normalizer;
//!
//! let mut n = Normalizer::from_names(["A", "B", "C", "D"]).unwrap();
//! n.add_functional_dependency_by_name(&["A"], &["B", "C"]).unwrap();
//! n.add_functional_dependency_by_name(&["B"], &["D"]).unwrap();
//! let tables = n.normalize(NormalForm::BoyceCodd, true).unwrap();
//! assert_eq!(tables.len(), 2);
//! ```

pub mod attribute;
pub mod classify;
pub mod cover;
pub mod decompose;
pub mod document;
pub mod error;
pub mod keys;
pub mod mvd;
pub mod normalizer;
pub mod relation;
pub mod saturate;


pub use attribute::{Attribute, DEFAULT_SQL_TYPE};
pub use cover::Cover;
pub use document::{AttributeSpec, DependencySpec, SchemaDocument};
pub use error::{MvdViolation, NormalizeError};
pub use mvd::MultivaluedDependency;
pub use normalizer::Normalizer;
pub use relation::{NormalizedRelation, RelationSchema, SchemaDisplay};

pub type Result<T> = std::result::Result<T, NormalizeError>;
