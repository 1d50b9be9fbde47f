//! DDL Emitter Library
//!
//! Turns normalized relation schemas into SQL: foreign keys are inferred from
//! primary keys contained in other tables, then each table is written as a
//! `CREATE TABLE` statement with its primary, unique and foreign keys.

pub mod ddl;
pub mod error;
pub mod foreign_key;

pub use ddl::DdlEmitter;
pub use error::EmitError;
pub use foreign_key::{infer_foreign_keys, ForeignKey};

pub type Result<T> = std::result::Result<T, EmitError>;
