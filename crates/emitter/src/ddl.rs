//! SQL DDL text for normalized tables.

use crate::error::EmitError;
use crate::foreign_key::{infer_foreign_keys, ForeignKey};
use crate::Result;
use itertools::Itertools;
use normalizer::{NormalizedRelation, Normalizer};
use std::collections::HashMap;
use tracing::debug;

/// Emits `CREATE TABLE` statements for one normalization result.
///
/// Table names come from the primary key's attribute names; repeated names
/// get a numeric suffix. Referenced tables are created before the tables
/// referencing them.
pub struct DdlEmitter<'a> {
    normalizer: &'a Normalizer,
    relations: &'a [NormalizedRelation],
    names: Vec<String>,
    foreign_keys: Vec<Vec<ForeignKey>>,
}

impl<'a> DdlEmitter<'a> {
    #[must_use]
    pub fn new(normalizer: &'a Normalizer, relations: &'a [NormalizedRelation]) -> Self {
        let names = table_names(normalizer, relations);
        let foreign_keys = infer_foreign_keys(relations);
        Self {
            normalizer,
            relations,
            names,
            foreign_keys,
        }
    }

    #[must_use]
    pub fn table_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn foreign_keys(&self) -> &[Vec<ForeignKey>] {
        &self.foreign_keys
    }

    /// `CREATE TABLE` statement of table `index`.
    pub fn table(&self, index: usize) -> Result<String> {
        let relation = self
            .relations
            .get(index)
            .ok_or(EmitError::UnknownTable(index))?;
        let schema = relation.schema();
        let column = |attribute: usize| -> Result<String> {
            Ok(identifier(self.normalizer.attribute(attribute)?.name()))
        };
        let columns = |set: &[usize]| -> Result<String> {
            Ok(set.iter().map(|&a| column(a)).collect::<Result<Vec<_>>>()?.join(", "))
        };

        let mut lines = Vec::new();
        for &attribute in schema.attributes() {
            let sql_type = self.normalizer.attribute(attribute)?.sql_type_or_default();
            let not_null = if schema.primary_key().contains(&attribute) {
                " NOT NULL"
            } else {
                ""
            };
            lines.push(format!("{} {}{}", column(attribute)?, sql_type, not_null));
        }
        lines.push(format!("PRIMARY KEY ({})", columns(schema.primary_key())?));
        for key in schema.alternate_keys() {
            lines.push(format!("UNIQUE ({})", columns(key)?));
        }
        for foreign_key in &self.foreign_keys[index] {
            lines.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                columns(foreign_key.columns())?,
                self.names[foreign_key.referenced()],
                columns(foreign_key.columns())?
            ));
        }

        Ok(format!(
            "-- {}\nCREATE TABLE {} (\n    {}\n);\n",
            relation.normal_form(),
            self.names[index],
            lines.join(",\n    ")
        ))
    }

    /// Tables in creation order: a table follows every table it references,
    /// except along reference cycles.
    #[must_use]
    pub fn creation_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.relations.len());
        let mut emitted = vec![false; self.relations.len()];
        while order.len() < self.relations.len() {
            let ready = (0..self.relations.len()).find(|&i| {
                !emitted[i]
                    && self.foreign_keys[i]
                        .iter()
                        .all(|fk| emitted[fk.referenced()])
            });
            let next = match ready {
                Some(i) => i,
                None => {
                    let stuck = emitted.iter().position(|done| !done).unwrap_or_default();
                    debug!("Reference cycle through table {}", self.names[stuck]);
                    stuck
                }
            };
            emitted[next] = true;
            order.push(next);
        }
        order
    }

    /// Every table, in creation order.
    pub fn script(&self) -> Result<String> {
        let statements = self
            .creation_order()
            .into_iter()
            .map(|index| self.table(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(statements.join("\n"))
    }
}

/// Lowercase identifier made of ASCII alphanumerics and underscores.
fn identifier(name: &str) -> String {
    let ident: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    match ident.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{}", ident),
        None => "_".to_string(),
        _ => ident,
    }
}

fn table_names(normalizer: &Normalizer, relations: &[NormalizedRelation]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    relations
        .iter()
        .map(|relation| {
            let base = normalizer
                .names(relation.schema().primary_key())
                .into_iter()
                .map(identifier)
                .join("_");
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{}_{}", base, count)
            }
        })
        .collect()
}
