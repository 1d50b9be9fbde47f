//! Multivalued dependencies: sample-row validation, the fourth normal form
//! pre-pass and partition splitting of tables.

use crate::error::MvdViolation;
use crate::Normalizer;
use itertools::Itertools;
use settrie::{set, SetFamily};
use tracing::warn;

/// `lhs ->> rhs`, kept together with the partition it induces on the relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultivaluedDependency {
    lhs: Vec<usize>,
    rhs: Vec<usize>,
    // lhs ∪ rhs
    left_side: Vec<usize>,
    // lhs ∪ (all \ rhs)
    right_side: Vec<usize>,
}

impl MultivaluedDependency {
    /// `lhs` and `rhs` must be normalized subsets of `all`.
    #[must_use]
    pub fn new(lhs: Vec<usize>, rhs: Vec<usize>, all: &[usize]) -> Self {
        let left_side = set::union(&lhs, &rhs);
        let right_side = set::union(&lhs, &set::difference(all, &rhs));
        Self {
            lhs,
            rhs,
            left_side,
            right_side,
        }
    }

    #[must_use]
    pub fn lhs(&self) -> &[usize] {
        &self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> &[usize] {
        &self.rhs
    }

    /// The two sides of the partition; their union is the whole relation.
    #[must_use]
    pub fn sides(&self) -> (&[usize], &[usize]) {
        (&self.left_side, &self.right_side)
    }

    /// `table` lies entirely within one side.
    #[must_use]
    pub fn separates(&self, table: &[usize]) -> bool {
        !(set::is_subset(table, &self.left_side) || set::is_subset(table, &self.right_side))
    }
}

/// Check `lhs ->> rhs` against sample rows.
///
/// Rows are deduplicated and sorted by (lhs, rhs \ lhs, rest) columns. Inside
/// each block of equal lhs values the rows must fall into equally sized runs
/// of one rhs value each, and every run must carry the same remaining values
/// in the same order.
pub fn validate(rows: &[Vec<String>], lhs: &[usize], rhs: &[usize]) -> Result<(), MvdViolation> {
    let width = rows.first().map_or(0, Vec::len);
    let all: Vec<usize> = (0..width).collect();
    let right = set::difference(rhs, lhs);
    let other = set::difference(&all, &set::union(lhs, &right));
    if right.is_empty() || other.is_empty() {
        return Ok(());
    }

    let project = |row: &[String], columns: &[usize]| -> Vec<String> {
        columns.iter().map(|&c| row[c].clone()).collect()
    };
    let projected: Vec<(Vec<String>, Vec<String>, Vec<String>)> = rows
        .iter()
        .unique()
        .map(|row| (project(row, lhs), project(row, &right), project(row, &other)))
        .sorted()
        .collect();

    for block in projected.chunk_by(|a, b| a.0 == b.0) {
        let run = block.iter().take_while(|t| t.1 == block[0].1).count();
        if block.len() % run != 0 {
            return Err(MvdViolation::UnevenPartition {
                block: block[0].0.clone(),
                size: block.len(),
                run,
            });
        }

        let partitions = block.chunks(run).collect::<Vec<_>>();
        for partition in &partitions {
            if let Some(mixed) = partition.iter().find(|t| t.1 != partition[0].1) {
                return Err(MvdViolation::MixedPartition {
                    block: block[0].0.clone(),
                    first: partition[0].1.clone(),
                    second: mixed.1.clone(),
                });
            }
        }
        for (previous, next) in partitions.iter().tuple_windows() {
            if previous[0].1 == next[0].1 {
                return Err(MvdViolation::RepeatedPartition {
                    block: block[0].0.clone(),
                    values: next[0].1.clone(),
                });
            }
            if previous.iter().zip(next.iter()).any(|(p, n)| p.2 != n.2) {
                return Err(MvdViolation::Dependent {
                    block: block[0].0.clone(),
                    left: previous[0].1.clone(),
                    right: next[0].1.clone(),
                });
            }
        }
    }
    Ok(())
}

impl Normalizer {
    /// Fourth normal form pre-pass over saturated determinant sets.
    ///
    /// For an attribute found on only one side of a partition, determinant
    /// sets reaching into the part found only on the other side are removed.
    /// This is a heuristic: it is not correct for every combination of
    /// functional and multivalued dependencies. Each removal is logged.
    /// Returns the number of determinant sets removed.
    pub(crate) fn prune_for_fourth_normal_form(&mut self) -> usize {
        let mut removed = 0;
        for dependency in self.multivalued_dependencies().to_vec() {
            let (left, right) = dependency.sides();
            let left_only = set::difference(left, right);
            let right_only = set::difference(right, left);
            removed += self.strip_crossing(&left_only, &right_only, &dependency);
            removed += self.strip_crossing(&right_only, &left_only, &dependency);
        }
        removed
    }

    fn strip_crossing(
        &mut self,
        dependents: &[usize],
        other_side: &[usize],
        dependency: &MultivaluedDependency,
    ) -> usize {
        let mut removed = 0;
        for &dependent in dependents {
            let crossing = self.attributes()[dependent]
                .minimal_determinant_sets()
                .iter()
                .filter(|determinant| set::intersects(determinant, other_side))
                .collect::<Vec<_>>();
            for determinant in crossing {
                warn!(
                    "Dropping {} -> {}: crosses the partition of {} ->> {}",
                    self.describe(&determinant),
                    self.attributes()[dependent].name(),
                    self.describe(dependency.lhs()),
                    self.describe(dependency.rhs())
                );
                self.attribute_mut(dependent)
                    .minimal_mut()
                    .remove(&determinant);
                removed += 1;
            }
        }
        removed
    }

    /// Insert `table` into `tables`, split along every multivalued dependency
    /// from `from` on, in declaration order.
    pub(crate) fn insert_split(&self, tables: &mut SetFamily<usize>, table: &[usize], from: usize) {
        match self.multivalued_dependencies().get(from) {
            None => {
                tables.add_with_maximal_invariant(table);
            }
            Some(dependency) if !dependency.separates(table) => {
                self.insert_split(tables, table, from + 1);
            }
            Some(dependency) => {
                let (left, right) = dependency.sides();
                self.insert_split(tables, &set::intersection(table, left), from + 1);
                self.insert_split(tables, &set::intersection(table, right), from + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[[&str; 3]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn partition_sides() {
        let mvd = MultivaluedDependency::new(vec![0], vec![1], &[0, 1, 2, 3]);
        assert_eq!(mvd.sides(), (&[0, 1][..], &[0, 2, 3][..]));
        assert!(!mvd.separates(&[0, 1]));
        assert!(!mvd.separates(&[2, 3]));
        assert!(mvd.separates(&[1, 2]));
    }

    #[test]
    fn independent_values_pass() {
        let data = rows(&[
            ["1", "x", "p"],
            ["1", "x", "q"],
            ["1", "y", "p"],
            ["1", "y", "q"],
            ["2", "z", "r"],
        ]);
        assert_eq!(validate(&data, &[0], &[1]), Ok(()));
    }

    #[test]
    fn missing_combination_fails() {
        let data = rows(&[["1", "x", "p"], ["1", "x", "q"], ["1", "y", "p"]]);
        assert!(matches!(
            validate(&data, &[0], &[1]),
            Err(MvdViolation::UnevenPartition { size: 3, run: 2, .. })
        ));
    }

    #[test]
    fn swapped_remaining_values_fail() {
        let data = rows(&[
            ["1", "x", "p"],
            ["1", "x", "q"],
            ["1", "y", "p"],
            ["1", "y", "r"],
        ]);
        assert!(matches!(
            validate(&data, &[0], &[1]),
            Err(MvdViolation::Dependent { .. })
        ));
    }

    #[test]
    fn duplicates_ignored_and_trivial_holds() {
        let data = rows(&[["1", "x", "p"], ["1", "x", "p"], ["1", "y", "p"]]);
        assert_eq!(validate(&data, &[0], &[1]), Ok(()));
        // rhs covering every other column is trivial
        let skew = rows(&[["1", "x", "p"], ["1", "y", "q"], ["1", "y", "r"]]);
        assert_eq!(validate(&skew, &[0], &[1, 2]), Ok(()));
    }
}
