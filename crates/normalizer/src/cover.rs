//! Covers: determinant set -> dependent attributes.

use crate::{Normalizer, Result};
use settrie::{set, SetFamily, SetMultiMap};
use tracing::debug;

/// Determinant set mapped to the attributes it determines.
pub type Cover = SetMultiMap<usize, usize>;

impl Normalizer {
    /// Every non-trivial minimal determinant set grouped with its dependents.
    ///
    /// Safe for second normal form; transitive dependencies are kept.
    pub fn cover(&self) -> Result<Cover> {
        let mut cover = Cover::new();
        for attribute in self.attributes() {
            let dependent = attribute.index();
            for determinant in self.minimal_determinant_sets(dependent)?.iter() {
                if determinant.as_slice() != [dependent] {
                    cover.insert(&determinant, dependent);
                }
            }
        }
        Ok(cover)
    }

    /// The cover with transitively implied dependencies removed.
    ///
    /// Determinant sets are visited smallest first and their dependents in
    /// index order. `D -> d` goes when some other remaining determinant set
    /// of `d` lies within `D` plus the other dependents of `D`. Once removed,
    /// `D` no longer counts as a determinant of `d`, so two dependencies in a
    /// cycle cannot remove each other.
    pub fn canonical_cover(&self) -> Result<Cover> {
        let mut cover = self.cover()?;
        let mut remaining: Vec<SetFamily<usize>> = self
            .attributes()
            .iter()
            .map(|a| {
                let mut sets = a.minimal_determinant_sets().clone();
                sets.remove(&[a.index()]);
                sets
            })
            .collect();

        let determinants = cover
            .iter_breadth_first()
            .map(|(determinant, _)| determinant)
            .collect::<Vec<_>>();

        for determinant in &determinants {
            let dependents = cover.values(determinant)?.iter().copied().collect::<Vec<_>>();
            for dependent in dependents {
                let others = cover
                    .values(determinant)?
                    .iter()
                    .copied()
                    .filter(|&other| other != dependent)
                    .collect::<Vec<_>>();
                let bridge = set::union(determinant, &others);
                let witness = remaining[dependent]
                    .subsets_of(&bridge)
                    .find(|candidate| !set::is_subset(determinant, candidate));

                match witness {
                    Some(witness) => {
                        debug!(
                            "Removing {} -> {}: implied through {}",
                            self.describe(determinant),
                            self.attributes()[dependent].name(),
                            self.describe(&witness)
                        );
                        cover.remove_value(determinant, &dependent);
                        remaining[dependent].remove(determinant);
                    }
                    None if self.in_cycle(determinant, dependent) => {
                        debug!(
                            "Keeping {} -> {}: part of a dependency cycle",
                            self.describe(determinant),
                            self.attributes()[dependent].name()
                        );
                    }
                    None => {}
                }
            }
        }
        Ok(cover)
    }

    /// Either the canonical or the plain cover.
    pub fn cover_for(&self, canonical: bool) -> Result<Cover> {
        if canonical {
            self.canonical_cover()
        } else {
            self.cover()
        }
    }

    // `dependent` helps determine a member of `determinant`.
    fn in_cycle(&self, determinant: &[usize], dependent: usize) -> bool {
        determinant.iter().any(|&member| {
            self.attributes()[member]
                .minimal_determinant_sets()
                .iter()
                .any(|sets| sets.binary_search(&dependent).is_ok())
        })
    }
}
