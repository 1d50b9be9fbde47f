//! Normal forms a decomposition can target or achieve.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normal forms in increasing strictness; `Ord` follows that order.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
)]
pub enum NormalForm {
    /// Atomic values only; always holds for produced schemas.
    #[value(name = "1nf")]
    #[serde(rename = "1nf")]
    First,
    /// No non-prime attribute depends on part of a candidate key.
    #[value(name = "2nf")]
    #[serde(rename = "2nf")]
    Second,
    /// No non-prime attribute depends transitively on a candidate key.
    #[value(name = "3nf")]
    #[serde(rename = "3nf")]
    Third,
    /// Every non-trivial determinant is a candidate key.
    #[default]
    #[value(name = "bcnf")]
    #[serde(rename = "bcnf")]
    BoyceCodd,
    /// BCNF and no non-trivial multivalued dependency.
    #[value(name = "4nf")]
    #[serde(rename = "4nf")]
    Fourth,
}

impl NormalForm {
    /// All normal forms, weakest first.
    pub const ALL: [NormalForm; 5] = [
        NormalForm::First,
        NormalForm::Second,
        NormalForm::Third,
        NormalForm::BoyceCodd,
        NormalForm::Fourth,
    ];

    /// Whether this level requires transitive dependencies to be reduced.
    #[inline]
    pub fn needs_canonical_cover(self) -> bool {
        self >= NormalForm::Third
    }

    /// Whether multivalued dependencies take part.
    #[inline]
    pub fn considers_multivalued(self) -> bool {
        self >= NormalForm::Fourth
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NormalForm::First => "1NF",
            NormalForm::Second => "2NF",
            NormalForm::Third => "3NF",
            NormalForm::BoyceCodd => "BCNF",
            NormalForm::Fourth => "4NF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for NormalForm {
    type Err = String;

    /// Accepts the CLI spellings (`3nf`, `bcnf`, ...) case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <NormalForm as ValueEnum>::from_str(s, true).map_err(|_| {
            format!(
                "invalid normal form '{}', expected one of 1nf, 2nf, 3nf, bcnf, 4nf",
                s
            )
        })
    }
}
