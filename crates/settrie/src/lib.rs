//! Set Trie Library
//!
//! Ordered containers keyed by *sets* of totally ordered elements, built on a
//! single recursive trie whose sibling order equals element order:
//!
//! - [`Node`]: the trie itself, generic over a payload [`Storage`] strategy;
//!   subset/superset existence, counting, enumeration (depth-first and
//!   breadth-first) and removal, plus node-by-node set algebra.
//! - [`SetFamily`]: a set of sets, with antichain-maintaining insertion and
//!   pairwise-union combination.
//! - [`SetMap`] / [`SetMultiMap`]: one value or a value set per key.
//! - [`DepthFirstCursor`] / [`BreadthFirstCursor`]: detached enumeration that
//!   fails with [`SetTrieError::InvalidState`] once its container changes.
//!
//! # Example
//! ```rust
//! use settrie::SetFamily;
//!
//! let mut keys = SetFamily::new();
//! keys.add_with_minimal_invariant(&[1, 2, 3]);
//! keys.add_with_minimal_invariant(&[1, 2]);
//! assert_eq!(keys.iter().collect::<Vec<_>>(), vec![vec![1, 2]]);
//! ```

pub mod cursor;
pub mod error;
pub mod family;
pub mod map;
pub mod multimap;
pub mod node;
pub mod set;
pub mod storage;

pub use cursor::{BreadthFirstCursor, DepthFirstCursor, TrieContainer};
pub use error::SetTrieError;
pub use family::SetFamily;
pub use map::SetMap;
pub use multimap::SetMultiMap;
pub use node::Node;
pub use storage::{Presence, SingleValue, Storage, ValueSet};

pub type Result<T> = std::result::Result<T, SetTrieError>;
