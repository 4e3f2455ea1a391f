//! Error type for invariant violations detected by the integrity checker.
//!
//! Every externally-visible tree operation (`insert`/`search`/`remove`/`len`)
//! is infallible: the only "failure" mode the core has is "key not found",
//! which is already an `Option`. `TreeCorruption` exists for
//! [`crate::debug::verify_invariants`], the diagnostic pass an embedder runs
//! when it suspects the tree's structural invariants (spec.md §3) have been
//! violated — by a bug in this crate, not by caller misuse.

use thiserror::Error;

/// A structural invariant violation found while walking the tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeCorruption {
    /// An inner node's child count exceeds its variant's capacity.
    #[error("node at depth {depth} exceeds capacity: {count} children for a {variant} node")]
    CapacityExceeded {
        /// Traversal depth at which the violation was found.
        depth: usize,
        /// The node variant's name.
        variant: &'static str,
        /// The observed child count.
        count: usize,
    },

    /// An N4/N16 node's `keys` array is not strictly ascending.
    #[error("node at depth {depth} has unsorted keys array")]
    UnsortedKeys {
        /// Traversal depth at which the violation was found.
        depth: usize,
    },

    /// An N48 index entry points at an empty or out-of-range child slot.
    #[error("node at depth {depth} has N48 index byte {byte} pointing at invalid slot {slot}")]
    DanglingIndex {
        /// Traversal depth at which the violation was found.
        depth: usize,
        /// The key byte whose index entry is dangling.
        byte: u8,
        /// The 1-based slot value found in the index.
        slot: u8,
    },

    /// A descendant leaf's key disagrees with the compressed prefix on the
    /// path from the root to it.
    #[error("prefix mismatch at depth {depth}: node prefix {prefix:?} not a prefix of leaf key {leaf_key:?}")]
    PrefixMismatch {
        /// Traversal depth at which the violation was found.
        depth: usize,
        /// The node's logical prefix bytes, as recovered from a sampled leaf.
        prefix: Vec<u8>,
        /// The disagreeing leaf's full key.
        leaf_key: Vec<u8>,
    },

    /// An inner node was reached with zero children and no way to resolve a
    /// leaf, which should have been collapsed away by a prior remove.
    #[error("inner node at depth {depth} has zero children")]
    EmptyInnerNode {
        /// Traversal depth at which the violation was found.
        depth: usize,
    },
}
