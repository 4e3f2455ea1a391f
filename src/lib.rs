//! # art-index
//!
//! An embeddable in-memory [adaptive radix
//! tree](https://db.in.tum.de/~leis/papers/ART.pdf) (ART) mapping
//! byte-string keys to byte-string values.
//!
//! ART adapts each inner node's representation to how many children it
//! actually has (4, 16, 48, or 256), and compresses runs of single-child
//! path segments into each node's prefix, so memory use and traversal
//! depth both track the shape of the key set rather than its raw byte
//! length.
//!
//! ## Example
//!
//! ```rust
//! use art_index::ArtTree;
//!
//! let mut tree = ArtTree::new();
//! tree.insert(b"user:1001", b"alice");
//! tree.insert(b"user:1002", b"bob");
//!
//! assert_eq!(tree.search(b"user:1001").unwrap().as_bytes(), b"alice");
//! assert_eq!(tree.len(), 2);
//!
//! tree.remove(b"user:1001");
//! assert!(tree.search(b"user:1001").is_none());
//! ```
//!
//! For concurrent access from multiple threads, wrap with
//! [`ConcurrentArtTree`] instead of building your own locking around
//! [`ArtTree`].
//!
//! ## Constraints
//!
//! No key may be a proper prefix of another key simultaneously present in
//! the tree (inserting one while the other is present panics). This
//! mirrors the data model spec most ART implementations of this shape
//! assume; see [`ArtTree::insert`] for the exact panic conditions.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod concurrent;
mod debug;
mod error;
mod node;
mod tree;
mod view;

pub use concurrent::{Config, ConcurrentArtTree};
pub use error::TreeCorruption;
pub use node::{NodeType, PREFIX_CAP};
pub use tree::ArtTree;
pub use view::ByteView;
