//! The adaptive node family: four inner-node shapes plus a leaf, dispatched
//! through a closed tagged enum rather than a virtual-table hierarchy.
//!
//! - `Node4`: up to 4 children, linear scan.
//! - `Node16`: 5-16 children, linear (SIMD-eligible) scan.
//! - `Node48`: 17-48 children, 256-byte index into a 48-slot table.
//! - `Node256`: 49-256 children, direct indexing.
//!
//! Every inner variant shares a [`Header`] carrying child count and the
//! compressed path prefix (spec.md §3's "Inner-node header" component).

use std::fmt;

/// Inline bytes of a node's compressed prefix kept resident; the logical
/// prefix may be longer (see [`Header::prefix_len`]), in which case bytes
/// past this cap are only recoverable by descending to a leaf.
pub const PREFIX_CAP: usize = 8;

/// The discriminant of a [`Node`], exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// A leaf storing one key-value pair.
    Leaf,
    /// 2-4 children.
    Node4,
    /// 5-16 children.
    Node16,
    /// 17-48 children.
    Node48,
    /// 49-256 children.
    Node256,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Leaf => "Leaf",
            NodeType::Node4 => "Node4",
            NodeType::Node16 => "Node16",
            NodeType::Node48 => "Node48",
            NodeType::Node256 => "Node256",
        };
        f.write_str(name)
    }
}

/// State shared by every inner node: child count and the compressed prefix.
///
/// `prefix_len` is the *logical* length of the shared path segment this node
/// compresses; `prefix` stores only the first `min(prefix_len, PREFIX_CAP)`
/// bytes of it. Recovering bytes beyond the cap requires descending to any
/// descendant leaf (see [`super::tree`]'s pessimistic-prefix reconciliation).
#[derive(Clone, Debug, Default)]
pub struct Header {
    /// Number of occupied child slots.
    pub num_children: u16,
    /// Logical length of the compressed prefix (may exceed `PREFIX_CAP`).
    pub prefix_len: u32,
    /// First `min(prefix_len, PREFIX_CAP)` bytes of the compressed prefix.
    pub prefix: [u8; PREFIX_CAP],
}

impl Header {
    /// Number of inline prefix bytes actually populated.
    pub fn capped_len(&self) -> usize {
        (self.prefix_len as usize).min(PREFIX_CAP)
    }

    /// The inline (possibly truncated) prefix bytes.
    pub fn capped_prefix(&self) -> &[u8] {
        &self.prefix[..self.capped_len()]
    }

    /// Length of the longest match between the inline prefix bytes and
    /// `key[depth..]`, bounded by `min(PREFIX_CAP, prefix_len, len(key) - depth)`.
    ///
    /// Does not consult descendant leaves; see spec.md §4.2.
    pub fn common_prefix_len(&self, key: &[u8], depth: usize) -> usize {
        let capped = self.capped_len();
        let remaining = key.len().saturating_sub(depth);
        let bound = capped.min(remaining);
        self.prefix[..bound]
            .iter()
            .zip(&key[depth..depth + bound])
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Replace the prefix with `bytes`, storing at most `PREFIX_CAP` of them
    /// inline and recording the full logical length.
    pub fn set_prefix(&mut self, bytes: &[u8]) {
        self.prefix_len = bytes.len() as u32;
        self.prefix = [0u8; PREFIX_CAP];
        let n = bytes.len().min(PREFIX_CAP);
        self.prefix[..n].copy_from_slice(&bytes[..n]);
    }
}

/// A node in the adaptive radix tree.
pub enum Node {
    /// Owns the full key (lazy expansion: leaves are not split per level)
    /// and the value.
    Leaf { key: Vec<u8>, value: Vec<u8> },
    /// 2-4 children, sorted `keys`/`children` in lockstep.
    Node4 {
        header: Header,
        keys: [u8; 4],
        children: [Option<Box<Node>>; 4],
    },
    /// 5-16 children, sorted `keys`/`children` in lockstep.
    Node16 {
        header: Header,
        keys: [u8; 16],
        children: [Option<Box<Node>>; 16],
    },
    /// 17-48 children. `index[b]` is 0 (absent) or a 1-based slot into
    /// `children`.
    Node48 {
        header: Header,
        index: Box<[u8; 256]>,
        children: Box<[Option<Box<Node>>; 48]>,
    },
    /// 49-256 children, directly indexed by key byte.
    Node256 {
        header: Header,
        children: Box<[Option<Box<Node>>; 256]>,
    },
}

impl Node {
    /// Construct a new leaf owning `key` and `value`.
    pub fn new_leaf(key: Vec<u8>, value: Vec<u8>) -> Self {
        Node::Leaf { key, value }
    }

    /// Construct an empty Node4.
    pub fn new_node4() -> Self {
        Node::Node4 {
            header: Header::default(),
            keys: [0; 4],
            children: std::array::from_fn(|_| None),
        }
    }

    /// Construct an empty Node16.
    pub fn new_node16() -> Self {
        Node::Node16 {
            header: Header::default(),
            keys: [0; 16],
            children: std::array::from_fn(|_| None),
        }
    }

    /// Construct an empty Node48.
    pub fn new_node48() -> Self {
        Node::Node48 {
            header: Header::default(),
            index: Box::new([0u8; 256]),
            children: Box::new(std::array::from_fn(|_| None)),
        }
    }

    /// Construct an empty Node256.
    pub fn new_node256() -> Self {
        Node::Node256 {
            header: Header::default(),
            children: Box::new(std::array::from_fn(|_| None)),
        }
    }

    /// This node's discriminant.
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Leaf { .. } => NodeType::Leaf,
            Node::Node4 { .. } => NodeType::Node4,
            Node::Node16 { .. } => NodeType::Node16,
            Node::Node48 { .. } => NodeType::Node48,
            Node::Node256 { .. } => NodeType::Node256,
        }
    }

    /// True iff this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Shared header, or `None` for a leaf.
    pub fn header(&self) -> Option<&Header> {
        match self {
            Node::Leaf { .. } => None,
            Node::Node4 { header, .. }
            | Node::Node16 { header, .. }
            | Node::Node48 { header, .. }
            | Node::Node256 { header, .. } => Some(header),
        }
    }

    /// Mutable shared header, or `None` for a leaf.
    pub fn header_mut(&mut self) -> Option<&mut Header> {
        match self {
            Node::Leaf { .. } => None,
            Node::Node4 { header, .. }
            | Node::Node16 { header, .. }
            | Node::Node48 { header, .. }
            | Node::Node256 { header, .. } => Some(header),
        }
    }

    /// Inline (possibly truncated) prefix bytes, or empty for a leaf.
    pub fn prefix(&self) -> &[u8] {
        self.header().map(Header::capped_prefix).unwrap_or(&[])
    }

    /// Logical prefix length, or 0 for a leaf.
    pub fn prefix_len(&self) -> usize {
        self.header().map(|h| h.prefix_len as usize).unwrap_or(0)
    }

    /// Number of occupied children, or 0 for a leaf.
    pub fn num_children(&self) -> usize {
        self.header().map(|h| h.num_children as usize).unwrap_or(0)
    }

    /// True iff this variant cannot accept another child without growing.
    pub fn is_full(&self) -> bool {
        match self {
            Node::Leaf { .. } => false,
            Node::Node4 { header, .. } => header.num_children as usize >= 4,
            Node::Node16 { header, .. } => header.num_children as usize >= 16,
            Node::Node48 { header, .. } => header.num_children as usize >= 48,
            Node::Node256 { .. } => false,
        }
    }

    /// Find the child slot for a given key byte.
    pub fn find_child_slot(&self, byte: u8) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Node4 { keys, header, .. } => {
                (0..header.num_children as usize).find(|&i| keys[i] == byte)
            }
            Node::Node16 { keys, header, .. } => {
                (0..header.num_children as usize).find(|&i| keys[i] == byte)
            }
            Node::Node48 { index, .. } => {
                let slot = index[byte as usize];
                (slot != 0).then(|| slot as usize - 1)
            }
            Node::Node256 { children, .. } => children[byte as usize].is_some().then_some(byte as usize),
        }
    }

    /// Look up the child node for a given key byte.
    pub fn find_child(&self, byte: u8) -> Option<&Node> {
        match self {
            Node::Node4 { children, .. } => {
                self.find_child_slot(byte).and_then(|i| children[i].as_deref())
            }
            Node::Node16 { children, .. } => {
                self.find_child_slot(byte).and_then(|i| children[i].as_deref())
            }
            Node::Node48 { children, .. } => {
                self.find_child_slot(byte).and_then(|i| children[i].as_deref())
            }
            Node::Node256 { children, .. } => children[byte as usize].as_deref(),
            Node::Leaf { .. } => None,
        }
    }

    /// Add a child under `byte`. The caller must have ensured `byte` is not
    /// already present and that the node is not full (see [`Node::is_full`]).
    pub fn add_child(&mut self, byte: u8, child: Box<Node>) {
        match self {
            Node::Leaf { .. } => panic!("cannot add a child to a leaf"),

            Node::Node4 { header, keys, children } => {
                let n = header.num_children as usize;
                debug_assert!(n < 4, "Node4 is full, must grow before add_child");
                let mut i = 0;
                while i < n && keys[i] < byte {
                    i += 1;
                }
                for j in (i..n).rev() {
                    keys[j + 1] = keys[j];
                    children[j + 1] = children[j].take();
                }
                keys[i] = byte;
                children[i] = Some(child);
                header.num_children += 1;
            }

            Node::Node16 { header, keys, children } => {
                let n = header.num_children as usize;
                debug_assert!(n < 16, "Node16 is full, must grow before add_child");
                let mut i = 0;
                while i < n && keys[i] < byte {
                    i += 1;
                }
                for j in (i..n).rev() {
                    keys[j + 1] = keys[j];
                    children[j + 1] = children[j].take();
                }
                keys[i] = byte;
                children[i] = Some(child);
                header.num_children += 1;
            }

            Node::Node48 { header, index, children } => {
                debug_assert!(header.num_children as usize < 48, "Node48 is full, must grow before add_child");
                let slot = children
                    .iter()
                    .position(|c| c.is_none())
                    .expect("Node48 below capacity must have a free slot");
                children[slot] = Some(child);
                index[byte as usize] = (slot + 1) as u8;
                header.num_children += 1;
            }

            Node::Node256 { header, children } => {
                if children[byte as usize].is_none() {
                    header.num_children += 1;
                }
                children[byte as usize] = Some(child);
            }
        }
    }

    /// Remove and return the child under `byte`, if present.
    pub fn remove_child(&mut self, byte: u8) -> Option<Box<Node>> {
        match self {
            Node::Leaf { .. } => None,

            Node::Node4 { header, keys, children } => {
                let n = header.num_children as usize;
                let idx = (0..n).find(|&i| keys[i] == byte)?;
                let removed = children[idx].take();
                for j in idx..n - 1 {
                    keys[j] = keys[j + 1];
                    children[j] = children[j + 1].take();
                }
                header.num_children -= 1;
                removed
            }

            Node::Node16 { header, keys, children } => {
                let n = header.num_children as usize;
                let idx = (0..n).find(|&i| keys[i] == byte)?;
                let removed = children[idx].take();
                for j in idx..n - 1 {
                    keys[j] = keys[j + 1];
                    children[j] = children[j + 1].take();
                }
                header.num_children -= 1;
                removed
            }

            Node::Node48 { header, index, children } => {
                let slot = index[byte as usize];
                if slot == 0 {
                    return None;
                }
                index[byte as usize] = 0;
                header.num_children -= 1;
                children[slot as usize - 1].take()
            }

            Node::Node256 { header, children } => {
                let removed = children[byte as usize].take();
                if removed.is_some() {
                    header.num_children -= 1;
                }
                removed
            }
        }
    }

    /// The first child encountered in slot order, for recovering a
    /// representative descendant leaf.
    pub fn first_child(&self) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Node4 { children, .. } => children.iter().find_map(|c| c.as_deref()),
            Node::Node16 { children, .. } => children.iter().find_map(|c| c.as_deref()),
            Node::Node48 { children, .. } => children.iter().find_map(|c| c.as_deref()),
            Node::Node256 { children, .. } => children.iter().find_map(|c| c.as_deref()),
        }
    }

    /// Descend via [`Node::first_child`] until a leaf is reached, and return
    /// its key. Used to recover prefix bytes beyond `PREFIX_CAP` during
    /// pessimistic-prefix reconciliation (spec.md §9).
    ///
    /// Panics if called on an inner node with no children, which should never
    /// happen for a reachable node (an inner node loses its last child only
    /// by being collapsed away entirely, see [`super::tree`]).
    pub fn any_leaf_key(&self) -> &[u8] {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { key, .. } => return key,
                _ => {
                    node = node
                        .first_child()
                        .expect("reachable inner node must have at least one child")
                }
            }
        }
    }

    /// Grow this node to the next larger variant, carrying over header,
    /// prefix, and all children. Panics if called on a `Leaf` or `Node256`.
    pub fn grow(self) -> Box<Node> {
        match self {
            Node::Node4 { header, keys, children } => {
                let mut new_keys = [0u8; 16];
                new_keys[..4].copy_from_slice(&keys);
                let mut new_children: [Option<Box<Node>>; 16] = std::array::from_fn(|_| None);
                for (i, c) in children.into_iter().enumerate() {
                    new_children[i] = c;
                }
                Box::new(Node::Node16 {
                    header,
                    keys: new_keys,
                    children: new_children,
                })
            }

            Node::Node16 { header, keys, children } => {
                let n = header.num_children as usize;
                let mut index = Box::new([0u8; 256]);
                let mut new_children: Box<[Option<Box<Node>>; 48]> = Box::new(std::array::from_fn(|_| None));
                for (slot, (k, c)) in keys.into_iter().zip(children.into_iter()).take(n).enumerate() {
                    index[k as usize] = (slot + 1) as u8;
                    new_children[slot] = c;
                }
                Box::new(Node::Node48 {
                    header,
                    index,
                    children: new_children,
                })
            }

            Node::Node48 { header, index, children } => {
                let mut children = *children;
                let mut new_children: Box<[Option<Box<Node>>; 256]> = Box::new(std::array::from_fn(|_| None));
                for byte in 0..256usize {
                    let slot = index[byte];
                    if slot != 0 {
                        new_children[byte] = children[slot as usize - 1].take();
                    }
                }
                Box::new(Node::Node256 { header, children: new_children })
            }

            Node::Node256 { .. } | Node::Leaf { .. } => {
                panic!("grow called on a node with no larger variant")
            }
        }
    }

    /// Shrink this node to the next smaller variant, carrying over header,
    /// prefix, and all children. Caller must ensure occupancy fits the
    /// target variant's capacity. Panics if called on a `Leaf` or `Node4`.
    pub fn shrink(self) -> Box<Node> {
        match self {
            Node::Node256 { header, mut children } => {
                let mut index = Box::new([0u8; 256]);
                let mut new_children: Box<[Option<Box<Node>>; 48]> = Box::new(std::array::from_fn(|_| None));
                let mut slot = 0usize;
                for byte in 0..256usize {
                    if let Some(c) = children[byte].take() {
                        new_children[slot] = Some(c);
                        index[byte] = (slot + 1) as u8;
                        slot += 1;
                    }
                }
                Box::new(Node::Node48 { header, index, children: new_children })
            }

            Node::Node48 { header, index, mut children } => {
                let mut new_keys = [0u8; 16];
                let mut new_children: [Option<Box<Node>>; 16] = std::array::from_fn(|_| None);
                let mut slot = 0usize;
                for byte in 0..256usize {
                    let idx = index[byte];
                    if idx != 0 {
                        new_keys[slot] = byte as u8;
                        new_children[slot] = children[idx as usize - 1].take();
                        slot += 1;
                    }
                }
                Box::new(Node::Node16 {
                    header,
                    keys: new_keys,
                    children: new_children,
                })
            }

            Node::Node16 { header, keys, mut children } => {
                let mut new_keys = [0u8; 4];
                let n = (header.num_children as usize).min(4);
                new_keys[..n].copy_from_slice(&keys[..n]);
                let mut new_children: [Option<Box<Node>>; 4] = std::array::from_fn(|_| None);
                for i in 0..n {
                    new_children[i] = children[i].take();
                }
                Box::new(Node::Node4 {
                    header,
                    keys: new_keys,
                    children: new_children,
                })
            }

            Node::Node4 { .. } | Node::Leaf { .. } => {
                panic!("shrink called on a node with no smaller variant")
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf { key, value } => f
                .debug_struct("Leaf")
                .field("key", &String::from_utf8_lossy(key))
                .field("value_len", &value.len())
                .finish(),
            Node::Node4 { header, keys, .. } => f
                .debug_struct("Node4")
                .field("prefix", &String::from_utf8_lossy(header.capped_prefix()))
                .field("num_children", &header.num_children)
                .field("keys", &keys[..header.num_children as usize].to_vec())
                .finish(),
            Node::Node16 { header, keys, .. } => f
                .debug_struct("Node16")
                .field("prefix", &String::from_utf8_lossy(header.capped_prefix()))
                .field("num_children", &header.num_children)
                .field("keys", &keys[..header.num_children as usize].to_vec())
                .finish(),
            Node::Node48 { header, .. } => f
                .debug_struct("Node48")
                .field("prefix", &String::from_utf8_lossy(header.capped_prefix()))
                .field("num_children", &header.num_children)
                .finish(),
            Node::Node256 { header, .. } => f
                .debug_struct("Node256")
                .field("prefix", &String::from_utf8_lossy(header.capped_prefix()))
                .field("num_children", &header.num_children)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &[u8]) -> Box<Node> {
        Box::new(Node::new_leaf(key.to_vec(), key.to_vec()))
    }

    #[test]
    fn node4_add_keeps_sorted() {
        let mut n = Node::new_node4();
        n.add_child(b'c', leaf(b"c"));
        n.add_child(b'a', leaf(b"a"));
        n.add_child(b'b', leaf(b"b"));
        match &n {
            Node::Node4 { keys, header, .. } => {
                assert_eq!(&keys[..header.num_children as usize], b"abc");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn node4_grows_at_five_children() {
        let mut n = Node::new_node4();
        for b in [b'a', b'b', b'c', b'd'] {
            n.add_child(b, leaf(&[b]));
        }
        assert!(n.is_full());
        let mut n = *n.grow();
        assert_eq!(n.node_type(), NodeType::Node16);
        n.add_child(b'e', leaf(b"e"));
        assert_eq!(n.num_children(), 5);
        for b in [b'a', b'b', b'c', b'd', b'e'] {
            assert!(n.find_child(b).is_some());
        }
    }

    #[test]
    fn node48_one_based_index_roundtrip() {
        let mut n = Node::new_node48();
        for i in 0..20u8 {
            n.add_child(i, leaf(&[i]));
        }
        assert_eq!(n.num_children(), 20);
        for i in 0..20u8 {
            assert!(n.find_child(i).is_some());
        }
        assert!(n.find_child(250).is_none());
        n.remove_child(5);
        assert!(n.find_child(5).is_none());
        assert_eq!(n.num_children(), 19);
    }

    #[test]
    fn grow_chain_preserves_children() {
        let mut n = Node::new_node4();
        for i in 0..4u8 {
            n.add_child(i, leaf(&[i]));
        }
        let mut n = *n.grow(); // -> Node16
        for i in 4..16u8 {
            n.add_child(i, leaf(&[i]));
        }
        let mut n = *n.grow(); // -> Node48
        for i in 16..48u8 {
            n.add_child(i, leaf(&[i]));
        }
        let n = *n.grow(); // -> Node256
        assert_eq!(n.node_type(), NodeType::Node256);
        assert_eq!(n.num_children(), 48);
        for i in 0..48u8 {
            assert!(n.find_child(i).is_some());
        }
    }

    #[test]
    fn shrink_chain_preserves_children() {
        let mut n = Node::new_node256();
        for i in 0..48u8 {
            n.add_child(i, leaf(&[i]));
        }
        let mut n = *n.shrink(); // -> Node48, 48 children
        assert_eq!(n.node_type(), NodeType::Node48);
        for i in 16..48u8 {
            n.remove_child(i);
        }
        assert_eq!(n.num_children(), 16);
        let mut n = *n.shrink(); // -> Node16, 16 children fit exactly
        assert_eq!(n.node_type(), NodeType::Node16);
        for i in 0..16u8 {
            assert!(n.find_child(i).is_some());
        }
        for i in 4..16u8 {
            n.remove_child(i);
        }
        assert_eq!(n.num_children(), 4);
        let n = *n.shrink(); // -> Node4, 4 children fit exactly
        assert_eq!(n.node_type(), NodeType::Node4);
        for i in 0..4u8 {
            assert!(n.find_child(i).is_some());
        }
    }

    #[test]
    fn header_common_prefix_len_respects_bounds() {
        let mut h = Header::default();
        h.set_prefix(b"hello");
        assert_eq!(h.common_prefix_len(b"hello world", 0), 5);
        assert_eq!(h.common_prefix_len(b"help", 0), 3);
        assert_eq!(h.common_prefix_len(b"he", 0), 2);
    }

    #[test]
    fn header_set_prefix_truncates_inline_storage() {
        let mut h = Header::default();
        let long = b"0123456789abcdef";
        h.set_prefix(long);
        assert_eq!(h.prefix_len as usize, long.len());
        assert_eq!(h.capped_len(), PREFIX_CAP);
        assert_eq!(h.capped_prefix(), &long[..PREFIX_CAP]);
    }
}
