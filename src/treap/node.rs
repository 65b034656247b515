use crate::arena::Entry;

/// A struct representing an internal node of a treap.
///
/// A `None` parent means the node is the root and hangs off the header.
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub priority: u32,
    pub parent: Option<Entry>,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V, priority: u32) -> Self {
        Node {
            key,
            value,
            priority,
            parent: None,
            left: None,
            right: None,
        }
    }
}

/// The past-the-end anchor of a treap: the root slot and cached links to the minimum and maximum
/// nodes. All three are `None` exactly when the treap is empty.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Header {
    pub root: Option<Entry>,
    pub leftmost: Option<Entry>,
    pub rightmost: Option<Entry>,
}

/// A position inside a treap: either a node or the past-the-end position.
///
/// A position does not borrow its container. It stays valid across insertions and removals of
/// other keys and is invalidated only when its own key is erased. Positions of different containers
/// must not be mixed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Position(pub(crate) Option<Entry>);

impl Position {
    pub(crate) fn end() -> Self {
        Position(None)
    }

    /// Returns `true` if this is the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }
}
