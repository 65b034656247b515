//! Ordered containers implemented by a treap with parent links.
//!
//! A treap is a binary search tree in which every node also carries a random priority, and the
//! priorities are kept in max-heap order by rotations. With independently random priorities the
//! expected height of the tree is logarithmic in the number of keys, whatever the insertion order.
//!
//! Every node knows its parent, and a header keeps the root together with the minimum and maximum
//! nodes, so a `Position` can be stepped forwards and backwards in constant amortized time without
//! any auxiliary stack.

mod map;
mod node;
mod set;
mod tree;

pub use self::map::{TreapMap, TreapMapIntoIter, TreapMapIter};
pub use self::node::Position;
pub use self::set::{TreapSet, TreapSetIntoIter, TreapSetIter};

use std::error;
use std::fmt;
use std::result;

/// A structural inconsistency found by `validate`.
///
/// Any of these indicates a bug in the treap itself, never a condition caused by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A node is linked to itself as a parent or child.
    SelfLink,
    /// A child's parent link does not point back at the node that owns it.
    ParentMismatch,
    /// The in-order key sequence is not strictly increasing.
    OrderViolation,
    /// A child has a higher priority than its parent.
    HeapViolation,
    /// The header's root, minimum or maximum link is wrong.
    SentinelMismatch,
    /// The recorded length differs from the number of reachable nodes.
    SizeMismatch,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Error::SelfLink => "node is linked to itself",
            Error::ParentMismatch => "child does not link back to its parent",
            Error::OrderViolation => "keys are out of order",
            Error::HeapViolation => "child priority exceeds parent priority",
            Error::SentinelMismatch => "header links are inconsistent",
            Error::SizeMismatch => "length does not match the number of nodes",
        };
        write!(f, "{}", message)
    }
}

pub type Result<T> = result::Result<T, Error>;
