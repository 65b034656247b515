//! Ordered set and map containers built on a treap with parent links and a past-the-end header.
//!
//! Keys are kept in a randomized binary search tree whose nodes live in an arena and refer to each
//! other by index. Lookups and updates take expected logarithmic time, and a `Position` into a
//! container can be stepped in both directions like a bidirectional iterator.
//!
//! # Examples
//!
//! ```
//! use ordered_treap::treap::TreapMap;
//!
//! let mut map = TreapMap::with_seed(1);
//! for key in &[5, 1, 3] {
//!     map.insert(*key, key * 10);
//! }
//!
//! let mut position = map.lower_bound(&2);
//! assert_eq!(map.get_at(position), Some((&3, &30)));
//! position = map.next(position);
//! assert_eq!(map.get_at(position), Some((&5, &50)));
//! assert_eq!(map.next(position), map.end());
//! ```

pub mod alloc;
pub mod arena;
pub mod compare;
pub mod priority;
pub mod stats;
pub mod treap;
