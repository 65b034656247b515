use crate::alloc::{Allocator, ArenaAllocator};
use crate::compare::{Comparator, Natural};
use crate::priority::PriorityGenerator;
use crate::treap::map::{TreapMap, TreapMapIntoIter, TreapMapIter};
use crate::treap::node::Position;
use crate::treap::Result;
use std::fmt;
use std::iter::FromIterator;

/// An ordered set implemented by a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a key and a priority. The key of any node is greater than all keys in its left subtree
/// and less than all keys occuring in its right subtree. The priority of a node is greater than or
/// equal to the priority of its children. By randomly generating priorities, the expected height
/// of the tree is proportional to the logarithm of the number of keys.
///
/// # Examples
///
/// ```
/// use ordered_treap::treap::TreapSet;
///
/// let mut set = TreapSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct TreapSet<T, C = Natural, A: Allocator = ArenaAllocator> {
    map: TreapMap<T, (), C, A>,
}

impl<T> TreapSet<T> {
    /// Constructs a new, empty `TreapSet<T>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapSet;
    ///
    /// let set: TreapSet<u32> = TreapSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        TreapSet {
            map: TreapMap::new(),
        }
    }

    /// Constructs a new, empty `TreapSet<T>` with deterministic priorities.
    pub fn with_seed(seed: u64) -> Self {
        TreapSet {
            map: TreapMap::with_seed(seed),
        }
    }
}

impl<T, C> TreapSet<T, C> {
    /// Constructs a new, empty set ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        TreapSet {
            map: TreapMap::with_comparator(comparator),
        }
    }
}

impl<T, A: Allocator> TreapSet<T, Natural, A> {
    /// Constructs a new, empty set whose nodes are stored through `allocator`.
    pub fn with_allocator(allocator: A) -> Self {
        TreapSet {
            map: TreapMap::with_allocator(allocator),
        }
    }
}

impl<T, C, A: Allocator> TreapSet<T, C, A> {
    /// Constructs a new, empty set from its ordering rule, allocation strategy, and priority
    /// source.
    pub fn from_parts(comparator: C, allocator: A, priorities: PriorityGenerator) -> Self {
        TreapSet {
            map: TreapMap::from_parts(comparator, allocator, priorities),
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the allocation strategy the set was built with.
    pub fn allocator(&self) -> &A {
        self.map.allocator()
    }

    /// Returns the position of the smallest key, or `end()` if the set is empty.
    pub fn begin(&self) -> Position {
        self.map.begin()
    }

    /// Returns the past-the-end position.
    pub fn end(&self) -> Position {
        self.map.end()
    }

    /// Returns the position following `position` in key order.
    pub fn next(&self, position: Position) -> Position {
        self.map.next(position)
    }

    /// Returns the position preceding `position` in key order.
    pub fn prev(&self, position: Position) -> Position {
        self.map.prev(position)
    }

    /// Returns the key at `position`, or `None` for `end()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// let (position, _) = set.insert(5);
    /// assert_eq!(set.get_at(position), Some(&5));
    /// assert_eq!(set.get_at(set.end()), None);
    /// ```
    pub fn get_at(&self, position: Position) -> Option<&T> {
        self.map.key_at(position)
    }

    /// Removes the key at `position` and returns the position that followed it.
    ///
    /// # Panics
    ///
    /// Panics if `position` is `end()` or refers to an erased key.
    pub fn erase_at(&mut self, position: Position) -> Position {
        self.map.erase_at(position)
    }

    /// Removes every key from the set.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.map.height()
    }

    /// Returns the smallest key of the set, or `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.map.min()
    }

    /// Returns the largest key of the set, or `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.map.max()
    }

    /// Returns an iterator over the set that yields keys in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapSetIter<T, C, A> {
        TreapSetIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T, C: Comparator<T>, A: Allocator> TreapSet<T, C, A> {
    /// Inserts a key into the set unless an equivalent key is present. Returns the position of
    /// the new or existing key and whether an insertion happened.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.insert(1).1);
    /// assert!(!set.insert(1).1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> (Position, bool) {
        self.map.insert(key, ())
    }

    /// Inserts a key, using `hint` as the proposed position directly after it. An incorrect hint
    /// is ignored.
    pub fn insert_with_hint(&mut self, hint: Position, key: T) -> Position {
        self.map.insert_with_hint(hint, key, ())
    }

    /// Removes `key` from the set and returns the number of removed keys.
    pub fn erase(&mut self, key: &T) -> usize {
        self.map.erase(key)
    }

    /// Removes a key from the set. If the key exists in the set, it will return the key.
    /// Otherwise it will return `None`.
    pub fn remove(&mut self, key: &T) -> Option<T> {
        self.map.remove(key).map(|pair| pair.0)
    }

    /// Returns the position of `key`, or `end()` if the key is absent.
    pub fn find(&self, key: &T) -> Position {
        self.map.find(key)
    }

    /// Returns the position of the first key not less than `key`.
    pub fn lower_bound(&self, key: &T) -> Position {
        self.map.lower_bound(key)
    }

    /// Returns the position of the first key greater than `key`.
    pub fn upper_bound(&self, key: &T) -> Position {
        self.map.upper_bound(key)
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: &T) -> bool {
        self.map.contains(key)
    }

    /// Returns the smallest key greater than or equal to `key`, or `None` if there is none.
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.map.ceil(key)
    }

    /// Returns the largest key less than or equal to `key`, or `None` if there is none.
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.map.floor(key)
    }

    /// Checks the structural invariants of the underlying treap.
    pub fn validate(&self) -> Result<()> {
        self.map.validate()
    }
}

impl<T> Default for TreapSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone, A: Allocator + Clone> Clone for TreapSet<T, C, A> {
    fn clone(&self) -> Self {
        TreapSet {
            map: self.map.clone(),
        }
    }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for TreapSet<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, A: Allocator> PartialEq for TreapSet<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Eq, C, A: Allocator> Eq for TreapSet<T, C, A> {}

impl<T, C: Comparator<T>, A: Allocator> Extend<T> for TreapSet<T, C, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord> FromIterator<T> for TreapSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = TreapSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C, A: Allocator> IntoIterator for TreapSet<T, C, A> {
    type Item = T;
    type IntoIter = TreapSetIntoIter<T, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        TreapSetIntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T: 'a, C: 'a, A: Allocator + 'a> IntoIterator for &'a TreapSet<T, C, A> {
    type Item = &'a T;
    type IntoIter = TreapSetIter<'a, T, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapSet<T>`.
///
/// This iterator removes the keys of a treap in-order and yields them by value.
pub struct TreapSetIntoIter<T, C, A: Allocator> {
    map_iter: TreapMapIntoIter<T, (), C, A>,
}

impl<T, C, A: Allocator> Iterator for TreapSetIntoIter<T, C, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<T, C, A: Allocator> DoubleEndedIterator for TreapSetIntoIter<T, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|pair| pair.0)
    }
}

impl<T, C, A: Allocator> ExactSizeIterator for TreapSetIntoIter<T, C, A> {}

/// An iterator for `TreapSet<T>`.
///
/// This iterator traverses the keys of a treap in-order and yields immutable references.
pub struct TreapSetIter<'a, T, C, A: Allocator> {
    map_iter: TreapMapIter<'a, T, (), C, A>,
}

impl<'a, T, C, A: Allocator> Iterator for TreapSetIter<'a, T, C, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<'a, T, C, A: Allocator> DoubleEndedIterator for TreapSetIter<'a, T, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|pair| pair.0)
    }
}

impl<'a, T, C, A: Allocator> ExactSizeIterator for TreapSetIter<'a, T, C, A> {}
