use crate::alloc::{Allocator, ArenaAllocator};
use crate::compare::{Comparator, Natural};
use crate::priority::PriorityGenerator;
use crate::treap::node::{Node, Position};
use crate::treap::tree::Tree;
use crate::treap::Result;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;

/// An ordered map implemented by a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a key, a value, and a priority. The key of any node is greater than all keys in its
/// left subtree and less than all keys occuring in its right subtree. The priority of a node is
/// greater than or equal to the priority of its children. By randomly generating priorities, the
/// expected height of the tree is proportional to the logarithm of the number of keys.
///
/// Positions returned by the map behave like bidirectional iterators: they can be stepped with
/// `next` and `prev`, dereferenced with `get_at`, and stay valid until their own key is erased.
///
/// # Examples
///
/// ```
/// use ordered_treap::treap::TreapMap;
///
/// let mut map = TreapMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// *map.get_mut(&0).unwrap() = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct TreapMap<K, V, C = Natural, A: Allocator = ArenaAllocator> {
    tree: Tree<K, V, C, A>,
}

impl<K, V> TreapMap<K, V> {
    /// Constructs a new, empty `TreapMap<K, V>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let map: TreapMap<u32, u32> = TreapMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::from_parts(Natural, ArenaAllocator::default(), PriorityGenerator::new())
    }

    /// Constructs a new, empty `TreapMap<K, V>` whose priorities are drawn from a deterministic
    /// generator, so the same operations always build the same tree.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(
            Natural,
            ArenaAllocator::default(),
            PriorityGenerator::with_seed(seed),
        )
    }
}

impl<K, V, C> TreapMap<K, V, C> {
    /// Constructs a new, empty map ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_parts(comparator, ArenaAllocator::default(), PriorityGenerator::new())
    }
}

impl<K, V, A: Allocator> TreapMap<K, V, Natural, A> {
    /// Constructs a new, empty map whose nodes are stored through `allocator`.
    pub fn with_allocator(allocator: A) -> Self {
        Self::from_parts(Natural, allocator, PriorityGenerator::new())
    }
}

impl<K, V, C, A: Allocator> TreapMap<K, V, C, A> {
    /// Constructs a new, empty map from its ordering rule, allocation strategy, and priority
    /// source.
    pub fn from_parts(comparator: C, allocator: A, priorities: PriorityGenerator) -> Self {
        TreapMap {
            tree: Tree::new(comparator, allocator, priorities),
        }
    }

    /// Returns the number of key-value pairs in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.begin() == self.end()
    }

    /// Returns the allocation strategy the map was built with.
    pub fn allocator(&self) -> &A {
        self.tree.allocator()
    }

    /// Returns the storage the allocation strategy produced for this map's nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::alloc::DebugAllocator;
    /// use ordered_treap::compare::Natural;
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map: TreapMap<u32, u32, Natural, DebugAllocator> =
    ///     TreapMap::with_allocator(DebugAllocator::default());
    /// map.insert(1, 1);
    /// map.insert(1, 2);
    /// assert_eq!(map.node_pool().allocations(), 1);
    /// ```
    pub fn node_pool(&self) -> &A::Pool<Node<K, V>> {
        self.tree.pool()
    }

    /// Returns the ordering rule of the map.
    pub fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    /// Returns the position of the smallest key, or `end()` if the map is empty.
    pub fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// Returns the past-the-end position.
    pub fn end(&self) -> Position {
        Position::end()
    }

    /// Returns the position following `position` in key order. The position following `end()` is
    /// `begin()`.
    ///
    /// # Panics
    ///
    /// Panics if `position` refers to an erased key.
    pub fn next(&self, position: Position) -> Position {
        self.tree.next(position)
    }

    /// Returns the position preceding `position` in key order. The position preceding `end()` is
    /// the largest key, and the position preceding `begin()` is `end()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let last = map.prev(map.end());
    /// assert_eq!(map.get_at(last), Some((&2, &"b")));
    /// assert_eq!(map.prev(map.begin()), map.end());
    /// ```
    pub fn prev(&self, position: Position) -> Position {
        self.tree.prev(position)
    }

    /// Returns the key-value pair at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `position` refers to an erased key.
    pub fn get_at(&self, position: Position) -> Option<(&K, &V)> {
        position.0.map(|entry| {
            let node = self.tree.node(entry);
            (&node.key, &node.value)
        })
    }

    /// Returns the key at `position`, or `None` for `end()`.
    pub fn key_at(&self, position: Position) -> Option<&K> {
        self.get_at(position).map(|(key, _)| key)
    }

    /// Returns a mutable reference to the value at `position`, or `None` for `end()`. Keys are
    /// never exposed mutably.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// let (position, _) = map.insert(3, 0);
    /// *map.value_at_mut(position).unwrap() = 42;
    /// assert_eq!(map.get(&3), Some(&42));
    /// ```
    pub fn value_at_mut(&mut self, position: Position) -> Option<&mut V> {
        match position.0 {
            Some(entry) => Some(&mut self.tree.node_mut(entry).value),
            None => None,
        }
    }

    /// Removes the key-value pair at `position` and returns the position that followed it.
    ///
    /// # Panics
    ///
    /// Panics if `position` is `end()` or refers to an erased key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// for key in 0..3 {
    ///     map.insert(key, key);
    /// }
    /// let mut position = map.begin();
    /// while position != map.end() {
    ///     position = map.erase_at(position);
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn erase_at(&mut self, position: Position) -> Position {
        let (next, _, _) = self.tree.remove_at(position);
        next
    }

    /// Removes every key-value pair from the map.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the smallest key of the map, or `None` if the map is empty.
    pub fn min(&self) -> Option<&K> {
        self.key_at(self.begin())
    }

    /// Returns the largest key of the map, or `None` if the map is empty.
    pub fn max(&self) -> Option<&K> {
        self.key_at(self.tree.last())
    }

    /// Returns an iterator over the map that yields key-value pairs in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next_back(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapMapIter<K, V, C, A> {
        TreapMapIter {
            map: self,
            front: self.begin(),
            back: self.tree.last(),
            remaining: self.len(),
        }
    }

    /// Returns an iterator over the keys of the map in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values of the map in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> TreapMap<K, V, C, A> {
    /// Inserts a key-value pair into the map. If an equivalent key already exists, the map is left
    /// untouched. Returns the position of the new or existing key and whether an insertion
    /// happened.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// let (position, inserted) = map.insert(1, 1);
    /// assert!(inserted);
    /// assert_eq!(map.insert(1, 2), (position, false));
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert(key, value)
    }

    /// Inserts a key-value pair, using `hint` as the proposed position directly after the key.
    /// A correct hint saves the search for the attachment point; an incorrect one is ignored.
    /// `end()` is a correct hint for a key larger than every key in the map. Returns the position
    /// of the new key, or of the equivalent key that prevented the insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// for key in 0..10 {
    ///     let end = map.end();
    ///     map.insert_with_hint(end, key, key * key);
    /// }
    /// assert_eq!(map.get(&9), Some(&81));
    /// ```
    pub fn insert_with_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        self.tree.insert_with_hint(hint, key, value)
    }

    /// Removes the key-value pair for `key`. Returns the number of removed pairs, which is zero
    /// if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.erase(&1), 1);
    /// assert_eq!(map.erase(&1), 0);
    /// ```
    pub fn erase(&mut self, key: &K) -> usize {
        self.tree.erase(key)
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let position = self.find(key);
        if position.is_end() {
            return None;
        }
        let (_, key, value) = self.tree.remove_at(position);
        Some((key, value))
    }

    /// Returns the position of `key`, or `end()` if the key is absent.
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// Returns the position of the first key not less than `key`, or `end()` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.key_at(map.lower_bound(&2)), Some(&3));
    /// assert_eq!(map.key_at(map.lower_bound(&3)), Some(&3));
    /// assert_eq!(map.lower_bound(&4), map.end());
    /// ```
    pub fn lower_bound(&self, key: &K) -> Position {
        self.tree.lower_bound(key)
    }

    /// Returns the position of the first key greater than `key`, or `end()` if there is none.
    pub fn upper_bound(&self, key: &K) -> Position {
        self.tree.upper_bound(key)
    }

    /// Checks if a key exists in the map.
    pub fn contains(&self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// Returns an immutable reference to the value associated with `key`, or `None` if the key is
    /// absent.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_at(self.find(key)).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value associated with `key`, or `None` if the key is
    /// absent.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let position = self.find(key);
        self.value_at_mut(position)
    }

    /// Returns the smallest key greater than or equal to `key`, or `None` if there is none.
    pub fn ceil(&self, key: &K) -> Option<&K> {
        self.key_at(self.lower_bound(key))
    }

    /// Returns the largest key less than or equal to `key`, or `None` if there is none.
    pub fn floor(&self, key: &K) -> Option<&K> {
        let position = self.upper_bound(key);
        if position == self.begin() {
            return None;
        }
        self.key_at(self.prev(position))
    }

    /// Checks the structural invariants of the underlying treap.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }
}

impl<K, V: Default, C: Comparator<K>, A: Allocator> TreapMap<K, V, C, A> {
    /// Returns a mutable reference to the value of `key`, inserting `V::default()` first if the key
    /// is absent. The key is searched for only once.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_treap::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// *map.get_or_insert_default("a") += 1;
    /// *map.get_or_insert_default("a") += 1;
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V {
        let mut position = self.lower_bound(&key);
        let found = match self.key_at(position) {
            Some(existing) => !self.comparator().less(&key, existing),
            None => false,
        };
        if !found {
            position = self.tree.insert_before(position, key, V::default());
        }
        match self.value_at_mut(position) {
            Some(value) => value,
            None => unreachable!(),
        }
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> Index<&K> for TreapMap<K, V, C, A> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is absent.
    fn index(&self, key: &K) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<K, V> Default for TreapMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for TreapMap<K, V, C, A> {
    fn clone(&self) -> Self {
        TreapMap {
            tree: self.tree.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for TreapMap<K, V, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C, A: Allocator> PartialEq for TreapMap<K, V, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C, A: Allocator> Eq for TreapMap<K, V, C, A> {}

impl<K, V, C: Comparator<K>, A: Allocator> Extend<(K, V)> for TreapMap<K, V, C, A> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreapMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreapMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C, A: Allocator> IntoIterator for TreapMap<K, V, C, A> {
    type Item = (K, V);
    type IntoIter = TreapMapIntoIter<K, V, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        TreapMapIntoIter { map: self }
    }
}

impl<'a, K: 'a, V: 'a, C: 'a, A: Allocator + 'a> IntoIterator for &'a TreapMap<K, V, C, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = TreapMapIter<'a, K, V, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapMap<K, V>`.
///
/// This iterator removes the elements of a treap in-order and yields them by value.
pub struct TreapMapIntoIter<K, V, C, A: Allocator> {
    map: TreapMap<K, V, C, A>,
}

impl<K, V, C, A: Allocator> Iterator for TreapMapIntoIter<K, V, C, A> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.map.begin();
        if first.is_end() {
            return None;
        }
        let (_, key, value) = self.map.tree.remove_at(first);
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<K, V, C, A: Allocator> DoubleEndedIterator for TreapMapIntoIter<K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let last = self.map.tree.last();
        if last.is_end() {
            return None;
        }
        let (_, key, value) = self.map.tree.remove_at(last);
        Some((key, value))
    }
}

impl<K, V, C, A: Allocator> ExactSizeIterator for TreapMapIntoIter<K, V, C, A> {}

/// An iterator for `TreapMap<K, V>`.
///
/// This iterator walks the treap through parent links, in-order from both ends, and yields
/// immutable references.
pub struct TreapMapIter<'a, K, V, C, A: Allocator> {
    map: &'a TreapMap<K, V, C, A>,
    front: Position,
    back: Position,
    remaining: usize,
}

impl<'a, K, V, C, A: Allocator> Iterator for TreapMapIter<'a, K, V, C, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let map = self.map;
        let ret = map.get_at(self.front);
        self.front = map.next(self.front);
        self.remaining -= 1;
        ret
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C, A: Allocator> DoubleEndedIterator for TreapMapIter<'a, K, V, C, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let map = self.map;
        let ret = map.get_at(self.back);
        self.back = map.prev(self.back);
        self.remaining -= 1;
        ret
    }
}

impl<'a, K, V, C, A: Allocator> ExactSizeIterator for TreapMapIter<'a, K, V, C, A> {}

#[cfg(test)]
mod tests {
    use super::TreapMap;
    use crate::compare::Reverse;

    #[test]
    fn test_len_empty() {
        let map: TreapMap<u32, u32> = TreapMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.begin(), map.end());
    }

    #[test]
    fn test_min_max_empty() {
        let map: TreapMap<u32, u32> = TreapMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = TreapMap::new();
        let (position, inserted) = map.insert(1, 1);
        assert!(inserted);
        assert!(map.contains(&1));
        assert_eq!(map.get_at(position), Some((&1, &1)));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_same_key_keeps_value() {
        let mut map = TreapMap::new();
        let (first, _) = map.insert(1, 2);
        let (second, inserted) = map.insert(1, 3);
        assert!(!inserted);
        assert_eq!(first, second);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&2));
    }

    #[test]
    fn test_find_is_stable_across_inserts() {
        let mut map = TreapMap::new();
        map.insert(1, 2);
        let before = map.find(&1);
        map.insert(2, 3);
        assert_eq!(map.find(&1), before);
    }

    #[test]
    fn test_find_missing() {
        let map: TreapMap<u32, u32> = TreapMap::new();
        assert_eq!(map.find(&42), map.end());
        assert_eq!(map.get_at(map.end()), None);
    }

    #[test]
    fn test_remove() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        let ret = map.remove(&1);
        assert!(!map.contains(&1));
        assert_eq!(ret, Some((1, 1)));
        assert_eq!(map.begin(), map.end());
    }

    #[test]
    fn test_min_max() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_get_mut() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_value_at_mut() {
        let mut map = TreapMap::new();
        for key in 0..10 {
            map.insert(key, 0);
        }
        let position = map.find(&3);
        *map.value_at_mut(position).unwrap() = 42;
        assert_eq!(map.find(&3), position);
        assert_eq!(map.get(&3), Some(&42));
        assert_eq!(map.len(), 10);
        assert_eq!(map.value_at_mut(map.end()), None);
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&5), Some(&5));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_bounds() {
        let mut map = TreapMap::new();
        for key in (1..10).step_by(2) {
            map.insert(key, 0);
        }
        assert_eq!(map.key_at(map.lower_bound(&4)), Some(&5));
        assert_eq!(map.key_at(map.upper_bound(&5)), Some(&7));
        assert_eq!(map.lower_bound(&10), map.end());
        assert_eq!(map.upper_bound(&9), map.end());
    }

    #[test]
    fn test_index() {
        let mut map = TreapMap::new();
        for key in 0..10 {
            map.insert(key, 2 * key);
        }
        for key in 0..10 {
            assert_eq!(map[&key], 2 * key);
        }
    }

    #[test]
    #[should_panic]
    fn test_index_missing() {
        let map: TreapMap<u32, u32> = TreapMap::new();
        assert_eq!(map[&0], 0);
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map: TreapMap<u32, u32> = TreapMap::new();
        *map.get_or_insert_default(0) = 123;
        assert_eq!(map.get(&0), Some(&123));
        assert_eq!(map.len(), 1);
        assert_eq!(*map.get_or_insert_default(0), 123);
        *map.get_or_insert_default(0) = 1;
        assert_eq!(map.get(&0), Some(&1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_get_or_insert_default_between_keys() {
        let mut map: TreapMap<u32, u32> = TreapMap::with_seed(4);
        for key in (0..100).step_by(2) {
            map.insert(key, key);
        }
        for key in (1..100).step_by(2) {
            *map.get_or_insert_default(key) += key;
        }
        assert_eq!(map.len(), 100);
        assert!(map.iter().all(|(key, value)| key == value));
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_erase_at_returns_next() {
        let mut map = TreapMap::new();
        for key in 0..10 {
            map.insert(key, 0);
        }
        let mut position = map.begin();
        let mut key = 0;
        while position != map.end() {
            assert_eq!(map.key_at(position), Some(&key));
            position = map.erase_at(position);
            key += 1;
            assert_eq!(position, map.find(&key));
            if key < 10 {
                assert_eq!(map.prev(map.next(position)), position);
            }
        }
        assert!(map.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_erase_at_end() {
        let mut map: TreapMap<u32, u32> = TreapMap::new();
        let end = map.end();
        map.erase_at(end);
    }

    #[test]
    fn test_steps_wrap_through_end() {
        let mut map = TreapMap::new();
        for key in 0..3 {
            map.insert(key, key);
        }
        assert_eq!(map.next(map.end()), map.begin());
        assert_eq!(map.prev(map.begin()), map.end());
        assert_eq!(map.next(map.find(&2)), map.end());
        assert_eq!(map.prev(map.end()), map.find(&2));
    }

    #[test]
    fn test_reverse_comparator() {
        let mut map = TreapMap::with_comparator(Reverse);
        for key in 0..5 {
            map.insert(key, key);
        }
        assert_eq!(map.keys().cloned().collect::<Vec<u32>>(), vec![4, 3, 2, 1, 0]);
        assert_eq!(map.key_at(map.lower_bound(&10)), Some(&4));
        assert_eq!(map.upper_bound(&0), map.end());
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_into_iter() {
        let mut map = TreapMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_into_iter_rev() {
        let map: TreapMap<u32, u32> = (0..5).map(|key| (key, key)).collect();
        assert_eq!(
            map.into_iter().rev().map(|(key, _)| key).collect::<Vec<u32>>(),
            vec![4, 3, 2, 1, 0],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = TreapMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
        assert_eq!(
            map.iter().rev().collect::<Vec<(&u32, &u32)>>(),
            vec![(&5, &6), (&3, &4), (&1, &2)],
        );
        assert_eq!(map.iter().len(), 3);
    }

    #[test]
    fn test_iter_both_ends_meet() {
        let map: TreapMap<u32, u32> = (0..4).map(|key| (key, key)).collect();
        let mut iter = map.iter();
        assert_eq!(iter.next(), Some((&0, &0)));
        assert_eq!(iter.next_back(), Some((&3, &3)));
        assert_eq!(iter.next(), Some((&1, &1)));
        assert_eq!(iter.next_back(), Some((&2, &2)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_clone_and_eq() {
        let map: TreapMap<u32, String> = (0..20).map(|key| (key, key.to_string())).collect();
        let mut copy = map.clone();
        assert_eq!(copy, map);
        assert_eq!(copy.height(), map.height());
        copy.erase(&0);
        assert_ne!(copy, map);
        assert_eq!(map.len(), 20);
    }

    #[test]
    fn test_debug() {
        let map: TreapMap<u32, u32> = vec![(2, 3), (1, 2)].into_iter().collect();
        assert_eq!(format!("{:?}", map), "{1: 2, 2: 3}");
    }
}
