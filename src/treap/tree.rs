use crate::alloc::{Allocator, NodePool};
use crate::arena::Entry;
use crate::compare::Comparator;
use crate::priority::PriorityGenerator;
use crate::treap::node::{Header, Node, Position};
use crate::treap::{Error, Result};
use log::trace;
use std::vec::Vec;

/// The treap engine shared by `TreapMap` and `TreapSet`.
pub struct Tree<K, V, C, A: Allocator> {
    nodes: A::Pool<Node<K, V>>,
    header: Header,
    len: usize,
    priorities: PriorityGenerator,
    comparator: C,
    allocator: A,
}

impl<K, V, C, A: Allocator> Tree<K, V, C, A> {
    pub fn new(comparator: C, allocator: A, priorities: PriorityGenerator) -> Self {
        Tree {
            nodes: allocator.bind(),
            header: Header::default(),
            len: 0,
            priorities,
            comparator,
            allocator,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn pool(&self) -> &A::Pool<Node<K, V>> {
        &self.nodes
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn node(&self, entry: Entry) -> &Node<K, V> {
        self.nodes
            .get(&entry)
            .expect("Error: position refers to an erased node.")
    }

    pub fn node_mut(&mut self, entry: Entry) -> &mut Node<K, V> {
        self.nodes
            .get_mut(&entry)
            .expect("Error: position refers to an erased node.")
    }

    pub fn begin(&self) -> Position {
        Position(self.header.leftmost)
    }

    pub fn last(&self) -> Position {
        Position(self.header.rightmost)
    }

    fn leftmost_in(&self, mut entry: Entry) -> Entry {
        while let Some(left) = self.node(entry).left {
            entry = left;
        }
        entry
    }

    fn rightmost_in(&self, mut entry: Entry) -> Entry {
        while let Some(right) = self.node(entry).right {
            entry = right;
        }
        entry
    }

    fn successor(&self, entry: Entry) -> Option<Entry> {
        if let Some(right) = self.node(entry).right {
            return Some(self.leftmost_in(right));
        }
        let mut curr = entry;
        while let Some(parent) = self.node(curr).parent {
            if self.node(parent).right != Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    fn predecessor(&self, entry: Entry) -> Option<Entry> {
        if let Some(left) = self.node(entry).left {
            return Some(self.rightmost_in(left));
        }
        let mut curr = entry;
        while let Some(parent) = self.node(curr).parent {
            if self.node(parent).left != Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Steps forwards in key order. The past-the-end position is followed by the first position.
    pub fn next(&self, position: Position) -> Position {
        match position.0 {
            Some(entry) => Position(self.successor(entry)),
            None => Position(self.header.leftmost),
        }
    }

    /// Steps backwards in key order. The past-the-end position is preceded by the last position,
    /// and the first position by the past-the-end position.
    pub fn prev(&self, position: Position) -> Position {
        match position.0 {
            Some(entry) => Position(self.predecessor(entry)),
            None => Position(self.header.rightmost),
        }
    }

    fn set_left(&mut self, parent: Entry, child: Option<Entry>) {
        debug_assert_ne!(Some(parent), child);
        self.node_mut(parent).left = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    fn set_right(&mut self, parent: Entry, child: Option<Entry>) {
        debug_assert_ne!(Some(parent), child);
        self.node_mut(parent).right = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    // Puts `new` into the slot `old` occupies under `parent`, or into the root slot.
    fn replace_child(&mut self, parent: Option<Entry>, old: Entry, new: Option<Entry>) {
        match parent {
            None => {
                debug_assert_eq!(self.header.root, Some(old));
                self.header.root = new;
            }
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    debug_assert_eq!(node.right, Some(old));
                    node.right = new;
                }
            }
        }
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
    }

    // Lifts the left child of `parent` into its place.
    fn rotate_right(&mut self, parent: Entry) {
        let child = self
            .node(parent)
            .left
            .expect("Error: right rotation without a left child.");
        let grandparent = self.node(parent).parent;
        let crossing = self.node(child).right;
        self.set_left(parent, crossing);
        self.replace_child(grandparent, parent, Some(child));
        self.set_right(child, Some(parent));
    }

    // Lifts the right child of `parent` into its place.
    fn rotate_left(&mut self, parent: Entry) {
        let child = self
            .node(parent)
            .right
            .expect("Error: left rotation without a right child.");
        let grandparent = self.node(parent).parent;
        let crossing = self.node(child).left;
        self.set_right(parent, crossing);
        self.replace_child(grandparent, parent, Some(child));
        self.set_left(child, Some(parent));
    }

    // Joins two treaps where every key of `left` is less than every key of `right`. The returned
    // root's parent link is left for the caller to set.
    fn merge(&mut self, left: Option<Entry>, right: Option<Entry>) -> Option<Entry> {
        let (left, right) = match (left, right) {
            (Some(left), Some(right)) => (left, right),
            (tree, None) | (None, tree) => return tree,
        };
        if self.node(left).priority < self.node(right).priority {
            let right_left = self.node(right).left;
            let merged = self.merge(Some(left), right_left);
            self.set_left(right, merged);
            Some(right)
        } else {
            let left_right = self.node(left).right;
            let merged = self.merge(left_right, Some(right));
            self.set_right(left, merged);
            Some(left)
        }
    }

    /// Creates a node directly before `successor` (or at the end) and restores heap order. The
    /// caller guarantees that the key fits between the predecessor of `successor` and `successor`.
    pub fn insert_before(&mut self, successor: Position, key: K, value: V) -> Position {
        let becomes_first = successor.0 == self.header.leftmost;
        let becomes_last = successor.is_end();

        let priority = self.priorities.next_priority();
        let entry = self.nodes.allocate(Node::new(key, value, priority));
        self.len += 1;

        if self.header.root.is_none() {
            self.header = Header {
                root: Some(entry),
                leftmost: Some(entry),
                rightmost: Some(entry),
            };
            return Position(Some(entry));
        }

        match successor.0 {
            Some(next) if self.node(next).left.is_none() => self.set_left(next, Some(entry)),
            _ => {
                let parent = match successor.0 {
                    Some(next) => self.predecessor(next),
                    None => self.header.rightmost,
                }
                .expect("Error: non-empty treap without a predecessor slot.");
                debug_assert!(self.node(parent).right.is_none());
                self.set_right(parent, Some(entry));
            }
        }

        while let Some(parent) = self.node(entry).parent {
            if self.node(parent).priority >= priority {
                break;
            }
            if self.node(parent).left == Some(entry) {
                self.rotate_right(parent);
            } else {
                self.rotate_left(parent);
            }
        }

        if becomes_first {
            self.header.leftmost = Some(entry);
        }
        if becomes_last {
            self.header.rightmost = Some(entry);
        }
        Position(Some(entry))
    }

    /// Unlinks and frees the node at `position`, returning the following position together with
    /// the stored key and value.
    ///
    /// # Panics
    ///
    /// Panics if `position` is the past-the-end position or refers to an erased node.
    pub fn remove_at(&mut self, position: Position) -> (Position, K, V) {
        let entry = position
            .0
            .expect("Error: attempting to erase the past-the-end position.");
        let next = self.successor(entry);
        if self.header.leftmost == Some(entry) {
            self.header.leftmost = next;
        }
        if self.header.rightmost == Some(entry) {
            self.header.rightmost = self.predecessor(entry);
        }

        let (parent, left, right) = {
            let node = self.node_mut(entry);
            (node.parent, node.left.take(), node.right.take())
        };
        let merged = self.merge(left, right);
        self.replace_child(parent, entry, merged);

        let Node { key, value, .. } = self.nodes.free(&entry);
        self.len -= 1;
        (Position(next), key, value)
    }

    /// Frees every node, walking the tree with an explicit stack.
    pub fn clear(&mut self) {
        let mut stack: Vec<Entry> = self.header.root.into_iter().collect();
        let mut freed = 0;
        while let Some(entry) = stack.pop() {
            let node = self.nodes.free(&entry);
            stack.extend(node.left);
            stack.extend(node.right);
            freed += 1;
        }
        if freed > 0 {
            trace!("cleared treap of {} nodes", freed);
        }
        self.header = Header::default();
        self.len = 0;
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut stack: Vec<(Entry, usize)> =
            self.header.root.map(|root| (root, 1)).into_iter().collect();
        let mut height = 0;
        while let Some((entry, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(entry);
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }
}

impl<K, V, C: Comparator<K>, A: Allocator> Tree<K, V, C, A> {
    fn less(&self, a: &K, b: &K) -> bool {
        self.comparator.less(a, b)
    }

    /// Returns the first position whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        let mut curr = self.header.root;
        let mut res = None;
        while let Some(entry) = curr {
            let node = self.node(entry);
            if !self.less(&node.key, key) {
                res = Some(entry);
                curr = node.left;
            } else {
                curr = node.right;
            }
        }
        Position(res)
    }

    /// Returns the first position whose key is greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        let mut curr = self.header.root;
        let mut res = None;
        while let Some(entry) = curr {
            let node = self.node(entry);
            if self.less(key, &node.key) {
                res = Some(entry);
                curr = node.left;
            } else {
                curr = node.right;
            }
        }
        Position(res)
    }

    // `position` must be a lower bound of `key`.
    fn holds(&self, position: Position, key: &K) -> bool {
        match position.0 {
            Some(entry) => !self.less(key, &self.node(entry).key),
            None => false,
        }
    }

    pub fn find(&self, key: &K) -> Position {
        let position = self.lower_bound(key);
        if self.holds(position, key) {
            position
        } else {
            Position::end()
        }
    }

    /// Inserts a key-value pair unless an equivalent key is present. Returns the position of the
    /// new or existing key and whether an insertion happened.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let position = self.lower_bound(&key);
        if self.holds(position, &key) {
            return (position, false);
        }
        (self.insert_before(position, key, value), true)
    }

    /// Inserts a key-value pair using `hint` as the proposed successor of the key. A hint that
    /// does not directly follow the key is ignored.
    pub fn insert_with_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        if self.is_valid_hint(hint, &key) {
            return self.insert_before(hint, key, value);
        }
        let (position, _) = self.insert(key, value);
        position
    }

    fn is_valid_hint(&self, hint: Position, key: &K) -> bool {
        match hint.0 {
            Some(entry) => {
                self.less(key, &self.node(entry).key)
                    && match self.predecessor(entry) {
                        Some(prev) => self.less(&self.node(prev).key, key),
                        None => true,
                    }
            }
            None => match self.header.rightmost {
                Some(last) => self.less(&self.node(last).key, key),
                None => true,
            },
        }
    }

    /// Erases the node holding `key`, if any, and returns the number of erased nodes.
    pub fn erase(&mut self, key: &K) -> usize {
        let position = self.find(key);
        if position.is_end() {
            return 0;
        }
        self.remove_at(position);
        1
    }

    /// Checks every structural invariant of the treap.
    pub fn validate(&self) -> Result<()> {
        let header = self.header;
        match header.root {
            None => {
                if header.leftmost.is_some() || header.rightmost.is_some() {
                    return Err(Error::SentinelMismatch);
                }
                if self.len != 0 || !self.nodes.is_empty() {
                    return Err(Error::SizeMismatch);
                }
                return Ok(());
            }
            Some(root) => {
                if self.nodes.get(&root).map(|node| node.parent) != Some(None) {
                    return Err(Error::SentinelMismatch);
                }
            }
        }

        let mut stack = Vec::new();
        let mut curr = header.root;
        let mut prev: Option<Entry> = None;
        let mut first = None;
        let mut count = 0;
        loop {
            while let Some(entry) = curr {
                let node = self.nodes.get(&entry).ok_or(Error::ParentMismatch)?;
                for child in node.left.iter().chain(node.right.iter()) {
                    if *child == entry {
                        return Err(Error::SelfLink);
                    }
                    let child_node = self.nodes.get(child).ok_or(Error::ParentMismatch)?;
                    if child_node.parent != Some(entry) {
                        return Err(Error::ParentMismatch);
                    }
                    if child_node.priority > node.priority {
                        return Err(Error::HeapViolation);
                    }
                }
                if node.parent == Some(entry) {
                    return Err(Error::SelfLink);
                }
                stack.push(entry);
                curr = node.left;
            }
            let entry = match stack.pop() {
                Some(entry) => entry,
                None => break,
            };
            count += 1;
            if count > self.nodes.len() {
                return Err(Error::SizeMismatch);
            }
            if let Some(prev) = prev {
                if !self.less(&self.node(prev).key, &self.node(entry).key) {
                    return Err(Error::OrderViolation);
                }
            }
            first = first.or(Some(entry));
            prev = Some(entry);
            curr = self.node(entry).right;
        }

        if header.leftmost != first || header.rightmost != prev {
            return Err(Error::SentinelMismatch);
        }
        if count != self.len || count != self.nodes.len() {
            return Err(Error::SizeMismatch);
        }
        Ok(())
    }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator + Clone> Clone for Tree<K, V, C, A> {
    /// Copies keys, values and priorities verbatim, so the clone has the same shape.
    fn clone(&self) -> Self {
        let mut tree = Tree::new(
            self.comparator.clone(),
            self.allocator.clone(),
            self.priorities.clone(),
        );
        // (source node, parent in the clone, attach as left child)
        let mut stack: Vec<(Entry, Option<Entry>, bool)> = self
            .header
            .root
            .map(|root| (root, None, false))
            .into_iter()
            .collect();
        while let Some((entry, parent, is_left)) = stack.pop() {
            let node = self.node(entry);
            let copy = tree.nodes.allocate(Node::new(
                node.key.clone(),
                node.value.clone(),
                node.priority,
            ));
            match parent {
                None => tree.header.root = Some(copy),
                Some(parent) if is_left => tree.set_left(parent, Some(copy)),
                Some(parent) => tree.set_right(parent, Some(copy)),
            }
            stack.extend(node.left.map(|left| (left, Some(copy), true)));
            stack.extend(node.right.map(|right| (right, Some(copy), false)));
        }
        tree.len = self.len;
        tree.header.leftmost = tree.header.root.map(|root| tree.leftmost_in(root));
        tree.header.rightmost = tree.header.root.map(|root| tree.rightmost_in(root));
        tree
    }
}

impl<K, V, C, A: Allocator> Drop for Tree<K, V, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::alloc::ArenaAllocator;
    use crate::compare::Natural;
    use crate::priority::PriorityGenerator;
    use crate::treap::Position;

    fn new_tree(seed: u64) -> Tree<u32, u32, Natural, ArenaAllocator> {
        Tree::new(Natural, ArenaAllocator::default(), PriorityGenerator::with_seed(seed))
    }

    fn keys(tree: &Tree<u32, u32, Natural, ArenaAllocator>) -> Vec<u32> {
        let mut ret = Vec::new();
        let mut position = tree.begin();
        while let Some(entry) = position.0 {
            ret.push(tree.node(entry).key);
            position = tree.next(position);
        }
        ret
    }

    #[test]
    fn test_empty() {
        let tree = new_tree(0);
        assert_eq!(tree.begin(), Position(None));
        assert_eq!(tree.next(tree.begin()), Position(None));
        assert_eq!(tree.prev(Position(None)), Position(None));
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_rotations_keep_invariants() {
        for seed in 0..32 {
            let mut tree = new_tree(seed);
            for key in 0..64 {
                tree.insert(key, key);
                assert_eq!(tree.validate(), Ok(()));
            }
            assert_eq!(keys(&tree), (0..64).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_merge_keeps_invariants() {
        for seed in 0..32 {
            let mut tree = new_tree(seed);
            for key in 0..64 {
                tree.insert((key * 37) % 64, key);
            }
            for key in (0..64).filter(|key| key % 3 != 0) {
                assert_eq!(tree.erase(&key), 1);
                assert_eq!(tree.validate(), Ok(()));
            }
            let expected: Vec<u32> = (0..64).filter(|key| key % 3 == 0).collect();
            assert_eq!(keys(&tree), expected);
        }
    }

    #[test]
    fn test_erase_keeps_children_positions() {
        let mut tree = new_tree(3);
        let positions: Vec<Position> = (0..32).map(|key| tree.insert(key, key).0).collect();
        for key in (0..32).step_by(2) {
            tree.erase(&key);
        }
        for key in (1..32).step_by(2) {
            let position = positions[key as usize];
            assert_eq!(tree.find(&key), position);
            assert_eq!(tree.node(position.0.unwrap()).value, key);
        }
    }

    #[test]
    fn test_hint_rejected() {
        let mut tree = new_tree(5);
        let (five, _) = tree.insert(5, 5);
        tree.insert(1, 1);
        // 9 does not belong before 5, so the hint is ignored.
        let nine = tree.insert_with_hint(five, 9, 9);
        assert_eq!(tree.node(nine.0.unwrap()).key, 9);
        assert_eq!(keys(&tree), vec![1, 5, 9]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_clear() {
        let mut tree = new_tree(9);
        for key in 0..100 {
            tree.insert(key, key);
        }
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.begin(), Position(None));
        assert_eq!(tree.validate(), Ok(()));
        tree.insert(1, 1);
        assert_eq!(keys(&tree), vec![1]);
    }

    #[test]
    fn test_clone_has_same_shape() {
        let mut tree = new_tree(11);
        for key in 0..50 {
            tree.insert(key, key * 2);
        }
        let copy = tree.clone();
        assert_eq!(copy.validate(), Ok(()));
        assert_eq!(copy.height(), tree.height());
        assert_eq!(keys(&copy), keys(&tree));
        let root = copy.header.root.unwrap();
        assert_eq!(copy.node(root).key, tree.node(tree.header.root.unwrap()).key);
    }
}
