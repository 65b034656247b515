//! Key-ordering rules.

use std::cmp::Ordering;

/// A strict weak ordering over keys.
///
/// Containers only ever ask whether one key is less than another; two keys are considered
/// equivalent when neither is less than the other.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    fn less(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their `Ord` implementation.
///
/// # Examples
///
/// ```
/// use ordered_treap::compare::Reverse;
/// use ordered_treap::treap::TreapSet;
///
/// let mut set = TreapSet::with_comparator(Reverse);
/// set.insert(1);
/// set.insert(3);
/// set.insert(2);
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &2, &1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reverse;

impl<T: Ord + ?Sized> Comparator<T> for Reverse {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}
