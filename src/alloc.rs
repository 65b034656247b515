//! Allocation strategies for tree nodes.
//!
//! A container is parameterized by an `Allocator`, a strategy that knows nothing about the
//! container's node type. When the container is built it binds the strategy to its node type,
//! which yields a `NodePool` holding the actual storage.

use crate::arena::{Entry, TypedArena};
use log::{debug, error, warn};
use std::any;
use std::collections::HashSet;
use std::mem;

/// Storage for values of a single type, addressed by `Entry` handles.
pub trait NodePool<T> {
    /// Stores `value` and returns its handle.
    fn allocate(&mut self, value: T) -> Entry;

    /// Removes and returns the value behind `entry`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `entry` does not refer to a live value.
    fn free(&mut self, entry: &Entry) -> T;

    fn get(&self, entry: &Entry) -> Option<&T>;

    fn get_mut(&mut self, entry: &Entry) -> Option<&mut T>;

    /// Returns the number of live values.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An allocation strategy that can be rebound to any value type.
pub trait Allocator {
    type Pool<T>: NodePool<T>;

    /// Creates empty storage for values of type `T`.
    fn bind<T>(&self) -> Self::Pool<T>;
}

impl<T> NodePool<T> for TypedArena<T> {
    fn allocate(&mut self, value: T) -> Entry {
        TypedArena::allocate(self, value)
    }

    fn free(&mut self, entry: &Entry) -> T {
        TypedArena::free(self, entry)
    }

    fn get(&self, entry: &Entry) -> Option<&T> {
        TypedArena::get(self, entry)
    }

    fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        TypedArena::get_mut(self, entry)
    }

    fn len(&self) -> usize {
        TypedArena::len(self)
    }
}

/// The default strategy: nodes live in a `TypedArena` with `chunk_size` nodes per chunk.
///
/// # Examples
///
/// ```
/// use ordered_treap::alloc::{Allocator, ArenaAllocator, NodePool};
///
/// let allocator = ArenaAllocator::new(16);
/// let mut pool = allocator.bind::<String>();
/// let entry = pool.allocate(String::from("node"));
/// assert_eq!(pool.len(), 1);
/// assert_eq!(pool.free(&entry), "node");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArenaAllocator {
    chunk_size: usize,
}

impl ArenaAllocator {
    pub const DEFAULT_CHUNK_SIZE: usize = 1024;

    pub fn new(chunk_size: usize) -> Self {
        ArenaAllocator { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for ArenaAllocator {
    fn default() -> Self {
        ArenaAllocator::new(Self::DEFAULT_CHUNK_SIZE)
    }
}

impl Allocator for ArenaAllocator {
    type Pool<T> = TypedArena<T>;

    fn bind<T>(&self) -> Self::Pool<T> {
        TypedArena::new(self.chunk_size)
    }
}

/// An instrumented strategy that logs every allocation and deallocation made through the
/// strategy it wraps.
///
/// Freeing an entry that is not live is reported at `error` level and then panics. Entries that
/// are still live when the pool is dropped are reported at `warn` level.
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
/// map.erase(&1);
/// assert!(map.is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DebugAllocator<A = ArenaAllocator> {
    inner: A,
}

impl<A: Allocator> DebugAllocator<A> {
    pub fn new(inner: A) -> Self {
        DebugAllocator { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Allocator> Allocator for DebugAllocator<A> {
    type Pool<T> = DebugPool<A::Pool<T>, T>;

    fn bind<T>(&self) -> Self::Pool<T> {
        debug!(
            "bind() -> pool for {} ({} bytes per value)",
            any::type_name::<T>(),
            mem::size_of::<T>(),
        );
        DebugPool {
            inner: self.inner.bind(),
            live: HashSet::new(),
            allocations: 0,
            deallocations: 0,
            marker: std::marker::PhantomData,
        }
    }
}

/// The storage produced by binding a `DebugAllocator`.
pub struct DebugPool<P, T> {
    inner: P,
    live: HashSet<Entry>,
    allocations: usize,
    deallocations: usize,
    marker: std::marker::PhantomData<fn() -> T>,
}

impl<P: NodePool<T>, T> DebugPool<P, T> {
    /// Returns the number of allocations made so far.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Returns the number of deallocations made so far.
    pub fn deallocations(&self) -> usize {
        self.deallocations
    }

    /// Returns the number of entries currently allocated.
    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl<P: NodePool<T>, T> NodePool<T> for DebugPool<P, T> {
    fn allocate(&mut self, value: T) -> Entry {
        let entry = self.inner.allocate(value);
        self.allocations += 1;
        self.live.insert(entry);
        debug!(
            "allocate(1) -> {} bytes of memory for {} at {:?}",
            mem::size_of::<T>(),
            any::type_name::<T>(),
            entry,
        );
        entry
    }

    fn free(&mut self, entry: &Entry) -> T {
        if !self.live.remove(entry) {
            error!("Fatal error: entry {:?} passed to free() is not allocated", entry);
            panic!("Error: entry {:?} passed to free() is not allocated.", entry);
        }
        self.deallocations += 1;
        debug!(
            "deallocate(1) -> {} bytes of memory for {} at {:?}",
            mem::size_of::<T>(),
            any::type_name::<T>(),
            entry,
        );
        self.inner.free(entry)
    }

    fn get(&self, entry: &Entry) -> Option<&T> {
        self.inner.get(entry)
    }

    fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        self.inner.get_mut(entry)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<P, T> Drop for DebugPool<P, T> {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            warn!(
                "{} entries for {} still allocated when the pool was dropped",
                self.live.len(),
                any::type_name::<T>(),
            );
        }
    }
}
