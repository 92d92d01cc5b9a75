// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! An updateable min-priority queue.
//!
//! [`UpdateableMinPq`] is a binary min-heap which also tracks the heap slot of every element it
//! holds. That index makes it possible to replace an arbitrary element (and so change its
//! priority) in logarithmic time, which the standard library's
//! [`BinaryHeap`](std::collections::BinaryHeap) cannot do.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// An error raised by misuse of an [`UpdateableMinPq`].
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum QueueError {
    /// The minimum of an empty queue was requested.
    #[error("priority queue underflow")]
    Underflow,
    /// The element to replace is not in the queue.
    #[error("replace_key called with an element that is not in the queue")]
    KeyNotFound,
}

/// A min-priority queue supporting replacement of arbitrary elements.
///
/// Elements are ordered by a comparison function, which defaults to their [`Ord`] implementation.
/// Elements are located for [`UpdateableMinPq::replace_key`] by equality, so elements which are
/// simultaneously queued must be pairwise distinct under [`Eq`]; the ordering need not agree with
/// equality.
///
/// Heap positions are one-based: the element at position `k` has its children at `2k` and
/// `2k + 1`. The queue manages its capacity explicitly, doubling when full and halving when no
/// more than a quarter of it is in use.
pub struct UpdateableMinPq<T, F = fn(&T, &T) -> Ordering> {
    // position k lives at heap[k - 1]
    heap: Vec<T>,
    index: HashMap<T, usize>,
    capacity: usize,
    compare: F,
}

impl<T> UpdateableMinPq<T>
where
    T: Ord + Hash + Clone,
{
    /// An empty queue ordered by [`Ord`].
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// An empty queue ordered by [`Ord`], with room for `capacity` elements before it grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, T::cmp)
    }
}

impl<T> Default for UpdateableMinPq<T>
where
    T: Ord + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> UpdateableMinPq<T, F>
where
    T: Eq + Hash + Clone,
    F: Fn(&T, &T) -> Ordering,
{
    /// An empty queue ordered by `compare`.
    pub fn with_comparator(compare: F) -> Self {
        Self::with_capacity_and_comparator(1, compare)
    }

    /// An empty queue ordered by `compare`, with room for `capacity` elements before it grows.
    pub fn with_capacity_and_comparator(capacity: usize, compare: F) -> Self {
        let capacity = capacity.max(1);
        Self {
            heap: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
            compare,
        }
    }

    /// The number of queued elements.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The number of elements the queue can hold before it has to grow.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether an element equal to `x` is queued.
    pub fn contains(&self, x: &T) -> bool {
        self.index.contains_key(x)
    }

    /// Adds an element to the queue.
    pub fn insert(&mut self, x: T) {
        debug_assert!(!self.contains(&x), "element is already queued");
        if self.heap.len() == self.capacity {
            self.resize(2 * self.capacity);
        }
        self.heap.push(x.clone());
        let k = self.heap.len();
        self.index.insert(x, k);
        self.swim(k);
    }

    /// A smallest element of the queue.
    pub fn peek_min(&self) -> Result<&T, QueueError> {
        self.heap.first().ok_or(QueueError::Underflow)
    }

    /// Removes and returns a smallest element of the queue.
    pub fn extract_min(&mut self) -> Result<T, QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::Underflow);
        }
        let last = self.heap.len();
        self.exchange(1, last);
        let min = self.heap.pop().ok_or(QueueError::Underflow)?;
        self.index.remove(&min);
        self.sink(1);

        let n = self.heap.len();
        if n > 0 && n <= self.capacity / 4 {
            self.resize(self.capacity / 2);
        }
        Ok(min)
    }

    /// Finds `old` in the queue and overwrites it with `new`, moving `new` up or down the heap as
    /// its priority demands.
    pub fn replace_key(&mut self, old: &T, new: T) -> Result<(), QueueError> {
        debug_assert!(
            old == &new || !self.contains(&new),
            "element is already queued"
        );
        let k = self.index.remove(old).ok_or(QueueError::KeyNotFound)?;
        self.heap[k - 1] = new.clone();
        self.index.insert(new, k);
        let k = self.swim(k);
        self.sink(k);
        Ok(())
    }

    /// Verifies the heap order and that the element index agrees with the heap in both
    /// directions. Takes linear time.
    pub fn is_consistent(&self) -> bool {
        let n = self.heap.len();
        let ordered = (2..=n).all(|k| !self.greater(k / 2, k));
        let indexed = self
            .heap
            .iter()
            .enumerate()
            .all(|(i, x)| self.index.get(x) == Some(&(i + 1)));
        let mapped = self.index.len() == n
            && self
                .index
                .iter()
                .all(|(x, &k)| (1..=n).contains(&k) && &self.heap[k - 1] == x);
        ordered && indexed && mapped && n <= self.capacity
    }

    // the index map is untouched: no element changes position
    fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.heap.len());
        self.capacity = capacity.max(1);
        if self.capacity > self.heap.capacity() {
            self.heap.reserve_exact(self.capacity - self.heap.len());
        } else {
            self.heap.shrink_to(self.capacity);
        }
    }

    fn swim(&mut self, mut k: usize) -> usize {
        while k > 1 && self.greater(k / 2, k) {
            self.exchange(k, k / 2);
            k /= 2;
        }
        k
    }

    fn sink(&mut self, mut k: usize) {
        let n = self.heap.len();
        while 2 * k <= n {
            let mut j = 2 * k;
            if j < n && self.greater(j, j + 1) {
                j += 1;
            }
            if !self.greater(k, j) {
                break;
            }
            self.exchange(k, j);
            k = j;
        }
    }

    fn greater(&self, i: usize, j: usize) -> bool {
        (self.compare)(&self.heap[i - 1], &self.heap[j - 1]) == Ordering::Greater
    }

    fn exchange(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i - 1, j - 1);
        if let Some(slot) = self.index.get_mut(&self.heap[i - 1]) {
            *slot = i;
        }
        if let Some(slot) = self.index.get_mut(&self.heap[j - 1]) {
            *slot = j;
        }
    }
}
