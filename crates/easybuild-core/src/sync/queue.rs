//! Blocking FIFO queue.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A thread-safe FIFO whose consumers block while it is empty.
///
/// Producers never block. Items pushed to the front are taken before any item
/// already queued, which is how an immediate shutdown jumps ahead of pending
/// work. Nothing is dropped except through [`BlockingQueue::clear`].
pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item behind everything already queued.
    pub fn push_back(&self, item: T) {
        self.lock().push_back(item);
        self.available.notify_one();
    }

    /// Insert an item ahead of everything already queued.
    pub fn push_front(&self, item: T) {
        self.lock().push_front(item);
        self.available.notify_one();
    }

    /// Remove and return the front item, blocking until one is available.
    pub fn take(&self) -> T {
        let mut items = self.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove the front item without blocking.
    pub fn try_take(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Keep only the items matching `keep`, preserving their order.
    pub fn retain(&self, keep: impl FnMut(&T) -> bool) {
        self.lock().retain(keep);
    }

    /// Discard every pending item without running it.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Advisory snapshot of the queue length.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Advisory snapshot of emptiness.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
