//! Counting semaphore.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counting semaphore supporting wait-for-N and post-N.
///
/// The orchestrator uses one per phase as a barrier: every job ends with
/// `post(1)`, and the driver calls `wait(total)` once. Because `post` and
/// `wait` synchronize through the same mutex, every side effect a job made
/// before posting is visible to the thread returning from `wait`.
pub struct Semaphore {
    value: Mutex<usize>,
    changed: Condvar,
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Semaphore {
    pub fn new(value: usize) -> Self {
        Self {
            value: Mutex::new(value),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `n` to the counter and wake all waiters.
    pub fn post(&self, n: usize) {
        let mut value = self.lock();
        *value += n;
        self.changed.notify_all();
    }

    /// Block until the counter is at least `n`, then subtract `n`.
    pub fn wait(&self, n: usize) {
        let mut value = self
            .changed
            .wait_while(self.lock(), |value| *value < n)
            .unwrap_or_else(PoisonError::into_inner);
        *value -= n;
    }

    /// Subtract `n` if the counter allows it; never blocks.
    pub fn try_wait(&self, n: usize) -> bool {
        let mut value = self.lock();
        if *value < n {
            return false;
        }
        *value -= n;
        true
    }

    /// Advisory snapshot of the counter.
    pub fn value(&self) -> usize {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_post_then_wait() {
        let sem = Semaphore::new(0);
        sem.post(3);
        assert_eq!(sem.value(), 3);
        sem.wait(2);
        assert_eq!(sem.value(), 1);
    }

    #[test]
    fn test_try_wait_insufficient_leaves_state() {
        let sem = Semaphore::new(1);
        assert!(!sem.try_wait(2));
        assert_eq!(sem.value(), 1);
        assert!(sem.try_wait(1));
        assert_eq!(sem.value(), 0);
    }

    #[test]
    fn test_wait_blocks_until_enough_posts() {
        let sem = Arc::new(Semaphore::default());
        let waiter = {
            let sem = Arc::clone(&sem);
            thread::spawn(move || sem.wait(2))
        };

        sem.post(1);
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        sem.post(1);
        waiter.join().unwrap();
        assert_eq!(sem.value(), 0);
    }

    #[test]
    fn test_barrier_observes_every_side_effect() {
        const JOBS: usize = 64;
        let sem = Arc::new(Semaphore::default());
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..JOBS {
            let sem = Arc::clone(&sem);
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                counter.fetch_add(1, Ordering::Relaxed);
                sem.post(1);
            });
        }

        sem.wait(JOBS);
        assert_eq!(counter.load(Ordering::Relaxed), JOBS);
        assert_eq!(sem.value(), 0);
    }
}
