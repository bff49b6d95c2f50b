//! Debounced callbacks.
//!
//! A [`Debouncer`] keeps at most one pending invocation of its callback in a
//! [`TaskQueue`]. Scheduling again before the queue is drained cancels the
//! pending task and posts a fresh one, so a burst of calls within one tick
//! collapses into a single invocation.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logging::targets;
use crate::task::{TaskId, TaskQueue};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// A single-slot debounced callback.
pub struct Debouncer {
    queue: Arc<TaskQueue>,
    pending: Arc<Mutex<Option<TaskId>>>,
    callback: Callback,
}

impl Debouncer {
    /// Create a debouncer that posts `callback` to `queue`.
    pub fn new<F>(queue: Arc<TaskQueue>, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            queue,
            pending: Arc::new(Mutex::new(None)),
            callback: Arc::new(callback),
        }
    }

    /// Schedule the callback, replacing any pending invocation.
    pub fn schedule(&self) {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            // The previous task may have been drained already; either way it
            // must not run again.
            let _ = self.queue.cancel(previous);
        }

        let slot = self.pending.clone();
        let callback = self.callback.clone();
        let id = self.queue.post(move || {
            slot.lock().take();
            callback();
        });
        tracing::trace!(target: targets::DEBOUNCE, id = id.as_u64(), "debounced callback scheduled");
        *pending = Some(id);
    }

    /// Drop the pending invocation, if any.
    ///
    /// Returns `true` if an invocation was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(id) => self.queue.cancel(id).is_ok(),
            None => false,
        }
    }

    /// Returns `true` if an invocation is waiting for the next drain.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &*self.pending.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_debouncer() -> (Arc<TaskQueue>, Debouncer, Arc<AtomicUsize>) {
        let queue = Arc::new(TaskQueue::new());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let debouncer = Debouncer::new(queue.clone(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (queue, debouncer, fired)
    }

    #[test]
    fn test_burst_coalesces() {
        let (queue, debouncer, fired) = counting_debouncer();

        for _ in 0..5 {
            debouncer.schedule();
        }
        assert!(debouncer.is_pending());
        assert_eq!(queue.pending_count(), 1);

        queue.process_all();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());

        queue.process_all();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_separate_ticks_fire_separately() {
        let (queue, debouncer, fired) = counting_debouncer();

        debouncer.schedule();
        queue.process_all();
        debouncer.schedule();
        queue.process_all();

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancel() {
        let (queue, debouncer, fired) = counting_debouncer();

        debouncer.schedule();
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        queue.process_all();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
