//! Minimal in-process event loop.
//!
//! [`EventLoop<E>`] couples a typed publish/subscribe channel with a deferred
//! [`TaskQueue`]. Models publish events synchronously through
//! [`fire`](EventLoop::fire); work that must wait until the current burst of
//! calls settles (debounced notifications) is posted as a task and runs when
//! the host calls [`process_tasks`](EventLoop::process_tasks) at the end of a
//! tick.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_core::EventLoop;
//!
//! let event_loop = Arc::new(EventLoop::<String>::new());
//! event_loop.connect(|event| println!("event: {event}"));
//!
//! event_loop.fire("immediate".to_string());
//!
//! let deferred = event_loop.clone();
//! event_loop.post_task(move || deferred.fire("deferred".to_string()));
//! event_loop.process_tasks();
//! ```

use std::sync::Arc;

use crate::error::Result;
use crate::logging::targets;
use crate::signal::{ConnectionId, Signal};
use crate::task::{TaskId, TaskQueue};

/// Typed publish/subscribe channel plus a deferred task queue.
#[derive(Debug)]
pub struct EventLoop<E> {
    events: Signal<E>,
    tasks: Arc<TaskQueue>,
}

impl<E: 'static> Default for EventLoop<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventLoop<E> {
    /// Create an event loop with no listeners and no pending tasks.
    pub fn new() -> Self {
        Self {
            events: Signal::new(),
            tasks: Arc::new(TaskQueue::new()),
        }
    }

    // -------------------------------------------------------------------------
    // Publish / subscribe
    // -------------------------------------------------------------------------

    /// Publish an event to every listener, synchronously and in connection order.
    pub fn fire(&self, event: E) {
        self.events.emit(event);
    }

    /// Subscribe to every event fired on this loop.
    pub fn connect<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.events.connect(listener)
    }

    /// Remove a listener.
    ///
    /// Returns `true` if the listener was connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.events.disconnect(id)
    }

    /// Number of connected listeners.
    pub fn listener_count(&self) -> usize {
        self.events.connection_count()
    }

    // -------------------------------------------------------------------------
    // Task Queue API
    // -------------------------------------------------------------------------

    /// Post a task to run on the next [`process_tasks`](Self::process_tasks).
    pub fn post_task<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.post(task)
    }

    /// Cancel a pending task.
    pub fn cancel_task(&self, id: TaskId) -> Result<()> {
        self.tasks.cancel(id)
    }

    /// Check if there are pending tasks.
    pub fn has_pending_tasks(&self) -> bool {
        self.tasks.has_pending()
    }

    /// End the current tick: run every task pending when the call started.
    ///
    /// Returns the number of tasks processed.
    pub fn process_tasks(&self) -> usize {
        let count = self.tasks.process_all();
        if count > 0 {
            tracing::debug!(target: targets::EVENT_LOOP, count, "tick drained");
        }
        count
    }

    /// The shared task queue, for collaborators such as [`crate::Debouncer`].
    pub fn task_queue(&self) -> Arc<TaskQueue> {
        self.tasks.clone()
    }
}

static_assertions::assert_impl_all!(EventLoop<u32>: Send, Sync);
